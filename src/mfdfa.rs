//! Multifractal Detrended Fluctuation Analysis.
//!
//! Same segmentation and detrending as DFA, but per-window mean squares
//! `F²_v(s) = Σ res² / s` are combined through a generalized mean of order q:
//!
//! ```text
//! F_q(s) = ( mean_v (F²_v(s))^(q/2) )^(1/q)      q ≠ 0
//! F_0(s) = exp( mean_v ln F²_v(s) / 2 )
//! ```
//!
//! The `q = 0` form is selected by exact comparison with zero. At `q = 2` the
//! result coincides with plain DFA.

use crate::config::{DfaConfig, SegmentDirection};
use crate::errors::{validate_output_length, validate_scales, FluctuationResult};
use crate::kernel::{
    disjoint_starts, fill_slots, log_dispatch, max_scale, prepare_series, squared_residual_sum,
    GeneralizedMean,
};
use crate::polyfit::PolynomialFitter;
use crate::results::FluctuationMatrix;

/// MF-DFA fluctuation for every `(q, scale)` pair.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::{mfdfa, DfaConfig};
///
/// let y: Vec<f64> = (0..256).map(|i| ((i * 7919) % 97) as f64).collect();
/// let f = mfdfa(&y, None, &[16, 32], &[-2.0, 0.0, 2.0], &DfaConfig::default()).unwrap();
/// assert_eq!(f.values().len(), 6);
/// ```
pub fn mfdfa(
    y: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    q_values: &[f64],
    config: &DfaConfig,
) -> FluctuationResult<FluctuationMatrix> {
    let mut matrix = FluctuationMatrix::zeroed(q_values, scales);
    mfdfa_into(y, t, scales, q_values, config, matrix.values_mut())?;
    Ok(matrix)
}

/// MF-DFA into a caller-owned row-major buffer of `q_values.len() * scales.len()` slots.
pub fn mfdfa_into(
    y: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    q_values: &[f64],
    config: &DfaConfig,
    out: &mut [f64],
) -> FluctuationResult<()> {
    let t = prepare_series(y, t)?;
    let order = config.polynomial_order;
    validate_scales(scales, order + 2, y.len())?;
    validate_output_length(out, q_values.len() * scales.len())?;
    log_dispatch("MFDFA", y.len(), scales, q_values.len(), order);

    let direction = config.direction;
    let width = scales.len();
    fill_slots(out, max_scale(scales), order + 1, |ws, slot| {
        let q = q_values[slot / width];
        let scale = scales[slot % width];
        mfdfa_slot(&mut ws.fitter, &t, y, scale, q, direction)
    });
    Ok(())
}

fn mfdfa_slot(
    fitter: &mut PolynomialFitter,
    t: &[f64],
    y: &[f64],
    scale: usize,
    q: f64,
    direction: SegmentDirection,
) -> f64 {
    let mut mean = GeneralizedMean::new(q);
    for start in disjoint_starts(y.len(), scale, direction) {
        let rss = squared_residual_sum(fitter, t, y, start, scale);
        mean.push(rss / scale as f64);
    }
    mean.finish()
}
