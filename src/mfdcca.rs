//! Multifractal Detrended Cross-Correlation Analysis.
//!
//! The MF-DFA segmentation applied to a pair of series: in each window both
//! series are detrended and the absolute residual products are averaged,
//! `F²_v(s) = Σ |r1·r2| / s`. The q-closing is the same generalized mean as
//! MF-DFA, so `mfdcca(y, y, …)` reproduces `mfdfa(y, …)`.

use crate::config::{DfaConfig, ResidualProduct, SegmentDirection};
use crate::errors::{validate_output_length, validate_scales, FluctuationResult};
use crate::kernel::{
    cross_residual_sum, disjoint_starts, fill_slots, log_dispatch, max_scale, prepare_pair,
    GeneralizedMean, Workspace,
};
use crate::results::FluctuationMatrix;

/// MF-DCCA fluctuation for every `(q, scale)` pair.
///
/// Both series must have the same length. Each scale must satisfy
/// `polynomial_order + 2 <= s <= N`.
pub fn mfdcca(
    y1: &[f64],
    y2: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    q_values: &[f64],
    config: &DfaConfig,
) -> FluctuationResult<FluctuationMatrix> {
    let mut matrix = FluctuationMatrix::zeroed(q_values, scales);
    mfdcca_into(y1, y2, t, scales, q_values, config, matrix.values_mut())?;
    Ok(matrix)
}

/// MF-DCCA into a caller-owned row-major buffer of `q_values.len() * scales.len()` slots.
pub fn mfdcca_into(
    y1: &[f64],
    y2: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    q_values: &[f64],
    config: &DfaConfig,
    out: &mut [f64],
) -> FluctuationResult<()> {
    let t = prepare_pair(y1, y2, t)?;
    let n = y1.len();
    let order = config.polynomial_order;
    validate_scales(scales, order + 2, n)?;
    validate_output_length(out, q_values.len() * scales.len())?;
    log_dispatch("MFDCCA", n, scales, q_values.len(), order);

    let direction = config.direction;
    let width = scales.len();
    fill_slots(out, max_scale(scales), order + 1, |ws, slot| {
        let q = q_values[slot / width];
        let scale = scales[slot % width];
        mfdcca_slot(ws, &t, y1, y2, scale, q, direction)
    });
    Ok(())
}

fn mfdcca_slot(
    ws: &mut Workspace,
    t: &[f64],
    y1: &[f64],
    y2: &[f64],
    scale: usize,
    q: f64,
    direction: SegmentDirection,
) -> f64 {
    let mut mean = GeneralizedMean::new(q);
    for start in disjoint_starts(y1.len(), scale, direction) {
        let f = cross_residual_sum(ws, t, y1, y2, start, scale, ResidualProduct::Absolute);
        mean.push(f / scale as f64);
    }
    mean.finish()
}
