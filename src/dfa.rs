//! Detrended Fluctuation Analysis.
//!
//! For every scale `s` the series is cut into `⌊N/s⌋` non-overlapping windows
//! (optionally repeated from the tail), a polynomial trend is removed from each
//! window, and the fluctuation is the root mean square of all residuals:
//!
//! ```text
//! F(s) = sqrt( Σ_windows Σ_j (y_j - ŷ_j)² / (passes · ⌊N/s⌋ · s) )
//! ```
//!
//! No profile is taken here: pass `to_aggregated(x)` to analyse increments.

use crate::config::{DfaConfig, SegmentDirection};
use crate::errors::{validate_output_length, validate_scales, FluctuationResult};
use crate::kernel::{
    disjoint_starts, fill_slots, log_dispatch, max_scale, prepare_series, squared_residual_sum,
};
use crate::polyfit::PolynomialFitter;

/// DFA fluctuation for every scale.
///
/// `t` defaults to `1, 2, …, N`. Each scale must satisfy
/// `polynomial_order + 2 <= s <= N`.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::{dfa, DfaConfig};
///
/// let y: Vec<f64> = (1..=10).map(|i| i as f64).collect();
/// let f = dfa(&y, None, &[5], &DfaConfig::default()).unwrap();
/// assert!(f[0] < 1e-10);
/// ```
pub fn dfa(
    y: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    config: &DfaConfig,
) -> FluctuationResult<Vec<f64>> {
    let mut out = vec![0.0; scales.len()];
    dfa_into(y, t, scales, config, &mut out)?;
    Ok(out)
}

/// DFA into a caller-owned buffer with one slot per scale.
pub fn dfa_into(
    y: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    config: &DfaConfig,
    out: &mut [f64],
) -> FluctuationResult<()> {
    let t = prepare_series(y, t)?;
    let order = config.polynomial_order;
    validate_scales(scales, order + 2, y.len())?;
    validate_output_length(out, scales.len())?;
    log_dispatch("DFA", y.len(), scales, 0, order);

    let direction = config.direction;
    fill_slots(out, max_scale(scales), order + 1, |ws, i| {
        dfa_scale(&mut ws.fitter, &t, y, scales[i], direction)
    });
    Ok(())
}

/// Fluctuation of one scale; inputs are assumed valid.
pub(crate) fn dfa_scale(
    fitter: &mut PolynomialFitter,
    t: &[f64],
    y: &[f64],
    scale: usize,
    direction: SegmentDirection,
) -> f64 {
    let n = y.len();
    let windows = n / scale;
    let f: f64 = disjoint_starts(n, scale, direction)
        .map(|start| squared_residual_sum(fitter, t, y, start, scale))
        .sum();
    (f / (direction.passes() * windows * scale) as f64).sqrt()
}
