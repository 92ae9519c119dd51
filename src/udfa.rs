//! Unbiased Detrended Fluctuation Analysis.
//!
//! Plain DFA underestimates the fluctuation on short windows. This variant
//! slides a window of `s` points over every start `v ∈ [0, N - s]` and, from
//! the residuals of each window, builds two lag-one correlation estimates
//! (one on the residuals as they are, one on the residuals with alternating
//! sign), corrects both for their own small-sample bias and uses them to
//! rescale the residual variance:
//!
//! ```text
//! F(s) = sqrt( Σ_v (ρ_A* + ρ_B*)·(1 - 1/(2s))·σ²_v · sqrt((s-1)/s) / (N - s + 1) )
//! ```
//!
//! A window whose residual variance is zero (for instance a window the trend
//! fits exactly) makes its slot non-finite.

use crate::errors::{validate_output_length, validate_scales, FluctuationResult};
use crate::kernel::{
    fill_slots, log_dispatch, max_scale, prepare_series, window_residuals, Workspace,
};

/// Unbiased DFA fluctuation for every scale.
///
/// Each scale must satisfy `polynomial_order + 2 <= s <= N`. The abscissa may
/// be any strictly increasing grid, which makes this the variant of choice for
/// irregular sampling.
pub fn udfa(
    y: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    polynomial_order: usize,
) -> FluctuationResult<Vec<f64>> {
    let mut out = vec![0.0; scales.len()];
    udfa_into(y, t, scales, polynomial_order, &mut out)?;
    Ok(out)
}

/// Unbiased DFA into a caller-owned buffer with one slot per scale.
pub fn udfa_into(
    y: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    polynomial_order: usize,
    out: &mut [f64],
) -> FluctuationResult<()> {
    let t = prepare_series(y, t)?;
    validate_scales(scales, polynomial_order + 2, y.len())?;
    validate_output_length(out, scales.len())?;
    log_dispatch("UDFA", y.len(), scales, 0, polynomial_order);

    fill_slots(out, max_scale(scales), polynomial_order + 1, |ws, i| {
        udfa_scale(ws, &t, y, scales[i])
    });
    Ok(())
}

fn udfa_scale(ws: &mut Workspace, t: &[f64], y: &[f64], scale: usize) -> f64 {
    let windows = y.len() - scale + 1;
    let f: f64 = (0..windows)
        .map(|v| window_correction(window_residuals(ws, t, y, v, scale)))
        .sum();
    let s = scale as f64;
    (f * ((s - 1.0) / s).sqrt() / windows as f64).sqrt()
}

/// Bias-corrected variance contribution of one window of residuals.
fn window_correction(d: &[f64]) -> f64 {
    let len = d.len();
    let s = len as f64;

    let mut sum = 0.0;
    let mut sum2 = 0.0;
    let mut alternating = 0.0;
    for (j, &r) in d.iter().enumerate() {
        sum += r;
        sum2 += r * r;
        if j % 2 == 0 {
            alternating += r;
        } else {
            alternating -= r;
        }
    }
    let shift: f64 = d.windows(2).map(|w| w[0] * w[1]).sum();

    let first = d[0];
    let last = d[len - 1];
    // (-1)^(s+1)
    let last_sign = if len % 2 == 1 { 1.0 } else { -1.0 };

    let pos_mean = sum / s;
    let pos_var = sum2 / s - pos_mean * pos_mean;
    let neg_mean = alternating / s;
    let neg_var = sum2 / s - neg_mean * neg_mean;

    let pos_shift = (shift + pos_mean * (first + last - pos_mean * (s + 1.0))) / pos_var;
    let neg_shift =
        (-shift + neg_mean * (first + last_sign * last - neg_mean * (s + 1.0))) / neg_var;

    let rho_a = (s + pos_shift) / (2.0 * s - 1.0);
    let rho_b = (s + neg_shift) / (2.0 * s - 1.0);
    let corrected = |rho: f64| rho + (1.0 + 3.0 * rho) / (2.0 * s);

    (corrected(rho_a) + corrected(rho_b)) * (1.0 - 1.0 / (2.0 * s)) * pos_var
}
