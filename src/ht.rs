//! Local fluctuation for Hurst-exponent profiles.
//!
//! A single detrended window `[v, v + s)` with `F = sqrt(Σ res² / s)`. Local
//! multifractal analysis slides this window along the series and regresses
//! the logarithms downstream; [`ht_profile`] does the sliding in parallel.

use crate::errors::{validate_scales, FluctuationError, FluctuationResult};
use crate::kernel::{fill_slots, prepare_series, squared_residual_sum};
use crate::polyfit::PolynomialFitter;

/// Fluctuation of the window of `scale` points starting at index `start`.
///
/// Requires `polynomial_order + 2 <= scale <= N` and `start + scale <= N`.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::ht_fluctuation;
///
/// let y = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
/// let f = ht_fluctuation(&y, None, 4, 0, 1).unwrap();
/// assert!((f - 0.5).abs() < 1e-12);
/// ```
pub fn ht_fluctuation(
    y: &[f64],
    t: Option<&[f64]>,
    scale: usize,
    polynomial_order: usize,
    start: usize,
) -> FluctuationResult<f64> {
    let t = prepare_series(y, t)?;
    validate_scales(&[scale], polynomial_order + 2, y.len())?;
    if start > y.len() - scale {
        return Err(FluctuationError::InvalidParameter {
            parameter: "start",
            value: start as f64,
            constraint: format!("start + scale <= {} (scale = {})", y.len(), scale),
        });
    }

    let mut fitter = PolynomialFitter::with_order(scale, polynomial_order);
    Ok(window_fluctuation(&mut fitter, &t, y, start, scale))
}

/// Local fluctuation at every start `v ∈ [0, N - scale]`.
///
/// The result has `N - scale + 1` entries, entry `v` being
/// `ht_fluctuation(y, t, scale, polynomial_order, v)`.
pub fn ht_profile(
    y: &[f64],
    t: Option<&[f64]>,
    scale: usize,
    polynomial_order: usize,
) -> FluctuationResult<Vec<f64>> {
    let t = prepare_series(y, t)?;
    validate_scales(&[scale], polynomial_order + 2, y.len())?;
    log::debug!(
        "HT profile: N = {}, scale {}, polynomial order {}",
        y.len(),
        scale,
        polynomial_order
    );

    let mut out = vec![0.0; y.len() - scale + 1];
    fill_slots(&mut out, scale, polynomial_order + 1, |ws, v| {
        window_fluctuation(&mut ws.fitter, &t, y, v, scale)
    });
    Ok(out)
}

#[inline]
fn window_fluctuation(
    fitter: &mut PolynomialFitter,
    t: &[f64],
    y: &[f64],
    start: usize,
    scale: usize,
) -> f64 {
    (squared_residual_sum(fitter, t, y, start, scale) / scale as f64).sqrt()
}
