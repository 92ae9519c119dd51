//! Detrended Cross-Correlation Analysis.
//!
//! Both series are detrended window by window against the same abscissa and
//! the products of their residuals are accumulated. Two window layouts exist:
//!
//! - overlapping: every shift `v ∈ [0, N - s)` with `s + 1` points, normalised
//!   by `(N - s)·(s - 1)`;
//! - disjoint: the DFA segmentation (forward or forward+backward), normalised
//!   by `passes·⌊N/s⌋·s`.
//!
//! Absolute products are closed with a square root, signed products are
//! returned as a covariance and may be negative.
//!
//! The module also provides the DCCA cross-correlation coefficient
//! `ρ(s) = F²₁₂ / sqrt(F²₁₁·F²₂₂)` and Monte Carlo confidence bands for it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::config::{
    DccaConfig, DccaWindowing, ResidualProduct, RhoThresholdConfig, SegmentDirection,
};
use crate::errors::{
    validate_open_interval, validate_output_length, validate_scales, FluctuationError,
    FluctuationResult,
};
use crate::kernel::{
    cross_residual_sum, disjoint_starts, fill_slots, log_dispatch, max_scale, prepare_pair,
    Workspace,
};
use crate::results::RhoThresholds;
use crate::series::{natural_abscissa, to_aggregated};

/// Admissible scale range for an overlapping layout: windows hold `s + 1`
/// points and at least one shift must exist.
fn overlapping_bounds(order: usize, n: usize) -> (usize, usize) {
    (order + 2, n.saturating_sub(1))
}

/// DCCA fluctuation for every scale.
///
/// Each scale must satisfy `polynomial_order + 2 <= s`, and `s < N` for the
/// overlapping layout or `s <= N` for the disjoint one.
pub fn dcca(
    y1: &[f64],
    y2: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    config: &DccaConfig,
) -> FluctuationResult<Vec<f64>> {
    let mut out = vec![0.0; scales.len()];
    dcca_into(y1, y2, t, scales, config, &mut out)?;
    Ok(out)
}

/// DCCA into a caller-owned buffer with one slot per scale.
pub fn dcca_into(
    y1: &[f64],
    y2: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    config: &DccaConfig,
    out: &mut [f64],
) -> FluctuationResult<()> {
    let t = prepare_pair(y1, y2, t)?;
    let n = y1.len();
    let order = config.polynomial_order;
    let (min, max) = match config.windowing {
        DccaWindowing::Overlapping => overlapping_bounds(order, n),
        DccaWindowing::Disjoint(_) => (order + 2, n),
    };
    validate_scales(scales, min, max)?;
    validate_output_length(out, scales.len())?;
    log_dispatch("DCCA", n, scales, 0, order);

    let product = config.residual_product;
    let windowing = config.windowing;
    fill_slots(out, max_scale(scales) + 1, order + 1, |ws, i| match windowing {
        DccaWindowing::Overlapping => overlapping_scale(ws, &t, y1, y2, scales[i], product),
        DccaWindowing::Disjoint(direction) => {
            disjoint_scale(ws, &t, y1, y2, scales[i], direction, product)
        }
    });
    Ok(())
}

fn overlapping_scale(
    ws: &mut Workspace,
    t: &[f64],
    y1: &[f64],
    y2: &[f64],
    scale: usize,
    product: ResidualProduct,
) -> f64 {
    let shifts = y1.len() - scale;
    let f: f64 = (0..shifts)
        .map(|v| cross_residual_sum(ws, t, y1, y2, v, scale + 1, product))
        .sum();
    product.close(f / (shifts * (scale - 1)) as f64)
}

fn disjoint_scale(
    ws: &mut Workspace,
    t: &[f64],
    y1: &[f64],
    y2: &[f64],
    scale: usize,
    direction: SegmentDirection,
    product: ResidualProduct,
) -> f64 {
    let n = y1.len();
    let windows = n / scale;
    let f: f64 = disjoint_starts(n, scale, direction)
        .map(|start| cross_residual_sum(ws, t, y1, y2, start, scale, product))
        .sum();
    product.close(f / (direction.passes() * windows * scale) as f64)
}

/// DCCA cross-correlation coefficient for every scale.
///
/// Uses the signed, overlapping layout for the cross term and both auto
/// terms, so `ρ` lies in `[-1, 1]`. Scales follow the overlapping bounds.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::rho_dcca;
///
/// let y: Vec<f64> = (0..100).map(|i| ((i * 31) % 13) as f64).collect();
/// let rho = rho_dcca(&y, &y, None, &[10, 20], 1).unwrap();
/// assert!(rho.iter().all(|r| (r - 1.0).abs() < 1e-12));
/// ```
pub fn rho_dcca(
    y1: &[f64],
    y2: &[f64],
    t: Option<&[f64]>,
    scales: &[usize],
    polynomial_order: usize,
) -> FluctuationResult<Vec<f64>> {
    let t = prepare_pair(y1, y2, t)?;
    let (min, max) = overlapping_bounds(polynomial_order, y1.len());
    validate_scales(scales, min, max)?;
    log_dispatch("DCCA rho", y1.len(), scales, 0, polynomial_order);

    let mut out = vec![0.0; scales.len()];
    rho_values_into(y1, y2, &t, scales, polynomial_order, &mut out);
    Ok(out)
}

fn rho_values_into(
    y1: &[f64],
    y2: &[f64],
    t: &[f64],
    scales: &[usize],
    order: usize,
    out: &mut [f64],
) {
    fill_slots(out, max_scale(scales) + 1, order + 1, |ws, i| {
        rho_scale(ws, t, y1, y2, scales[i])
    });
}

/// One pass over the overlapping windows accumulating the cross and both
/// auto products; the common normalisation cancels in the ratio.
fn rho_scale(ws: &mut Workspace, t: &[f64], y1: &[f64], y2: &[f64], scale: usize) -> f64 {
    let len = scale + 1;
    ws.reserve(len);
    let (mut c12, mut c11, mut c22) = (0.0, 0.0, 0.0);
    for v in 0..(y1.len() - scale) {
        let tw = &t[v..v + len];
        let r1 = &mut ws.residuals_a[..len];
        let r2 = &mut ws.residuals_b[..len];
        ws.fitter
            .fit(tw, &y1[v..v + len])
            .residuals_into(tw, &y1[v..v + len], r1);
        ws.fitter
            .fit(tw, &y2[v..v + len])
            .residuals_into(tw, &y2[v..v + len], r2);
        for (&a, &b) in r1.iter().zip(r2.iter()) {
            c12 += a * b;
            c11 += a * a;
            c22 += b * b;
        }
    }
    c12 / (c11 * c22).sqrt()
}

/// Monte Carlo confidence bands for [`rho_dcca`] under independence.
///
/// Draws `simulations` pairs of independent Gaussian white-noise series,
/// converts them to profiles, computes `ρ` at every scale and returns the
/// order statistics at `confidence_level` (upper) and its mirror (lower).
pub fn rho_thresholds(
    scales: &[usize],
    config: &RhoThresholdConfig,
) -> FluctuationResult<RhoThresholds> {
    let c = config.confidence_level;
    validate_open_interval(c, 0.0, 1.0, "confidence_level")?;
    if config.simulations == 0 {
        return Err(FluctuationError::InvalidParameter {
            parameter: "simulations",
            value: 0.0,
            constraint: "simulations >= 1".to_string(),
        });
    }
    let len = config.series_length;
    let order = config.polynomial_order;
    let (min, max) = overlapping_bounds(order, len);
    validate_scales(scales, min, max)?;
    log::debug!(
        "DCCA rho thresholds: {} simulations of length {}, {} scales, confidence {}",
        config.simulations,
        len,
        scales.len(),
        c
    );

    let t = natural_abscissa(len);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut simulated = vec![0.0; config.simulations * scales.len()];
    for row in simulated.chunks_mut(scales.len().max(1)) {
        let noise1: Vec<f64> = StandardNormal.sample_iter(&mut rng).take(len).collect();
        let noise2: Vec<f64> = StandardNormal.sample_iter(&mut rng).take(len).collect();
        let y1 = to_aggregated(&noise1);
        let y2 = to_aggregated(&noise2);
        rho_values_into(&y1, &y2, &t, scales, order, row);
    }

    let sims = config.simulations;
    let upper_index = ((sims as f64 * c).ceil() as usize)
        .saturating_sub(1)
        .min(sims - 1);
    let lower_index = sims - 1 - upper_index;

    let mut upper = Vec::with_capacity(scales.len());
    let mut lower = Vec::with_capacity(scales.len());
    let mut column = Vec::with_capacity(sims);
    for j in 0..scales.len() {
        column.clear();
        column.extend((0..sims).map(|i| simulated[i * scales.len() + j]));
        column.sort_by(f64::total_cmp);
        upper.push(column[upper_index]);
        lower.push(column[lower_index]);
    }

    Ok(RhoThresholds {
        scales: scales.to_vec(),
        upper,
        lower,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DfaConfig;
    use crate::dfa::dfa;
    use assert_approx_eq::assert_approx_eq;

    fn pair() -> (Vec<f64>, Vec<f64>) {
        let y1: Vec<f64> = (0..300)
            .map(|i| (i as f64 * 0.13).sin() * 4.0 + ((i * 17) % 7) as f64)
            .collect();
        let y2: Vec<f64> = (0..300)
            .map(|i| (i as f64 * 0.05).cos() * 2.0 - ((i * 11) % 5) as f64)
            .collect();
        (y1, y2)
    }

    #[test]
    fn test_disjoint_abs_with_identical_series_equals_dfa() {
        let (y, _) = pair();
        let scales = [6, 15, 40];
        for direction in [SegmentDirection::Forward, SegmentDirection::ForwardBackward] {
            let config = DccaConfig {
                polynomial_order: 2,
                windowing: DccaWindowing::Disjoint(direction),
                residual_product: ResidualProduct::Absolute,
            };
            let cross = dcca(&y, &y, None, &scales, &config).unwrap();
            let auto = dfa(
                &y,
                None,
                &scales,
                &DfaConfig {
                    polynomial_order: 2,
                    direction,
                },
            )
            .unwrap();
            for (a, b) in cross.iter().zip(&auto) {
                assert_approx_eq!(*a, *b, 1e-10 * b.abs());
            }
        }
    }

    #[test]
    fn test_signed_overlap_is_square_of_abs_for_identical_series() {
        let (y, _) = pair();
        let scales = [5, 12, 30];
        let abs = dcca(&y, &y, None, &scales, &DccaConfig::default()).unwrap();
        let signed = dcca(
            &y,
            &y,
            None,
            &scales,
            &DccaConfig {
                residual_product: ResidualProduct::Signed,
                ..DccaConfig::default()
            },
        )
        .unwrap();
        for (a, s) in abs.iter().zip(&signed) {
            assert_approx_eq!(a * a, *s, 1e-10 * s.abs());
        }
    }

    #[test]
    fn test_overlapping_hand_computed_values() {
        // N = 6, s = 3, order 0: three shifts over windows of four points.
        // Residual products per shift sum to 2.5, -5 and 10 (4.5, 9 and 18
        // in absolute value).
        let y1 = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let y2 = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
        let signed = DccaConfig {
            polynomial_order: 0,
            windowing: DccaWindowing::Overlapping,
            residual_product: ResidualProduct::Signed,
        };
        let f = dcca(&y1, &y2, None, &[3], &signed).unwrap();
        assert_approx_eq!(f[0], 7.5 / 6.0, 1e-12);

        let absolute = DccaConfig {
            residual_product: ResidualProduct::Absolute,
            ..signed
        };
        let f = dcca(&y1, &y2, None, &[3], &absolute).unwrap();
        assert_approx_eq!(f[0], 5.25_f64.sqrt(), 1e-12);

        let f = dcca(&y1, &y1, None, &[3], &signed).unwrap();
        assert_approx_eq!(f[0], 0.5, 1e-12);
    }

    #[test]
    fn test_disjoint_hand_computed_values() {
        // N = 7, s = 2, order 0: every window is a {0, 1} pair with residuals
        // ±0.5, so each contributes 0.5 and the offset pass doubles the count.
        let y = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let negated: Vec<f64> = y.iter().map(|v| -v).collect();
        for direction in [SegmentDirection::Forward, SegmentDirection::ForwardBackward] {
            let config = DccaConfig {
                polynomial_order: 0,
                windowing: DccaWindowing::Disjoint(direction),
                residual_product: ResidualProduct::Signed,
            };
            let f = dcca(&y, &y, None, &[2], &config).unwrap();
            assert_approx_eq!(f[0], 0.25, 1e-12);
            let f = dcca(&y, &negated, None, &[2], &config).unwrap();
            assert_approx_eq!(f[0], -0.25, 1e-12);
        }
    }

    #[test]
    fn test_disjoint_signed_with_identical_series_is_dfa_squared() {
        let (y, _) = pair();
        let scales = [6, 15, 40, 70];
        for direction in [SegmentDirection::Forward, SegmentDirection::ForwardBackward] {
            let config = DccaConfig {
                polynomial_order: 1,
                windowing: DccaWindowing::Disjoint(direction),
                residual_product: ResidualProduct::Signed,
            };
            let cov = dcca(&y, &y, None, &scales, &config).unwrap();
            let auto = dfa(
                &y,
                None,
                &scales,
                &DfaConfig {
                    polynomial_order: 1,
                    direction,
                },
            )
            .unwrap();
            for (c, f) in cov.iter().zip(&auto) {
                assert_approx_eq!(*c, f * f, 1e-10 * c.abs());
            }
        }
    }

    #[test]
    fn test_signed_can_be_negative() {
        let (y1, _) = pair();
        let y2: Vec<f64> = y1.iter().map(|v| -v).collect();
        let config = DccaConfig {
            residual_product: ResidualProduct::Signed,
            ..DccaConfig::default()
        };
        let f = dcca(&y1, &y2, None, &[10], &config).unwrap();
        assert!(f[0] < 0.0);
    }

    #[test]
    fn test_overlapping_bounds() {
        let (y1, y2) = pair();
        assert!(dcca(&y1, &y2, None, &[299], &DccaConfig::default()).is_ok());
        assert!(dcca(&y1, &y2, None, &[300], &DccaConfig::default()).is_err());
        let disjoint = DccaConfig {
            windowing: DccaWindowing::Disjoint(SegmentDirection::Forward),
            ..DccaConfig::default()
        };
        assert!(dcca(&y1, &y2, None, &[300], &disjoint).is_ok());
    }

    #[test]
    fn test_rho_bounds_and_sign() {
        let (y1, y2) = pair();
        let scales = [5, 20, 60];
        let rho = rho_dcca(&y1, &y2, None, &scales, 1).unwrap();
        assert!(rho.iter().all(|r| r.abs() <= 1.0 + 1e-12));

        let neg: Vec<f64> = y1.iter().map(|v| -2.0 * v + 3.0).collect();
        let rho = rho_dcca(&y1, &neg, None, &scales, 1).unwrap();
        for r in rho {
            assert_approx_eq!(r, -1.0, 1e-12);
        }
    }

    #[test]
    fn test_rho_thresholds_are_ordered_and_reproducible() {
        let config = RhoThresholdConfig {
            series_length: 200,
            simulations: 40,
            confidence_level: 0.9,
            polynomial_order: 1,
            seed: 7,
        };
        let scales = [8, 16, 32];
        let first = rho_thresholds(&scales, &config).unwrap();
        let second = rho_thresholds(&scales, &config).unwrap();
        assert_eq!(first, second);
        for (u, l) in first.upper.iter().zip(&first.lower) {
            assert!(l <= u);
            assert!(u.abs() <= 1.0 && l.abs() <= 1.0);
        }
    }

    #[test]
    fn test_rho_thresholds_rejects_bad_config() {
        let mut config = RhoThresholdConfig {
            confidence_level: 1.0,
            ..RhoThresholdConfig::default()
        };
        assert!(rho_thresholds(&[10], &config).is_err());
        config.confidence_level = 0.95;
        config.simulations = 0;
        assert!(rho_thresholds(&[10], &config).is_err());
        config.simulations = 10;
        config.series_length = 10;
        assert!(rho_thresholds(&[10], &config).is_err());
    }
}
