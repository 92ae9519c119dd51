//! Scaling and consistency properties of the fluctuation kernels.
//!
//! Relations that must hold between variants (MF-DFA at q = 2 against DFA,
//! MF-DCCA of a series with itself against MF-DFA, …) and the statistical
//! scaling of white noise, all on seeded random input.

use assert_approx_eq::assert_approx_eq;
use fractal_fluctuation::scales::pow_range_by_step;
use fractal_fluctuation::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

fn white_noise(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    StandardNormal.sample_iter(&mut rng).take(n).collect()
}

fn log_log_slope(scales: &[usize], f: &[f64]) -> f64 {
    let x: Vec<f64> = scales.iter().map(|&s| (s as f64).ln()).collect();
    let y: Vec<f64> = f.iter().map(|v| v.ln()).collect();
    let mut c = [0.0; 2];
    polynomial_fit(&x, &y, &mut c);
    c[1]
}

fn assert_close(a: &[f64], b: &[f64], rel: f64) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_approx_eq!(*x, *y, rel * y.abs().max(1e-300));
    }
}

#[test]
fn test_white_noise_dfa_exponent() {
    let profile = to_aggregated(&white_noise(8192, 2024));
    let scales = pow_range_by_step(4, 9, 1, 2).unwrap();
    for config in [DfaConfig::forward(1), DfaConfig::forward_backward(2)] {
        let f = dfa(&profile, None, &scales, &config).unwrap();
        let h = log_log_slope(&scales, &f);
        assert!((h - 0.5).abs() < 0.1, "H = {} for {:?}", h, config);
    }
}

#[test]
fn test_random_walk_exponent_is_steeper() {
    // Profile of a profile: H ≈ 1.5 for white-noise input
    let walk = to_aggregated(&to_aggregated(&white_noise(4096, 99)));
    let scales = pow_range_by_step(4, 8, 1, 2).unwrap();
    let f = dfa(&walk, None, &scales, &DfaConfig::forward(2)).unwrap();
    let h = log_log_slope(&scales, &f);
    assert!((h - 1.5).abs() < 0.15, "H = {}", h);
}

#[test]
fn test_q_zero_continuity() {
    let profile = to_aggregated(&white_noise(2048, 5));
    let scales = [16, 64, 256];
    let eps = 1e-6;
    let m = mfdfa(&profile, None, &scales, &[-eps, 0.0, eps], &DfaConfig::default()).unwrap();
    for si in 0..scales.len() {
        let at_zero = m[(1, si)];
        assert!((m[(0, si)] - at_zero).abs() < 1e-4 * at_zero);
        assert!((m[(2, si)] - at_zero).abs() < 1e-4 * at_zero);
    }
}

#[test]
fn test_forward_backward_equals_forward_on_exact_multiple() {
    let y = to_aggregated(&white_noise(100, 8));
    let fw = dfa(&y, None, &[10], &DfaConfig::forward(1)).unwrap();
    let fb = dfa(&y, None, &[10], &DfaConfig::forward_backward(1)).unwrap();
    assert_approx_eq!(fw[0], fb[0], 1e-13 * fw[0]);

    let fw = mfdfa(&y, None, &[10, 20], &[-2.0, 0.0, 3.0], &DfaConfig::forward(1)).unwrap();
    let fb = mfdfa(&y, None, &[10, 20], &[-2.0, 0.0, 3.0], &DfaConfig::forward_backward(1)).unwrap();
    assert_close(fw.values(), fb.values(), 1e-12);
}

#[test]
fn test_mfdfa_q2_equals_dfa() {
    let y = to_aggregated(&white_noise(1000, 13));
    let scales = [10, 33, 100, 250];
    for config in [DfaConfig::forward(1), DfaConfig::forward_backward(3)] {
        let plain = dfa(&y, None, &scales, &config).unwrap();
        let mf = mfdfa(&y, None, &scales, &[2.0], &config).unwrap();
        assert_close(mf.row(0), &plain, 1e-12);
    }
}

#[test]
fn test_mfdcca_of_identical_series_equals_mfdfa() {
    let y = to_aggregated(&white_noise(600, 21));
    let scales = [8, 30, 120];
    let q = [-3.0, -1.0, 0.0, 2.0, 5.0];
    let config = DfaConfig::forward_backward(1);
    let auto = mfdfa(&y, None, &scales, &q, &config).unwrap();
    let cross = mfdcca(&y, &y, None, &scales, &q, &config).unwrap();
    assert_close(cross.values(), auto.values(), 1e-10);
}

#[test]
fn test_disjoint_dcca_of_identical_series_equals_dfa() {
    let y = to_aggregated(&white_noise(700, 34));
    let scales = [7, 50, 300];
    for direction in [SegmentDirection::Forward, SegmentDirection::ForwardBackward] {
        let config = DccaConfig {
            polynomial_order: 2,
            windowing: DccaWindowing::Disjoint(direction),
            residual_product: ResidualProduct::Absolute,
        };
        let dfa_config = DfaConfig {
            polynomial_order: 2,
            direction,
        };
        let cross = dcca(&y, &y, None, &scales, &config).unwrap();
        let plain = dfa(&y, None, &scales, &dfa_config).unwrap();
        assert_close(&cross, &plain, 1e-12);
    }
}

#[test]
fn test_disjoint_signed_dcca_of_identical_series_is_dfa_squared() {
    let y = to_aggregated(&white_noise(700, 35));
    let scales = [7, 50, 300];
    for direction in [SegmentDirection::Forward, SegmentDirection::ForwardBackward] {
        let config = DccaConfig {
            polynomial_order: 2,
            windowing: DccaWindowing::Disjoint(direction),
            residual_product: ResidualProduct::Signed,
        };
        let dfa_config = DfaConfig {
            polynomial_order: 2,
            direction,
        };
        let cov = dcca(&y, &y, None, &scales, &config).unwrap();
        let plain = dfa(&y, None, &scales, &dfa_config).unwrap();
        let squared: Vec<f64> = plain.iter().map(|f| f * f).collect();
        assert_close(&cov, &squared, 1e-12);
    }
}

#[test]
fn test_overlapping_dcca_normalisation() {
    // N = 6, s = 3, order 0: windows of s + 1 = 4 points at shifts 0, 1, 2;
    // residual products per shift sum to 2.5, -5 and 10 (4.5, 9 and 18 in
    // absolute value), over (N - s)(s - 1) = 6.
    let y1 = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
    let y2 = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
    let signed = DccaConfig {
        polynomial_order: 0,
        windowing: DccaWindowing::Overlapping,
        residual_product: ResidualProduct::Signed,
    };
    let cov = dcca(&y1, &y2, None, &[3], &signed).unwrap();
    assert_approx_eq!(cov[0], 1.25, 1e-12);

    let absolute = dcca(
        &y1,
        &y2,
        None,
        &[3],
        &DccaConfig {
            residual_product: ResidualProduct::Absolute,
            ..signed
        },
    )
    .unwrap();
    assert_approx_eq!(absolute[0], 5.25_f64.sqrt(), 1e-12);
}

#[test]
fn test_signed_overlapping_dcca_is_square_of_absolute() {
    let y = to_aggregated(&white_noise(500, 55));
    let scales = [5, 20, 80];
    let absolute = dcca(&y, &y, None, &scales, &DccaConfig::default()).unwrap();
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
    for (a, s) in absolute.iter().zip(&signed) {
        assert_approx_eq!(a * a, *s, 1e-12 * s);
    }
}

#[test]
fn test_dcca_symmetry() {
    let y1 = to_aggregated(&white_noise(400, 1));
    let y2 = to_aggregated(&white_noise(400, 2));
    let scales = [6, 25, 100];
    let configs = [
        DccaConfig::default(),
        DccaConfig {
            residual_product: ResidualProduct::Signed,
            ..DccaConfig::default()
        },
        DccaConfig {
            windowing: DccaWindowing::Disjoint(SegmentDirection::ForwardBackward),
            ..DccaConfig::default()
        },
    ];
    for config in &configs {
        let ab = dcca(&y1, &y2, None, &scales, config).unwrap();
        let ba = dcca(&y2, &y1, None, &scales, config).unwrap();
        assert_close(&ab, &ba, 1e-12);
    }
}

#[test]
fn test_rho_dcca_extremes() {
    let y = to_aggregated(&white_noise(500, 77));
    let negated: Vec<f64> = y.iter().map(|v| -v).collect();
    let scales = [10, 50, 200];

    let same = rho_dcca(&y, &y, None, &scales, 1).unwrap();
    let opposite = rho_dcca(&y, &negated, None, &scales, 1).unwrap();
    for (s, o) in same.iter().zip(&opposite) {
        assert_approx_eq!(*s, 1.0, 1e-12);
        assert_approx_eq!(*o, -1.0, 1e-12);
    }

    let other = to_aggregated(&white_noise(500, 78));
    for r in rho_dcca(&y, &other, None, &scales, 1).unwrap() {
        assert!((-1.0..=1.0).contains(&r), "rho = {}", r);
    }
}

#[test]
fn test_ht_equals_dfa_of_the_window() {
    let y = to_aggregated(&white_noise(300, 3));
    let t = natural_abscissa(300);
    let (start, scale) = (123, 40);
    let ht = ht_fluctuation(&y, None, scale, 1, start).unwrap();
    let window = &y[start..start + scale];
    let f = dfa(
        window,
        Some(&t[start..start + scale]),
        &[scale],
        &DfaConfig::default(),
    )
    .unwrap();
    assert_approx_eq!(ht, f[0], 1e-12 * f[0]);

    let profile = ht_profile(&y, None, scale, 1).unwrap();
    assert_approx_eq!(profile[start], ht, 1e-12 * ht);
}

#[test]
fn test_udfa_sign_symmetry() {
    let y = to_aggregated(&white_noise(400, 17));
    let negated: Vec<f64> = y.iter().map(|v| -v).collect();
    let scales = [8, 32, 128];
    let a = udfa(&y, None, &scales, 1).unwrap();
    let b = udfa(&negated, None, &scales, 1).unwrap();
    assert!(a.iter().all(|v| v.is_finite() && *v > 0.0));
    assert_close(&a, &b, 1e-12);
}

#[test]
fn test_udfa_white_noise_exponent() {
    let profile = to_aggregated(&white_noise(4096, 64));
    let scales = pow_range_by_step(3, 8, 1, 2).unwrap();
    let f = udfa(&profile, None, &scales, 1).unwrap();
    let h = log_log_slope(&scales, &f);
    assert!((h - 0.5).abs() < 0.12, "H = {}", h);
}
