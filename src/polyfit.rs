//! Ordinary least-squares polynomial fitting for window detrending.
//!
//! The design matrix is built on an affinely rescaled abscissa
//! `u = (x - centre) / half_range`, which keeps the Vandermonde columns in
//! `[-1, 1]` regardless of where the window sits in the series. Rescaling does
//! not change the least-squares minimiser; coefficients in the raw `x` basis are
//! recovered on request by [`PolynomialFit::coefficients_into`].

use crate::linear_algebra::{householder_least_squares, FlatMatrix};

/// Fit a polynomial to `(dx, dy)` by ordinary least squares.
///
/// `coeffs.len()` is the number of basis terms (polynomial order + 1); on
/// return it holds the coefficients in ascending power order, `coeffs[0]`
/// being the constant term.
///
/// Requires `dx.len() == dy.len() >= coeffs.len()`; this is a caller
/// precondition and is only checked in debug builds.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::polynomial_fit;
///
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [3.0, 5.0, 7.0, 9.0];
/// let mut c = [0.0; 2];
/// polynomial_fit(&x, &y, &mut c);
/// assert!((c[0] - 1.0).abs() < 1e-10);
/// assert!((c[1] - 2.0).abs() < 1e-10);
/// ```
pub fn polynomial_fit(dx: &[f64], dy: &[f64], coeffs: &mut [f64]) {
    let mut fitter = PolynomialFitter::new(dx.len(), coeffs.len());
    fitter.fit(dx, dy).coefficients_into(coeffs);
}

/// Reusable least-squares fitter owning all scratch storage.
///
/// One fitter is created per worker and reused for every window it detrends;
/// buffers grow to the largest window seen and are never shrunk.
#[derive(Debug, Clone)]
pub struct PolynomialFitter {
    terms: usize,
    design: FlatMatrix,
    rhs: Vec<f64>,
    scaled: Vec<f64>,
}

impl PolynomialFitter {
    /// Create a fitter for `terms` basis functions and windows of up to
    /// `max_obs` points.
    pub fn new(max_obs: usize, terms: usize) -> Self {
        Self {
            terms,
            design: FlatMatrix::new(max_obs, terms),
            rhs: vec![0.0; max_obs],
            scaled: vec![0.0; terms],
        }
    }

    /// Create a fitter for a polynomial of the given order.
    pub fn with_order(max_obs: usize, polynomial_order: usize) -> Self {
        Self::new(max_obs, polynomial_order + 1)
    }

    /// Fit the polynomial to `(x, y)` and return a view of the fitted trend.
    pub fn fit(&mut self, x: &[f64], y: &[f64]) -> PolynomialFit<'_> {
        let obs = x.len();
        debug_assert_eq!(obs, y.len(), "abscissa and ordinate lengths differ");
        debug_assert!(obs >= self.terms, "fit is underdetermined");

        let (centre, half_range) = affine_frame(x);

        self.design.set_rows(obs);
        if self.rhs.len() < obs {
            self.rhs.resize(obs, 0.0);
        }
        for (i, (&xi, &yi)) in x.iter().zip(y).enumerate() {
            let u = (xi - centre) / half_range;
            let mut power = 1.0;
            for cell in self.design.row_mut(i) {
                *cell = power;
                power *= u;
            }
            self.rhs[i] = yi;
        }

        householder_least_squares(&mut self.design, &mut self.rhs[..obs], &mut self.scaled);

        PolynomialFit {
            scaled: &self.scaled,
            centre,
            half_range,
        }
    }
}

/// A fitted polynomial trend, borrowed from its [`PolynomialFitter`].
#[derive(Debug, Clone, Copy)]
pub struct PolynomialFit<'a> {
    scaled: &'a [f64],
    centre: f64,
    half_range: f64,
}

impl PolynomialFit<'_> {
    /// Evaluate the trend at `x`.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        let u = (x - self.centre) / self.half_range;
        self.scaled.iter().rev().fold(0.0, |acc, &c| acc * u + c)
    }

    /// Write `y - trend(x)` into `out`.
    pub fn residuals_into(&self, x: &[f64], y: &[f64], out: &mut [f64]) {
        debug_assert!(x.len() == y.len() && y.len() == out.len());
        for ((r, &xi), &yi) in out.iter_mut().zip(x).zip(y) {
            *r = yi - self.evaluate(xi);
        }
    }

    /// Residual sum of squares over `(x, y)`.
    pub fn sum_squared_residuals(&self, x: &[f64], y: &[f64]) -> f64 {
        x.iter()
            .zip(y)
            .map(|(&xi, &yi)| {
                let r = yi - self.evaluate(xi);
                r * r
            })
            .sum()
    }

    /// Coefficients in the raw `x` basis, ascending power order.
    ///
    /// Expands `Σ c_k ((x - centre) / half_range)^k` by Horner composition.
    pub fn coefficients_into(&self, out: &mut [f64]) {
        let terms = self.scaled.len();
        debug_assert_eq!(out.len(), terms);
        out.fill(0.0);
        if terms == 0 {
            return;
        }

        // u = a·x + b
        let a = 1.0 / self.half_range;
        let b = -self.centre / self.half_range;

        out[0] = self.scaled[terms - 1];
        let mut degree = 0;
        for k in (0..terms - 1).rev() {
            // out ← out·(a·x + b), walking down so lower entries are still unmodified
            for i in (0..=degree + 1).rev() {
                let carried = if i >= 1 { a * out[i - 1] } else { 0.0 };
                let kept = if i <= degree { b * out[i] } else { 0.0 };
                out[i] = carried + kept;
            }
            degree += 1;
            out[0] += self.scaled[k];
        }
    }
}

/// Centre and half-width of the abscissa range, with a unit width fallback
/// for single-point or degenerate ranges.
fn affine_frame(x: &[f64]) -> (f64, f64) {
    let (lo, hi) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let half_range = 0.5 * (hi - lo);
    if half_range > 0.0 && half_range.is_finite() {
        (0.5 * (hi + lo), half_range)
    } else if lo.is_finite() {
        (lo, 1.0)
    } else {
        (0.0, 1.0)
    }
}
