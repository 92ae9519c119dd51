//! Machinery shared by every fluctuation variant: input preparation, window
//! placement, per-window residual statistics, the generalized q-mean and the
//! parallel fill of output slots.

use std::borrow::Cow;

use crate::config::{ResidualProduct, SegmentDirection};
use crate::errors::{
    validate_abscissa, validate_data_length, validate_same_length, FluctuationResult,
};
use crate::polyfit::PolynomialFitter;
use crate::series::natural_abscissa;

/// Per-task scratch: one fitter plus two residual buffers.
#[derive(Debug, Clone)]
pub(crate) struct Workspace {
    pub fitter: PolynomialFitter,
    pub residuals_a: Vec<f64>,
    pub residuals_b: Vec<f64>,
}

impl Workspace {
    pub fn new(max_window: usize, terms: usize) -> Self {
        Self {
            fitter: PolynomialFitter::new(max_window, terms),
            residuals_a: vec![0.0; max_window],
            residuals_b: vec![0.0; max_window],
        }
    }

    pub fn reserve(&mut self, len: usize) {
        if self.residuals_a.len() < len {
            self.residuals_a.resize(len, 0.0);
            self.residuals_b.resize(len, 0.0);
        }
    }
}

/// Check a univariate input and resolve its abscissa.
pub(crate) fn prepare_series<'a>(
    y: &[f64],
    t: Option<&'a [f64]>,
) -> FluctuationResult<Cow<'a, [f64]>> {
    validate_data_length(y, 1)?;
    match t {
        Some(t) => {
            validate_same_length(t, y.len(), "abscissa")?;
            validate_abscissa(t)?;
            Ok(Cow::Borrowed(t))
        }
        None => Ok(Cow::Owned(natural_abscissa(y.len()))),
    }
}

/// Check a bivariate input and resolve the shared abscissa.
pub(crate) fn prepare_pair<'a>(
    y1: &[f64],
    y2: &[f64],
    t: Option<&'a [f64]>,
) -> FluctuationResult<Cow<'a, [f64]>> {
    validate_same_length(y2, y1.len(), "second series")?;
    prepare_series(y1, t)
}

/// Emit the dispatch record and flag duplicate scales.
pub(crate) fn log_dispatch(variant: &str, n: usize, scales: &[usize], q_count: usize, order: usize) {
    log::debug!(
        "{}: N = {}, {} scales, {} q values, polynomial order {}",
        variant,
        n,
        scales.len(),
        q_count,
        order
    );
    let mut sorted = scales.to_vec();
    sorted.sort_unstable();
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        log::warn!(
            "{}: duplicate scales requested; each occurrence is computed separately",
            variant
        );
    }
}

/// Largest scale in the list, used to size per-task buffers.
pub(crate) fn max_scale(scales: &[usize]) -> usize {
    scales.iter().copied().max().unwrap_or(0)
}

/// Window starts for non-overlapping segmentation.
///
/// Forward windows are `[v·s, (v+1)·s)` for `v < ⌊N/s⌋`. With
/// [`SegmentDirection::ForwardBackward`] each forward window is followed by
/// its tail-anchored twin shifted by `N - ⌊N/s⌋·s`.
pub(crate) fn disjoint_starts(
    n: usize,
    scale: usize,
    direction: SegmentDirection,
) -> impl Iterator<Item = usize> {
    let windows = n / scale;
    let offset = n - windows * scale;
    let backward = direction == SegmentDirection::ForwardBackward;
    (0..windows).flat_map(move |v| {
        let start = v * scale;
        std::iter::once(start).chain(backward.then_some(start + offset))
    })
}

/// Residual sum of squares of a polynomial fit over `[start, start + len)`.
#[inline]
pub(crate) fn squared_residual_sum(
    fitter: &mut PolynomialFitter,
    t: &[f64],
    y: &[f64],
    start: usize,
    len: usize,
) -> f64 {
    let tw = &t[start..start + len];
    let yw = &y[start..start + len];
    fitter.fit(tw, yw).sum_squared_residuals(tw, yw)
}

/// Sum of combined residual products of two series over `[start, start + len)`.
///
/// Both series are detrended against the same abscissa slice.
pub(crate) fn cross_residual_sum(
    ws: &mut Workspace,
    t: &[f64],
    y1: &[f64],
    y2: &[f64],
    start: usize,
    len: usize,
    product: ResidualProduct,
) -> f64 {
    ws.reserve(len);
    let tw = &t[start..start + len];
    let r1 = &mut ws.residuals_a[..len];
    let r2 = &mut ws.residuals_b[..len];
    ws.fitter
        .fit(tw, &y1[start..start + len])
        .residuals_into(tw, &y1[start..start + len], r1);
    ws.fitter
        .fit(tw, &y2[start..start + len])
        .residuals_into(tw, &y2[start..start + len], r2);
    r1.iter().zip(r2.iter()).map(|(&a, &b)| product.combine(a, b)).sum()
}

/// Detrend `y` over `[start, start + len)` into the first residual buffer.
pub(crate) fn window_residuals<'w>(
    ws: &'w mut Workspace,
    t: &[f64],
    y: &[f64],
    start: usize,
    len: usize,
) -> &'w [f64] {
    ws.reserve(len);
    let tw = &t[start..start + len];
    let yw = &y[start..start + len];
    let out = &mut ws.residuals_a[..len];
    ws.fitter.fit(tw, yw).residuals_into(tw, yw, out);
    out
}

/// Generalized power mean of per-window mean squares.
///
/// For `q != 0` this is `(mean(v^(q/2)))^(1/q)`; at exactly `q == 0` the
/// closed form `exp(mean(ln v) / 2)` is used instead of the limit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GeneralizedMean {
    q: f64,
    acc: f64,
    count: usize,
}

impl GeneralizedMean {
    pub fn new(q: f64) -> Self {
        Self {
            q,
            acc: 0.0,
            count: 0,
        }
    }

    #[inline]
    #[allow(clippy::float_cmp)]
    pub fn push(&mut self, mean_square: f64) {
        if self.q == 0.0 {
            self.acc += mean_square.ln();
        } else {
            self.acc += mean_square.powf(0.5 * self.q);
        }
        self.count += 1;
    }

    #[allow(clippy::float_cmp)]
    pub fn finish(self) -> f64 {
        let count = self.count as f64;
        if self.q == 0.0 {
            (self.acc / (2.0 * count)).exp()
        } else {
            (self.acc / count).powf(1.0 / self.q)
        }
    }
}

/// Evaluate `task` for every output slot.
///
/// Each slot is written by exactly one task. With the `parallel` feature the
/// slots are distributed over the rayon pool and every worker gets its own
/// [`Workspace`], sized for windows of up to `max_window` points.
pub(crate) fn fill_slots<F>(out: &mut [f64], max_window: usize, terms: usize, task: F)
where
    F: Fn(&mut Workspace, usize) -> f64 + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        out.par_iter_mut().enumerate().for_each_init(
            || Workspace::new(max_window, terms),
            |ws, (slot, value)| *value = task(ws, slot),
        );
    }

    #[cfg(not(feature = "parallel"))]
    {
        let mut ws = Workspace::new(max_window, terms);
        for (slot, value) in out.iter_mut().enumerate() {
            *value = task(&mut ws, slot);
        }
    }
}
