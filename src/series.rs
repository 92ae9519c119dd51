//! Series helpers used around the kernels: the default abscissa and the
//! mean-removed cumulative profile.
//!
//! The fluctuation routines never call [`to_aggregated`] on their inputs; the
//! caller decides whether a series is analysed raw or as a profile.

/// The default abscissa `1.0, 2.0, …, n`.
pub fn natural_abscissa(n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64).collect()
}

/// Mean ignoring NaN entries; NaN when every entry is NaN.
fn nan_mean(data: &[f64]) -> f64 {
    let (sum, count) = data
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Subtract the (NaN-ignoring) mean from every element.
pub fn subtract_mean(data: &[f64]) -> Vec<f64> {
    let mean = nan_mean(data);
    data.iter().map(|&v| v - mean).collect()
}

/// Cumulative sum of the mean-removed series (the DFA "profile").
///
/// NaN entries are skipped in the mean and contribute zero to the running sum.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::series::to_aggregated;
///
/// let profile = to_aggregated(&[1.0, 2.0, 3.0]);
/// assert_eq!(profile, vec![-1.0, -1.0, 0.0]);
/// ```
pub fn to_aggregated(data: &[f64]) -> Vec<f64> {
    let mean = nan_mean(data);
    data.iter()
        .scan(0.0, |acc, &v| {
            let centred = v - mean;
            if !centred.is_nan() {
                *acc += centred;
            }
            Some(*acc)
        })
        .collect()
}
