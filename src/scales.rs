//! Window-size generators.
//!
//! Linearly or geometrically spaced integer scales, end points included. The
//! generators do not look at any series; picking a range that fits the data is
//! left to the caller.

use crate::errors::{FluctuationError, FluctuationResult};

fn require_positive_step(step: usize) -> FluctuationResult<()> {
    if step == 0 {
        return Err(FluctuationError::InvalidParameter {
            parameter: "step",
            value: 0.0,
            constraint: "step >= 1".to_string(),
        });
    }
    Ok(())
}

/// `start, start + step, …` up to and including `end`. Empty when `end < start`.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::scales::lin_range_by_step;
///
/// assert_eq!(lin_range_by_step(10, 20, 5).unwrap(), vec![10, 15, 20]);
/// ```
pub fn lin_range_by_step(start: usize, end: usize, step: usize) -> FluctuationResult<Vec<usize>> {
    require_positive_step(step)?;
    if end < start {
        return Ok(Vec::new());
    }
    Ok((start..=end).step_by(step).collect())
}

/// `count` evenly spaced integers from `start` to `end`, truncated toward zero.
///
/// `None`, or a count larger than `end - start + 1`, yields every integer in
/// the range.
pub fn lin_range_by_count(
    start: usize,
    end: usize,
    count: Option<usize>,
) -> FluctuationResult<Vec<usize>> {
    if end < start {
        return Err(FluctuationError::InvalidParameter {
            parameter: "end",
            value: end as f64,
            constraint: format!("end >= start ({})", start),
        });
    }
    let span = end - start + 1;
    let count = match count {
        Some(c) if c <= span => c,
        _ => span,
    };

    Ok(match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) as f64 / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        (start as f64 + i as f64 * step) as usize
                    }
                })
                .collect()
        }
    })
}

fn powers(base: usize, exponents: &[usize]) -> FluctuationResult<Vec<usize>> {
    if base < 2 {
        return Err(FluctuationError::InvalidParameter {
            parameter: "base",
            value: base as f64,
            constraint: "base >= 2".to_string(),
        });
    }
    exponents
        .iter()
        .map(|&e| {
            u32::try_from(e)
                .ok()
                .and_then(|e| base.checked_pow(e))
                .ok_or_else(|| FluctuationError::InvalidParameter {
                    parameter: "exponent",
                    value: e as f64,
                    constraint: format!("base^exponent must fit in usize (base = {})", base),
                })
        })
        .collect()
}

/// `base` raised to `start, start + step, …, end`.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::scales::pow_range_by_step;
///
/// assert_eq!(pow_range_by_step(3, 6, 1, 2).unwrap(), vec![8, 16, 32, 64]);
/// ```
pub fn pow_range_by_step(
    start: usize,
    end: usize,
    step: usize,
    base: usize,
) -> FluctuationResult<Vec<usize>> {
    let exponents = lin_range_by_step(start, end, step)?;
    powers(base, &exponents)
}

/// `base` raised to `count` evenly spaced integer exponents in `start..=end`.
pub fn pow_range_by_count(
    start: usize,
    end: usize,
    count: Option<usize>,
    base: usize,
) -> FluctuationResult<Vec<usize>> {
    let exponents = lin_range_by_count(start, end, count)?;
    powers(base, &exponents)
}
