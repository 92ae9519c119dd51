//! Error types and shape validation for the fluctuation kernels.
//!
//! The kernels themselves have no recoverable error path: once inputs pass the
//! checks in this module, every output slot is computed and numeric degeneracy
//! (singular fits, zero-variance windows, NaN inputs) shows up as non-finite
//! values in the affected slot. Everything here runs before parallel work starts.

use thiserror::Error;

/// Errors raised while validating the inputs of a fluctuation computation.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FluctuationError {
    /// Not enough observations for the requested computation.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Two arrays that must share a length do not.
    #[error("Length mismatch: {name} has length {actual}, expected {expected}")]
    LengthMismatch {
        /// Name of the offending array
        name: &'static str,
        /// Length the array should have
        expected: usize,
        /// Length the array actually has
        actual: usize,
    },

    /// The abscissa is not strictly increasing.
    #[error("Abscissa must be strictly increasing: t[{index}] = {value} does not exceed t[{}] = {previous}", .index - 1)]
    NonMonotonicAbscissa {
        /// Index of the first element that fails to increase
        index: usize,
        /// Value at `index - 1`
        previous: f64,
        /// Value at `index`
        value: f64,
    },

    /// A window size cannot be used with the given series and polynomial order.
    #[error("Invalid scale {scale}: expected {constraint}")]
    InvalidScale {
        /// Offending window size
        scale: usize,
        /// Valid range description
        constraint: String,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: &'static str,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// A caller-owned output buffer has the wrong size.
    #[error("Output buffer has length {actual}, expected {expected}")]
    OutputLength {
        /// Required number of slots
        expected: usize,
        /// Slots actually provided
        actual: usize,
    },
}

/// Result type for fluctuation computations.
pub type FluctuationResult<T> = Result<T, FluctuationError>;

/// Validates that a series has at least `min_required` observations.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2).is_ok());
/// assert!(validate_data_length(&data, 5).is_err());
/// ```
pub fn validate_data_length(data: &[f64], min_required: usize) -> FluctuationResult<()> {
    if data.len() < min_required {
        Err(FluctuationError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that `data` has exactly `expected` elements.
pub fn validate_same_length(
    data: &[f64],
    expected: usize,
    name: &'static str,
) -> FluctuationResult<()> {
    if data.len() != expected {
        return Err(FluctuationError::LengthMismatch {
            name,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Validates that an abscissa is strictly increasing.
///
/// NaN entries fail the comparison and are reported as non-monotonic.
pub fn validate_abscissa(t: &[f64]) -> FluctuationResult<()> {
    for (i, pair) in t.windows(2).enumerate() {
        if !(pair[1] > pair[0]) {
            return Err(FluctuationError::NonMonotonicAbscissa {
                index: i + 1,
                previous: pair[0],
                value: pair[1],
            });
        }
    }
    Ok(())
}

/// Validates every scale against `min..=max`.
///
/// `min` is derived from the polynomial order by the caller: a window fit needs
/// strictly more points than basis terms.
pub fn validate_scales(scales: &[usize], min: usize, max: usize) -> FluctuationResult<()> {
    if let Some(&scale) = scales.iter().find(|&&s| s < min || s > max) {
        let constraint = if min > max {
            format!(
                "no admissible scale exists (needs at least {} points per window but the series only allows {})",
                min, max
            )
        } else {
            format!("{} <= scale <= {}", min, max)
        };
        return Err(FluctuationError::InvalidScale { scale, constraint });
    }
    Ok(())
}

/// Validates that a parameter lies strictly inside `(min, max)`.
///
/// # Example
/// ```rust
/// use fractal_fluctuation::errors::validate_open_interval;
///
/// assert!(validate_open_interval(0.95, 0.0, 1.0, "confidence_level").is_ok());
/// assert!(validate_open_interval(1.0, 0.0, 1.0, "confidence_level").is_err());
/// ```
pub fn validate_open_interval(
    value: f64,
    min: f64,
    max: f64,
    name: &'static str,
) -> FluctuationResult<()> {
    if value > min && value < max {
        Ok(())
    } else {
        Err(FluctuationError::InvalidParameter {
            parameter: name,
            value,
            constraint: format!("({}, {})", min, max),
        })
    }
}

/// Validates that a caller-owned output buffer has exactly `expected` slots.
pub fn validate_output_length(out: &[f64], expected: usize) -> FluctuationResult<()> {
    if out.len() != expected {
        return Err(FluctuationError::OutputLength {
            expected,
            actual: out.len(),
        });
    }
    Ok(())
}
