//! # Analysis Configuration
//!
//! Configuration structures for the fluctuation kernels: polynomial order,
//! segment direction, DCCA windowing and residual combination, and the
//! Monte Carlo settings of the DCCA correlation thresholds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which ends of the series the non-overlapping windows are anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SegmentDirection {
    /// Windows `[v·s, (v+1)·s)` from the start of the series.
    #[default]
    Forward,
    /// Forward windows plus the same windows shifted to end at the last sample.
    ForwardBackward,
}

impl SegmentDirection {
    /// Number of passes over the series (1 or 2).
    pub fn passes(self) -> usize {
        match self {
            SegmentDirection::Forward => 1,
            SegmentDirection::ForwardBackward => 2,
        }
    }
}

/// Configuration for DFA and MF-DFA (and MF-DCCA, which shares the layout)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DfaConfig {
    /// Polynomial order for detrending
    pub polynomial_order: usize,
    /// Window anchoring
    pub direction: SegmentDirection,
}

impl Default for DfaConfig {
    fn default() -> Self {
        Self {
            polynomial_order: 1, // Linear detrending is most common
            direction: SegmentDirection::Forward,
        }
    }
}

impl DfaConfig {
    /// Forward-only windows with the given polynomial order
    pub fn forward(polynomial_order: usize) -> Self {
        Self {
            polynomial_order,
            direction: SegmentDirection::Forward,
        }
    }

    /// Forward and tail-anchored windows with the given polynomial order
    pub fn forward_backward(polynomial_order: usize) -> Self {
        Self {
            polynomial_order,
            direction: SegmentDirection::ForwardBackward,
        }
    }
}

/// Window layout for DCCA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DccaWindowing {
    /// Every shift `v` in `[0, N - s)`, windows of `s + 1` points.
    Overlapping,
    /// Non-overlapping windows of `s` points.
    Disjoint(SegmentDirection),
}

/// How the residuals of the two series are combined inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResidualProduct {
    /// `Σ |r1·r2|`, closed with a square root
    Absolute,
    /// `Σ r1·r2`, left squared (can be negative)
    Signed,
}

impl ResidualProduct {
    #[inline]
    pub(crate) fn combine(self, r1: f64, r2: f64) -> f64 {
        match self {
            ResidualProduct::Absolute => (r1 * r2).abs(),
            ResidualProduct::Signed => r1 * r2,
        }
    }

    #[inline]
    pub(crate) fn close(self, mean: f64) -> f64 {
        match self {
            ResidualProduct::Absolute => mean.sqrt(),
            ResidualProduct::Signed => mean,
        }
    }
}

/// Configuration for DCCA
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DccaConfig {
    /// Polynomial order for detrending
    pub polynomial_order: usize,
    /// Window layout
    pub windowing: DccaWindowing,
    /// Residual combination
    pub residual_product: ResidualProduct,
}

impl Default for DccaConfig {
    fn default() -> Self {
        Self {
            polynomial_order: 1,
            windowing: DccaWindowing::Overlapping,
            residual_product: ResidualProduct::Absolute,
        }
    }
}

/// Monte Carlo settings for the confidence thresholds of the DCCA coefficient
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RhoThresholdConfig {
    /// Length of each simulated series
    pub series_length: usize,
    /// Number of simulated pairs
    pub simulations: usize,
    /// Confidence level in (0, 1)
    pub confidence_level: f64,
    /// Polynomial order for detrending
    pub polynomial_order: usize,
    /// RNG seed, so thresholds are reproducible
    pub seed: u64,
}

impl Default for RhoThresholdConfig {
    fn default() -> Self {
        Self {
            series_length: 1000,
            simulations: 100,
            confidence_level: 0.95,
            polynomial_order: 1,
            seed: 42,
        }
    }
}
