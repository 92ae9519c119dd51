//! # Result Structures
//!
//! Dense outputs of the multifractal kernels and of the DCCA threshold
//! simulation.

use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fluctuation values for every `(q, scale)` pair, row-major by q.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FluctuationMatrix {
    q_values: Vec<f64>,
    scales: Vec<usize>,
    values: Vec<f64>,
}

impl FluctuationMatrix {
    /// Zero-filled matrix for the given moment orders and scales
    pub(crate) fn zeroed(q_values: &[f64], scales: &[usize]) -> Self {
        Self {
            q_values: q_values.to_vec(),
            scales: scales.to_vec(),
            values: vec![0.0; q_values.len() * scales.len()],
        }
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Moment orders, one per row
    pub fn q_values(&self) -> &[f64] {
        &self.q_values
    }

    /// Window sizes, one per column
    pub fn scales(&self) -> &[usize] {
        &self.scales
    }

    /// Flat row-major storage
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the matrix and return the row-major buffer
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Value for the `q_index`-th moment order at the `scale_index`-th scale
    pub fn get(&self, q_index: usize, scale_index: usize) -> Option<f64> {
        if q_index < self.q_values.len() && scale_index < self.scales.len() {
            Some(self.values[q_index * self.scales.len() + scale_index])
        } else {
            None
        }
    }

    /// All scales for one moment order
    pub fn row(&self, q_index: usize) -> &[f64] {
        let width = self.scales.len();
        &self.values[q_index * width..(q_index + 1) * width]
    }

    /// Iterate over `(q, row)` pairs
    pub fn rows(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        self.q_values
            .iter()
            .enumerate()
            .map(move |(i, &q)| (q, self.row(i)))
    }
}

impl Index<(usize, usize)> for FluctuationMatrix {
    type Output = f64;

    fn index(&self, (q_index, scale_index): (usize, usize)) -> &f64 {
        assert!(scale_index < self.scales.len(), "scale index out of range");
        &self.values[q_index * self.scales.len() + scale_index]
    }
}

/// Confidence bands for the DCCA cross-correlation coefficient.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RhoThresholds {
    /// Window sizes
    pub scales: Vec<usize>,
    /// Upper threshold per scale (order statistic at the confidence level)
    pub upper: Vec<f64>,
    /// Lower threshold per scale (order statistic at one minus the confidence level)
    pub lower: Vec<f64>,
}
