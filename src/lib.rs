//! # Detrended Fluctuation Kernels
//!
//! Multi-scale detrended fluctuation measures for one or two time series.
//!
//! For every requested window size (scale), and for the multifractal variants
//! every moment order q, the series is cut into windows, a least-squares
//! polynomial trend is removed from each window, and the residual statistics
//! are reduced to one fluctuation value. Scales (or `(q, scale)` pairs) are
//! independent tasks and run on the rayon pool when the `parallel` feature is
//! enabled.
//!
//! ## Key Features
//!
//! - **DFA**: forward or forward+backward non-overlapping windows
//! - **MF-DFA**: generalized q-moments with the exact `q = 0` log form
//! - **DCCA**: absolute or signed residual products, overlapping or disjoint windows
//! - **MF-DCCA**: multifractal cross-correlation on disjoint windows
//! - **DCCA ρ**: cross-correlation coefficient with Monte Carlo confidence bands
//! - **HT**: single-window local fluctuation and its sliding profile
//! - **Unbiased DFA**: small-window bias-corrected fluctuation on overlapping windows
//!
//! ## Quick Start
//!
//! ```rust
//! use fractal_fluctuation::{dfa, mfdfa, to_aggregated, DfaConfig, FluctuationResult};
//! use fractal_fluctuation::scales::pow_range_by_step;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use rand_distr::{Distribution, StandardNormal};
//!
//! fn main() -> FluctuationResult<()> {
//!     let mut rng = ChaCha8Rng::seed_from_u64(1);
//!     let noise: Vec<f64> = StandardNormal.sample_iter(&mut rng).take(1024).collect();
//!     let profile = to_aggregated(&noise);
//!
//!     let scales = pow_range_by_step(3, 8, 1, 2)?;
//!     let f = dfa(&profile, None, &scales, &DfaConfig::default())?;
//!     assert_eq!(f.len(), scales.len());
//!
//!     let mf = mfdfa(&profile, None, &scales, &[-2.0, 0.0, 2.0], &DfaConfig::forward_backward(2))?;
//!     for (q, row) in mf.rows() {
//!         println!("q = {}: {:?}", q, row);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Conventions
//!
//! - The abscissa defaults to `1, 2, …, N`; a caller-supplied abscissa must be
//!   strictly increasing.
//! - No profile is taken internally. Use [`to_aggregated`] to turn increments
//!   into a profile first.
//! - Shape errors are reported before any computation as [`FluctuationError`].
//!   Numeric degeneracy (NaN input, singular windows) is not intercepted and
//!   only affects the output slots whose windows are concerned.
//! - Fitting the scaling exponent from `ln F` against `ln s` is left to the
//!   caller.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod linear_algebra;
pub mod polyfit;
pub mod results;
pub mod scales;
pub mod series;

mod kernel;

// Fluctuation kernels
pub mod dcca;
pub mod dfa;
pub mod ht;
pub mod mfdcca;
pub mod mfdfa;
pub mod udfa;

// Re-exports for convenience - main public API
pub use config::{
    DccaConfig, DccaWindowing, DfaConfig, ResidualProduct, RhoThresholdConfig, SegmentDirection,
};
pub use errors::{FluctuationError, FluctuationResult};
pub use results::{FluctuationMatrix, RhoThresholds};

pub use polyfit::{polynomial_fit, PolynomialFit, PolynomialFitter};

pub use dcca::{dcca, dcca_into, rho_dcca, rho_thresholds};
pub use dfa::{dfa, dfa_into};
pub use ht::{ht_fluctuation, ht_profile};
pub use mfdcca::{mfdcca, mfdcca_into};
pub use mfdfa::{mfdfa, mfdfa_into};
pub use udfa::{udfa, udfa_into};

pub use scales::{lin_range_by_count, lin_range_by_step, pow_range_by_count, pow_range_by_step};
pub use series::{natural_abscissa, subtract_mean, to_aggregated};
