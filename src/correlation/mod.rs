//! Autocorrelation and partial autocorrelation estimators.
//!
//! - ACF: direct (lag-by-lag) or FFT-based, with optional Bartlett confidence intervals
//! - PACF: Yule-Walker via the Durbin-Levinson recursion

mod autocorrelation;

pub use autocorrelation::{acf, acf_with_confint, pacf, AcfEstimator, AcfResult, PacfMethod};
