//! Numerical helpers shared by the seasonality, correlation and validation modules.

pub mod ols;
pub mod stats;

pub use ols::{ols_fit, OLSResult};
pub use stats::{
    linspace, local_maxima, mean, normal_pdf, population_std_dev, population_variance,
    quantile_normal,
};
