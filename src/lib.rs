//! # anofox-seasonality
//!
//! Seasonality analysis for time series.
//!
//! Tests whether a series is seasonal from its autocorrelation function,
//! decomposes it into trend and seasonal parts, and removes either one.
//! Also provides ACF/PACF estimation, Granger causality tests and
//! plot-ready diagnostic data (correlograms, histograms, residual analysis).

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod correlation;
pub mod diagnostics;
pub mod error;
pub mod seasonality;
pub mod utils;
pub mod validation;

pub use error::{Result, StatsError};

pub mod prelude {
    pub use crate::core::{ModelMode, SeasonalityMode, TimeSeries};
    pub use crate::error::{Result, StatsError};
    pub use crate::seasonality::{
        check_seasonality, extract_trend_and_seasonality, remove_from_series, remove_seasonality,
        remove_trend, SeasonalityConfig, SeasonalityVerdict,
    };
}
