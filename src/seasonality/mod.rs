//! Seasonality detection and decomposition.
//!
//! This module provides tools for analyzing seasonal patterns in time series:
//! - ACF-based significance test for a seasonal period
//! - Classical moving-average decomposition
//! - Trend and seasonality extraction and removal on [`TimeSeries`](crate::core::TimeSeries)

mod adjust;
mod check;
mod classical;

pub use adjust::{
    extract_trend_and_seasonality, remove_from_series, remove_seasonality, remove_trend,
};
pub use check::{bartlett_formula, check_seasonality, SeasonalityConfig, SeasonalityVerdict};
pub use classical::{
    infer_period, period_from_frequency, DecompositionResult, ExtrapolateTrend, SeasonalDecompose,
};
