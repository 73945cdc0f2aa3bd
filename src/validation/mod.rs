//! Statistical validation tests between time series.
//!
//! # Example
//!
//! ```
//! use anofox_seasonality::core::TimeSeries;
//! use anofox_seasonality::validation::granger_causality_tests;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let timestamps: Vec<_> = (0..60).map(|i| start + Duration::days(i)).collect();
//! let cause: Vec<f64> = (0..60).map(|i| ((i * 7919) % 61) as f64 / 61.0).collect();
//! let effect: Vec<f64> = (0..60)
//!     .map(|i| if i == 0 { 0.0 } else { 2.0 * cause[i - 1] + 0.01 * (i % 3) as f64 })
//!     .collect();
//!
//! let cause = TimeSeries::univariate(timestamps.clone(), cause).unwrap();
//! let effect = TimeSeries::univariate(timestamps, effect).unwrap();
//!
//! let results = granger_causality_tests(&cause, &effect, 2, true).unwrap();
//! assert!(results[&1].ssr_ftest.p_value < 0.05);
//! ```

mod granger;

pub use granger::{granger_causality_tests, GrangerLagResult, GrangerTest};
