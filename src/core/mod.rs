//! Core data structures: the time series container and decomposition modes.

mod mode;
mod time_series;

pub use mode::{ModelMode, SeasonalityMode};
pub use time_series::{TimeSeries, TimeSeriesBuilder};
