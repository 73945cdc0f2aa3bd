//! Plot-ready data for diagnosing series and residuals.
//!
//! Nothing here draws. Each function returns the numbers a renderer needs:
//! - Correlograms (ACF/PACF) with confidence bands
//! - Histograms of component values
//! - A residual analysis bundle (histogram, fitted normal curve, ACF)

mod correlogram;
mod histogram;
mod residuals;

pub use correlogram::{acf_plot_data, pacf_plot_data, Correlogram};
pub use histogram::{histogram, series_histograms, Bins, Histogram, MAX_HISTOGRAM_COMPONENTS};
pub use residuals::{residuals_analysis, ResidualsAnalysis};
