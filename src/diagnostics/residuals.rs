//! Residual analysis: values over time, distribution and autocorrelation.

use super::correlogram::{acf_plot_data, Correlogram};
use super::histogram::{histogram, Bins, Histogram};
use crate::core::TimeSeries;
use crate::error::{Result, StatsError};
use crate::utils::stats::{linspace, mean, normal_pdf, population_std_dev};

const NORMAL_CURVE_POINTS: usize = 100;
const RESIDUAL_ACF_MAX_LAG: usize = 24;
const RESIDUAL_ACF_ALPHA: f64 = 0.05;

/// Everything needed to draw a residual analysis figure.
#[derive(Debug, Clone)]
pub struct ResidualsAnalysis {
    /// Residuals as analysed, NaNs filled when requested.
    pub residuals: TimeSeries,
    /// Histogram of the residual values.
    pub histogram: Histogram,
    /// `(x, y)` points of the fitted normal density, scaled to histogram counts.
    pub normal_curve: Vec<(f64, f64)>,
    /// Autocorrelation of the residuals with Bartlett bands.
    pub correlogram: Correlogram,
}

/// Analyse a univariate residual series.
///
/// With `fill_nan`, missing values are linearly interpolated and the edges
/// filled before anything is computed. The correlogram covers up to 24 lags,
/// fewer for short series.
#[tracing::instrument(
    skip_all,
    fields(n = residuals.len(), num_bins = num_bins, fill_nan = fill_nan)
)]
pub fn residuals_analysis(
    residuals: &TimeSeries,
    num_bins: usize,
    fill_nan: bool,
) -> Result<ResidualsAnalysis> {
    residuals.ensure_univariate()?;
    let residuals = if fill_nan {
        residuals.interpolated(true)
    } else {
        residuals.clone()
    };
    let values = residuals.univariate_values()?;
    if values.len() < 2 {
        return Err(StatsError::InsufficientData {
            needed: 2,
            got: values.len(),
        });
    }

    let histogram = histogram(values, &Bins::Count(num_bins), false)?;

    let mu = mean(values);
    let sigma = population_std_dev(values);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = values.len() as f64 * (max - min) / num_bins as f64;
    let normal_curve = linspace(min, max, NORMAL_CURVE_POINTS)
        .into_iter()
        .map(|x| (x, normal_pdf(x, mu, sigma) * scale))
        .collect();

    let max_lag = RESIDUAL_ACF_MAX_LAG.min(values.len() - 1);
    let correlogram = acf_plot_data(&residuals, None, max_lag, RESIDUAL_ACF_ALPHA, true)?;

    Ok(ResidualsAnalysis {
        residuals,
        histogram,
        normal_curve,
        correlogram,
    })
}
