//! ACF and PACF correlogram data.

use crate::core::TimeSeries;
use crate::correlation::{acf_with_confint, pacf, AcfResult, PacfMethod};
use crate::error::{Result, StatsError};

/// Correlation coefficients ready to draw as a stem plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlogram {
    /// Coefficient per lag, lags `0..=max_lag`.
    pub values: Vec<f64>,
    /// Lag to emphasize, if any.
    pub highlight: Option<usize>,
    /// Half-width of the confidence band around zero for lags `1..=max_lag`.
    pub band: Vec<f64>,
}

impl Correlogram {
    /// Highest lag covered.
    pub fn max_lag(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    /// True when the coefficient at `lag` lies outside the confidence band.
    /// Lag 0 is never significant.
    pub fn is_significant(&self, lag: usize) -> bool {
        match (lag.checked_sub(1), self.values.get(lag)) {
            (Some(i), Some(r)) => self.band.get(i).is_some_and(|b| r.abs() > *b),
            _ => false,
        }
    }

    fn from_result(result: AcfResult, highlight: Option<usize>) -> Self {
        let band = result
            .confint
            .iter()
            .zip(&result.values)
            .skip(1)
            .map(|(&(_, upper), &r)| upper - r)
            .collect();
        Self {
            values: result.values,
            highlight,
            band,
        }
    }
}

/// ACF correlogram for lags `0..=max_lag`.
///
/// `max_lag` must satisfy `1 <= max_lag < n` and `highlight`, when given,
/// must not exceed `max_lag`.
pub fn acf_plot_data(
    series: &TimeSeries,
    highlight: Option<usize>,
    max_lag: usize,
    alpha: f64,
    bartlett_confint: bool,
) -> Result<Correlogram> {
    let values = series.univariate_values()?;
    if max_lag < 1 || max_lag >= values.len() {
        return Err(StatsError::InvalidArgument(format!(
            "max_lag must be at least 1 and less than the series length ({}), got {}",
            values.len(),
            max_lag
        )));
    }
    validate_highlight(highlight, max_lag)?;

    let result = acf_with_confint(values, max_lag, alpha, bartlett_confint)?;
    Ok(Correlogram::from_result(result, highlight))
}

/// PACF correlogram for lags `0..=max_lag`.
///
/// `max_lag` must satisfy `1 <= max_lag < n / 2`.
pub fn pacf_plot_data(
    series: &TimeSeries,
    highlight: Option<usize>,
    max_lag: usize,
    method: PacfMethod,
    alpha: f64,
) -> Result<Correlogram> {
    let values = series.univariate_values()?;
    if max_lag < 1 || max_lag >= values.len() / 2 {
        return Err(StatsError::InvalidArgument(format!(
            "max_lag must be at least 1 and less than half the series length ({}), got {}",
            values.len(),
            max_lag
        )));
    }
    validate_highlight(highlight, max_lag)?;

    let result = pacf(values, max_lag, method, alpha)?;
    Ok(Correlogram::from_result(result, highlight))
}

fn validate_highlight(highlight: Option<usize>, max_lag: usize) -> Result<()> {
    match highlight {
        Some(m) if m > max_lag => Err(StatsError::InvalidArgument(format!(
            "highlighted lag must be between 0 and max_lag ({}), got {}",
            max_lag, m
        ))),
        _ => Ok(()),
    }
}
