//! Trend and seasonality extraction and removal on [`TimeSeries`].

use crate::core::{ModelMode, SeasonalityMode, TimeSeries};
use crate::error::Result;
use crate::seasonality::classical::{ExtrapolateTrend, SeasonalDecompose};

/// Extracts trend and seasonal components from a univariate deterministic series.
///
/// Uses classical decomposition with linear extrapolation of the trend at the
/// edges. Without a period, the period is inferred from the time index.
///
/// Returns `(trend, seasonal)`, both on the input's time index.
///
/// # Errors
/// `InvalidArgument` for [`SeasonalityMode::None`], a period below 2, a
/// multiplicative model on non-positive data, or an index with no known
/// seasonal period. `NotUnivariate`/`NotDeterministic` for unsupported
/// series.
#[tracing::instrument(skip_all, fields(n = series.len(), period = ?period))]
pub fn extract_trend_and_seasonality(
    series: &TimeSeries,
    period: Option<usize>,
    model: impl Into<SeasonalityMode>,
) -> Result<(TimeSeries, TimeSeries)> {
    let model = ModelMode::try_from(model.into())?;
    series.ensure_univariate()?;
    series.ensure_deterministic()?;

    let mut decomposer =
        SeasonalDecompose::new(model).with_extrapolate_trend(ExtrapolateTrend::Freq);
    if let Some(p) = period {
        decomposer = decomposer.with_period(p);
    }
    let result = decomposer.decompose(series)?;

    Ok((
        series.with_values(result.trend)?,
        series.with_values(result.seasonal)?,
    ))
}

/// Removes `other` from `series`: `series / other` for multiplicative,
/// `series - other` for additive.
///
/// The result keeps `series`'s time index. Timestamps of `other` are not
/// compared, only the lengths.
pub fn remove_from_series(
    series: &TimeSeries,
    other: &TimeSeries,
    model: impl Into<SeasonalityMode>,
) -> Result<TimeSeries> {
    let model = ModelMode::try_from(model.into())?;
    series.combine(other, |value, component| model.remove(value, component))
}

/// Adjusts the seasonal component out of `series`.
pub fn remove_seasonality(
    series: &TimeSeries,
    period: Option<usize>,
    model: impl Into<SeasonalityMode>,
) -> Result<TimeSeries> {
    let model = ModelMode::try_from(model.into())?;
    let (_, seasonal) = extract_trend_and_seasonality(series, period, model)?;
    remove_from_series(series, &seasonal, model)
}

/// Removes the trend from `series`; the period is inferred from the index.
pub fn remove_trend(series: &TimeSeries, model: impl Into<SeasonalityMode>) -> Result<TimeSeries> {
    let model = ModelMode::try_from(model.into())?;
    let (trend, _) = extract_trend_and_seasonality(series, None, model)?;
    remove_from_series(series, &trend, model)
}
