//! Classical (moving-average) seasonal decomposition.
//!
//! The series is split into:
//! - Trend: centered moving average over one seasonal cycle
//! - Seasonal: per-position average of the detrended series, centered
//! - Residual: what remains after removing trend and seasonal

use crate::core::{ModelMode, TimeSeries};
use crate::error::{Result, StatsError};
use chrono::Duration;
use std::collections::BTreeMap;
use tracing::debug;

/// How to fill the trend values the moving average leaves undefined at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtrapolateTrend {
    /// Leave NaN at the edges.
    None,
    /// Fit a line to the `period - 1` nearest trend values.
    #[default]
    Freq,
    /// Fit a line to the given number of nearest trend values.
    Points(usize),
}

/// Result of a classical decomposition.
#[derive(Debug, Clone)]
pub struct DecompositionResult {
    /// Trend component.
    pub trend: Vec<f64>,
    /// Seasonal component.
    pub seasonal: Vec<f64>,
    /// Residual component.
    pub resid: Vec<f64>,
    /// Seasonal period used.
    pub period: usize,
    /// Combination model used.
    pub model: ModelMode,
}

/// Classical decomposition configuration and algorithm.
#[derive(Debug, Clone)]
pub struct SeasonalDecompose {
    model: ModelMode,
    /// Seasonal period; inferred from the time index when `None`.
    period: Option<usize>,
    extrapolate_trend: ExtrapolateTrend,
}

impl SeasonalDecompose {
    /// Create a decomposer for the given model with trend extrapolation enabled.
    pub fn new(model: ModelMode) -> Self {
        Self {
            model,
            period: None,
            extrapolate_trend: ExtrapolateTrend::Freq,
        }
    }

    /// Set the seasonal period explicitly.
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = Some(period);
        self
    }

    /// Set the boundary trend handling.
    pub fn with_extrapolate_trend(mut self, extrapolate: ExtrapolateTrend) -> Self {
        self.extrapolate_trend = extrapolate;
        self
    }

    /// Decompose a univariate deterministic series.
    ///
    /// Without an explicit period, the period is inferred from the time
    /// index (see [`infer_period`]).
    pub fn decompose(&self, series: &TimeSeries) -> Result<DecompositionResult> {
        let values = series.univariate_values()?;
        let period = match self.period {
            Some(p) => p,
            None => {
                let p = infer_period(series).map_err(|e| {
                    StatsError::InvalidArgument(format!("period must be provided: {}", e))
                })?;
                debug!(period = p, "inferred seasonal period from time index");
                p
            }
        };
        self.decompose_values(values, period)
    }

    /// Decompose raw values with the given period.
    pub fn decompose_values(&self, values: &[f64], period: usize) -> Result<DecompositionResult> {
        let n = values.len();
        if period < 2 {
            return Err(StatsError::InvalidArgument(format!(
                "period must be at least 2, got {}",
                period
            )));
        }
        if n < 2 * period {
            return Err(StatsError::InsufficientData {
                needed: 2 * period,
                got: n,
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(StatsError::InvalidArgument(
                "decomposition does not handle missing values".to_string(),
            ));
        }
        if self.model == ModelMode::Multiplicative && values.iter().any(|&v| v <= 0.0) {
            return Err(StatsError::InvalidArgument(
                "multiplicative seasonality is not appropriate for zero and negative values"
                    .to_string(),
            ));
        }

        let mut trend = centered_moving_average(values, period);
        let npoints = match self.extrapolate_trend {
            ExtrapolateTrend::None => 0,
            ExtrapolateTrend::Freq => period - 1,
            ExtrapolateTrend::Points(k) => k,
        };
        if npoints > 0 {
            extrapolate_edges(&mut trend, npoints);
        }

        let detrended: Vec<f64> = values
            .iter()
            .zip(&trend)
            .map(|(&y, &t)| self.model.remove(y, t))
            .collect();

        // Average by season, ignoring undefined positions
        let mut period_averages: Vec<f64> = (0..period)
            .map(|pos| {
                let defined: Vec<f64> = detrended
                    .iter()
                    .skip(pos)
                    .step_by(period)
                    .copied()
                    .filter(|d| !d.is_nan())
                    .collect();
                if defined.is_empty() {
                    f64::NAN
                } else {
                    defined.iter().sum::<f64>() / defined.len() as f64
                }
            })
            .collect();

        // Center the seasonal indices
        let center = period_averages.iter().sum::<f64>() / period as f64;
        for s in period_averages.iter_mut() {
            *s = self.model.remove(*s, center);
        }

        let seasonal: Vec<f64> = (0..n).map(|i| period_averages[i % period]).collect();
        let resid: Vec<f64> = detrended
            .iter()
            .zip(&seasonal)
            .map(|(&d, &s)| self.model.remove(d, s))
            .collect();

        Ok(DecompositionResult {
            trend,
            seasonal,
            resid,
            period,
            model: self.model,
        })
    }
}

impl Default for SeasonalDecompose {
    fn default() -> Self {
        Self::new(ModelMode::default())
    }
}

/// Seasonal period conventionally associated with a sampling interval.
///
/// Seconds and minutes map to 60, hours to 24, days to 7, weeks to 52,
/// months (28 to 31 days) to 12 and quarters (89 to 92 days) to 4. Other
/// spacings, yearly data included, have no usable period.
pub fn period_from_frequency(freq: Duration) -> Option<usize> {
    let secs = freq.num_seconds();
    let day = 86_400;
    match secs {
        1 | 60 => Some(60),
        3_600 => Some(24),
        s if s == day => Some(7),
        s if s == 7 * day => Some(52),
        s if (28 * day..=31 * day).contains(&s) => Some(12),
        s if (89 * day..=92 * day).contains(&s) => Some(4),
        _ => None,
    }
}

/// Seasonal period implied by the spacing of the time index.
///
/// Every gap between consecutive timestamps votes for its
/// [`period_from_frequency`] bucket; calendar months and quarters of unequal
/// length therefore agree. The most common bucket wins and must cover at least
/// half the gaps. Ties go to the shorter period, and to an unknown spacing
/// over any period.
pub fn infer_period(series: &TimeSeries) -> Result<usize> {
    let spacings = series.spacings();
    if spacings.is_empty() {
        return Err(StatsError::FrequencyInference(
            "at least two timestamps are needed".to_string(),
        ));
    }

    let mut votes: BTreeMap<Option<usize>, usize> = BTreeMap::new();
    for gap in &spacings {
        *votes.entry(period_from_frequency(*gap)).or_insert(0) += 1;
    }

    // max_by_key keeps the last maximum, so reversing favours smaller keys
    let (period, count) = votes
        .into_iter()
        .rev()
        .max_by_key(|&(_, count)| count)
        .ok_or_else(|| StatsError::FrequencyInference("no spacing data".to_string()))?;

    if 2 * count < spacings.len() {
        return Err(StatsError::FrequencyInference(
            "time index has no dominant spacing".to_string(),
        ));
    }
    period.ok_or_else(|| {
        StatsError::FrequencyInference("no seasonal period is known for this spacing".to_string())
    })
}

/// Two-sided moving average over one cycle; undefined ends are NaN.
///
/// Odd periods average `period` points with equal weight. Even periods use
/// `period + 1` points with half weight on both ends.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let half = period / 2;
    let mut trend = vec![f64::NAN; n];

    for i in half..(n - half) {
        let sum: f64 = if period % 2 == 0 {
            let inner: f64 = values[i - half + 1..i + half].iter().sum();
            inner + 0.5 * (values[i - half] + values[i + half])
        } else {
            values[i - half..=i + half].iter().sum()
        };
        trend[i] = sum / period as f64;
    }

    trend
}

/// Replace leading and trailing NaNs with least-squares lines fitted to the
/// `npoints` nearest defined values on each side.
fn extrapolate_edges(trend: &mut [f64], npoints: usize) {
    let Some(front) = trend.iter().position(|t| !t.is_nan()) else {
        return;
    };
    let Some(back) = trend.iter().rposition(|t| !t.is_nan()) else {
        return;
    };

    let front_last = (front + npoints).min(back);
    if let Some((slope, intercept)) = fit_line(trend, front, front_last) {
        for (i, t) in trend.iter_mut().enumerate().take(front) {
            *t = slope * i as f64 + intercept;
        }
    }

    let back_first = back.saturating_sub(npoints).max(front);
    if let Some((slope, intercept)) = fit_line(trend, back_first, back) {
        for (i, t) in trend.iter_mut().enumerate().skip(back + 1) {
            *t = slope * i as f64 + intercept;
        }
    }
}

/// Least-squares line through `(i, values[i])` for `i` in `start..end`.
fn fit_line(values: &[f64], start: usize, end: usize) -> Option<(f64, f64)> {
    let count = end.checked_sub(start)?;
    match count {
        0 => None,
        1 => Some((0.0, values[start])),
        _ => {
            let m = count as f64;
            let mean_x = (start..end).map(|i| i as f64).sum::<f64>() / m;
            let mean_y = values[start..end].iter().sum::<f64>() / m;
            let (sxy, sxx) = (start..end).fold((0.0, 0.0), |(sxy, sxx), i| {
                let dx = i as f64 - mean_x;
                (sxy + dx * (values[i] - mean_y), sxx + dx * dx)
            });
            let slope = sxy / sxx;
            Some((slope, mean_y - slope * mean_x))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn generate_seasonal_series(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let trend = 0.1 * i as f64;
                let seasonal =
                    10.0 * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin();
                trend + seasonal
            })
            .collect()
    }

    #[test]
    fn additive_decomposition_reconstructs_series() {
        let period = 12;
        let series = generate_seasonal_series(120, period);

        let result = SeasonalDecompose::new(ModelMode::Additive)
            .decompose_values(&series, period)
            .unwrap();

        assert_eq!(result.trend.len(), series.len());
        assert_eq!(result.seasonal.len(), series.len());
        assert_eq!(result.resid.len(), series.len());
        assert_eq!(result.period, period);

        for i in 0..series.len() {
            let reconstructed = result.trend[i] + result.seasonal[i] + result.resid[i];
            assert!(
                (series[i] - reconstructed).abs() < 1e-10,
                "Reconstruction failed at index {}: {} vs {}",
                i,
                series[i],
                reconstructed
            );
        }
    }

    #[test]
    fn additive_recovers_linear_trend_and_sine() {
        let period = 12;
        let series = generate_seasonal_series(120, period);

        let result = SeasonalDecompose::new(ModelMode::Additive)
            .decompose_values(&series, period)
            .unwrap();

        // Moving average over a full cycle removes the sine exactly
        for i in 6..114 {
            assert_relative_eq!(result.trend[i], 0.1 * i as f64, epsilon = 1e-9);
        }
        // Extrapolated edges continue the same line
        assert_relative_eq!(result.trend[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(result.trend[119], 11.9, epsilon = 1e-9);

        for i in 0..120 {
            let expected = 10.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin();
            assert_relative_eq!(result.seasonal[i], expected, epsilon = 1e-8);
        }
    }

    #[test]
    fn seasonal_indices_are_centered() {
        let period = 7;
        let series: Vec<f64> = (0..70).map(|i| 50.0 + ((i * 3) % 7) as f64).collect();

        let additive = SeasonalDecompose::new(ModelMode::Additive)
            .decompose_values(&series, period)
            .unwrap();
        let sum: f64 = additive.seasonal[..period].iter().sum();
        assert_relative_eq!(sum, 0.0, epsilon = 1e-9);

        let multiplicative = SeasonalDecompose::new(ModelMode::Multiplicative)
            .decompose_values(&series, period)
            .unwrap();
        let mean: f64 = multiplicative.seasonal[..period].iter().sum::<f64>() / period as f64;
        assert_relative_eq!(mean, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn multiplicative_decomposition_reconstructs_series() {
        let period = 4;
        let series: Vec<f64> = (0..40)
            .map(|i| (10.0 + i as f64) * [0.8, 1.1, 1.3, 0.8][i % 4])
            .collect();

        let result = SeasonalDecompose::new(ModelMode::Multiplicative)
            .decompose_values(&series, period)
            .unwrap();

        for i in 0..series.len() {
            let reconstructed = result.trend[i] * result.seasonal[i] * result.resid[i];
            assert_relative_eq!(reconstructed, series[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn odd_period_uses_plain_average() {
        let series: Vec<f64> = (0..9).map(|i| i as f64).collect();
        let trend = centered_moving_average(&series, 3);
        assert!(trend[0].is_nan());
        assert!(trend[8].is_nan());
        for i in 1..8 {
            assert_relative_eq!(trend[i], i as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn even_period_uses_half_weight_ends() {
        let series = vec![0.0, 4.0, 0.0, 4.0, 8.0, 0.0];
        let trend = centered_moving_average(&series, 4);
        // (0.5*0 + 4 + 0 + 4 + 0.5*8) / 4 = 3
        assert_relative_eq!(trend[2], 3.0, epsilon = 1e-12);
        assert!(trend[1].is_nan());
        assert!(trend[4].is_nan());
    }

    #[test]
    fn extrapolation_can_be_disabled() {
        let period = 12;
        let series = generate_seasonal_series(48, period);

        let result = SeasonalDecompose::new(ModelMode::Additive)
            .with_extrapolate_trend(ExtrapolateTrend::None)
            .decompose_values(&series, period)
            .unwrap();

        assert!(result.trend[..6].iter().all(|t| t.is_nan()));
        assert!(result.trend[42..].iter().all(|t| t.is_nan()));
        assert!(!result.trend[6].is_nan());
        assert!(result.seasonal.iter().all(|s| !s.is_nan()));
    }

    #[test]
    fn explicit_extrapolation_points() {
        let series: Vec<f64> = (0..24).map(|i| 2.0 * i as f64 + 1.0).collect();
        let result = SeasonalDecompose::new(ModelMode::Additive)
            .with_extrapolate_trend(ExtrapolateTrend::Points(3))
            .decompose_values(&series, 6)
            .unwrap();
        assert_relative_eq!(result.trend[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(result.trend[23], 47.0, epsilon = 1e-9);
    }

    #[test]
    fn freq_extrapolation_fits_one_point_less_than_period() {
        let values: Vec<f64> = (0..48).map(|i| 0.05 * (i * i) as f64 + 100.0).collect();
        let decompose = |extrapolate| {
            SeasonalDecompose::new(ModelMode::Additive)
                .with_extrapolate_trend(extrapolate)
                .decompose_values(&values, 12)
                .unwrap()
                .trend
        };

        let freq = decompose(ExtrapolateTrend::Freq);
        assert_eq!(freq, decompose(ExtrapolateTrend::Points(11)));
        assert_relative_eq!(freq[0], 95.058_333_333_333_33, epsilon = 1e-9);
        assert!((freq[0] - decompose(ExtrapolateTrend::Points(12))[0]).abs() > 0.4);
    }

    #[test]
    fn rejects_missing_values() {
        let mut values = generate_seasonal_series(48, 12);
        values[20] = f64::NAN;
        assert!(matches!(
            SeasonalDecompose::new(ModelMode::Additive).decompose_values(&values, 12),
            Err(StatsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn insufficient_data() {
        let result = SeasonalDecompose::new(ModelMode::Additive).decompose_values(&[1.0; 10], 12);
        assert!(matches!(
            result,
            Err(StatsError::InsufficientData { needed: 24, got: 10 })
        ));
    }

    #[test]
    fn rejects_short_periods() {
        let result = SeasonalDecompose::new(ModelMode::Additive).decompose_values(&[1.0; 10], 1);
        assert!(matches!(result, Err(StatsError::InvalidArgument(_))));
    }

    #[test]
    fn multiplicative_rejects_non_positive_values() {
        let mut series: Vec<f64> = (1..=24).map(|i| i as f64).collect();
        series[5] = 0.0;
        let result = SeasonalDecompose::new(ModelMode::Multiplicative).decompose_values(&series, 4);
        assert!(matches!(result, Err(StatsError::InvalidArgument(_))));
    }

    #[test]
    fn period_mapping_covers_common_frequencies() {
        assert_eq!(period_from_frequency(Duration::seconds(1)), Some(60));
        assert_eq!(period_from_frequency(Duration::minutes(1)), Some(60));
        assert_eq!(period_from_frequency(Duration::hours(1)), Some(24));
        assert_eq!(period_from_frequency(Duration::days(1)), Some(7));
        assert_eq!(period_from_frequency(Duration::weeks(1)), Some(52));
        assert_eq!(period_from_frequency(Duration::days(31)), Some(12));
        assert_eq!(period_from_frequency(Duration::days(28)), Some(12));
        assert_eq!(period_from_frequency(Duration::days(91)), Some(4));
        assert_eq!(period_from_frequency(Duration::days(365)), None);
        assert_eq!(period_from_frequency(Duration::hours(2)), None);
    }

    #[test]
    fn infers_calendar_periods() {
        use chrono::{TimeZone, Utc};

        let monthly = (0..30)
            .map(|i| Utc.with_ymd_and_hms(2001 + i / 12, (i % 12) as u32 + 1, 1, 0, 0, 0).unwrap())
            .collect();
        let ts = TimeSeries::univariate(monthly, vec![1.0; 30]).unwrap();
        assert_eq!(infer_period(&ts).unwrap(), 12);

        let quarterly = (0..12)
            .map(|i| {
                Utc.with_ymd_and_hms(2001 + i / 4, (i % 4) as u32 * 3 + 1, 1, 0, 0, 0)
                    .unwrap()
            })
            .collect();
        let ts = TimeSeries::univariate(quarterly, vec![1.0; 12]).unwrap();
        assert_eq!(infer_period(&ts).unwrap(), 4);
    }

    #[test]
    fn inference_needs_dominant_known_spacing() {
        use chrono::{TimeZone, Utc};

        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let single = TimeSeries::univariate(vec![base], vec![1.0]).unwrap();
        assert!(matches!(
            infer_period(&single),
            Err(StatsError::FrequencyInference(_))
        ));

        // Hourly, then a run of irregular gaps
        let offsets = [0, 1, 2, 5, 9, 14, 20];
        let timestamps = offsets.iter().map(|&h| base + Duration::hours(h)).collect();
        let irregular = TimeSeries::univariate(timestamps, vec![1.0; 7]).unwrap();
        assert!(matches!(
            infer_period(&irregular),
            Err(StatsError::FrequencyInference(_))
        ));
    }

    #[test]
    fn decompose_infers_period_from_index() {
        use chrono::{TimeZone, Utc};

        // Hourly data maps to a daily cycle of 24
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..96).map(|i| base + Duration::hours(i)).collect();
        let values = (0..96)
            .map(|i| 5.0 + (2.0 * std::f64::consts::PI * i as f64 / 24.0).sin())
            .collect();
        let ts = TimeSeries::univariate(timestamps, values).unwrap();

        let result = SeasonalDecompose::new(ModelMode::Additive)
            .decompose(&ts)
            .unwrap();
        assert_eq!(result.period, 24);
    }

    #[test]
    fn decompose_without_known_frequency_needs_period() {
        use chrono::{TimeZone, Utc};

        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..30).map(|i| base + Duration::hours(2 * i)).collect();
        let ts = TimeSeries::univariate(timestamps, vec![1.0; 30]).unwrap();

        assert!(matches!(
            SeasonalDecompose::new(ModelMode::Additive).decompose(&ts),
            Err(StatsError::InvalidArgument(_))
        ));

        let result = SeasonalDecompose::new(ModelMode::Additive)
            .with_period(5)
            .decompose(&ts)
            .unwrap();
        assert_eq!(result.period, 5);
    }
}
