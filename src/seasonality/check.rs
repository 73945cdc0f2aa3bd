//! ACF-based seasonality significance test.
//!
//! Candidate periods are the local maxima of the autocorrelation function.
//! Each candidate is tested against an upper significance band scaled by the
//! Bartlett standard error of the autocorrelations that precede it.

use crate::core::TimeSeries;
use crate::correlation::{acf, AcfEstimator};
use crate::error::{Result, StatsError};
use crate::utils::stats::{local_maxima, mean, population_variance, quantile_normal};
use tracing::{debug, info};

/// Outcome of [`check_seasonality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalityVerdict {
    /// Whether a significant seasonal period was found.
    pub seasonal: bool,
    /// The seasonal period, or the rejected requested period, or 0.
    pub period: usize,
}

impl SeasonalityVerdict {
    fn negative(period: usize) -> Self {
        Self {
            seasonal: false,
            period,
        }
    }
}

impl From<SeasonalityVerdict> for (bool, usize) {
    fn from(verdict: SeasonalityVerdict) -> Self {
        (verdict.seasonal, verdict.period)
    }
}

/// Configuration for the seasonality test.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityConfig {
    /// Period to test. `None` searches every candidate up to `max_lag`.
    pub period: Option<usize>,
    /// Highest ACF lag considered.
    pub max_lag: usize,
    /// Significance level.
    pub alpha: f64,
}

impl Default for SeasonalityConfig {
    fn default() -> Self {
        Self {
            period: None,
            max_lag: 24,
            alpha: 0.05,
        }
    }
}

impl SeasonalityConfig {
    /// Test a specific period only.
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = Some(period);
        self
    }

    /// Set the highest ACF lag.
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = max_lag;
        self
    }

    /// Set the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(StatsError::InvalidArgument(format!(
                "alpha must be greater than 0 and less than 1, got {}",
                self.alpha
            )));
        }
        if let Some(m) = self.period {
            if m < 2 {
                return Err(StatsError::InvalidArgument(
                    "m must be an integer greater than 1".to_string(),
                ));
            }
            if m > self.max_lag {
                return Err(StatsError::InvalidArgument(format!(
                    "max_lag must be greater than or equal to m (m = {}, max_lag = {})",
                    m, self.max_lag
                )));
            }
        }
        Ok(())
    }
}

/// Checks whether `series` is seasonal.
///
/// Without a configured period the series is assumed to have a single
/// seasonality, which is inferred from the ACF. The first candidate (in
/// ascending lag order) that passes the significance test wins.
///
/// Returns `(false, 0)` for constant series and when the ACF has no local
/// maximum; `(false, m)` when the requested period `m` is not a local maximum.
///
/// # Example
/// ```
/// use anofox_seasonality::core::TimeSeries;
/// use anofox_seasonality::seasonality::{check_seasonality, SeasonalityConfig};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps = (0..120).map(|i| start + Duration::days(i)).collect();
/// let values = (0..120)
///     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
///     .collect();
/// let ts = TimeSeries::univariate(timestamps, values).unwrap();
///
/// let verdict = check_seasonality(&ts, &SeasonalityConfig::default()).unwrap();
/// assert_eq!((verdict.seasonal, verdict.period), (true, 12));
/// ```
#[tracing::instrument(
    skip_all,
    fields(n = series.len(), period = ?config.period, max_lag = config.max_lag)
)]
pub fn check_seasonality(
    series: &TimeSeries,
    config: &SeasonalityConfig,
) -> Result<SeasonalityVerdict> {
    let values = series.univariate_values()?;
    config.validate()?;

    if values.iter().all(|&v| v == values[0]) {
        debug!("constant series, no seasonality");
        return Ok(SeasonalityVerdict::negative(0));
    }

    let r = acf(values, config.max_lag, AcfEstimator::Direct);

    let mut candidates = local_maxima(&r);
    if candidates.is_empty() {
        info!(
            "the ACF has no local maximum for m < max_lag = {}",
            config.max_lag
        );
        return Ok(SeasonalityVerdict::negative(0));
    }

    if let Some(m) = config.period {
        if !candidates.contains(&m) {
            debug!(m, ?candidates, "requested period is not a local maximum");
            return Ok(SeasonalityVerdict::negative(m));
        }
        candidates = vec![m];
    }

    // Lag 0 is always 1.0 and would bias the band
    let r = &r[1..];
    let band_upper = mean(r) + quantile_normal(1.0 - config.alpha / 2.0) * population_variance(r);
    debug!(band_upper, ?candidates, "testing candidates");

    // r[c - 1] is the autocorrelation at lag c
    for candidate in candidates {
        let stat = bartlett_formula(r, candidate - 1, values.len());
        debug!(candidate, stat, acf = r[candidate - 1], "candidate statistic");
        if r[candidate - 1] > stat * band_upper {
            return Ok(SeasonalityVerdict {
                seasonal: true,
                period: candidate,
            });
        }
    }

    Ok(SeasonalityVerdict::negative(0))
}

/// Standard error of `r` at order `m` for a sample of size `length`, by
/// Bartlett's formula.
///
/// For `m <= 1` this is `sqrt(1 / length)`; otherwise
/// `sqrt((1 + 2 * sum(r[..m - 1]^2)) / length)`.
pub fn bartlett_formula(r: &[f64], m: usize, length: usize) -> f64 {
    if m <= 1 {
        return (1.0 / length as f64).sqrt();
    }
    let end = (m - 1).min(r.len());
    let sum_sq: f64 = r[..end].iter().map(|x| x * x).sum();
    ((1.0 + 2.0 * sum_sq) / length as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn make_ts(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<DateTime<Utc>> = (0..values.len())
            .map(|i| base + Duration::hours(i as i64))
            .collect();
        TimeSeries::univariate(timestamps, values).unwrap()
    }

    fn generate_seasonal_series(n: usize, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 10.0 * (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin())
            .collect()
    }

    // ==================== check_seasonality ====================

    #[test]
    fn detects_clear_period() {
        let ts = make_ts(generate_seasonal_series(120, 12));
        let verdict = check_seasonality(&ts, &SeasonalityConfig::default()).unwrap();
        assert!(verdict.seasonal);
        assert_eq!(verdict.period, 12);
        assert_eq!(<(bool, usize)>::from(verdict), (true, 12));
    }

    #[test]
    fn detects_short_period() {
        let ts = make_ts(generate_seasonal_series(100, 7));
        let verdict = check_seasonality(&ts, &SeasonalityConfig::default()).unwrap();
        assert_eq!((verdict.seasonal, verdict.period), (true, 7));
    }

    #[test]
    fn accepts_requested_period_that_is_a_candidate() {
        let ts = make_ts(generate_seasonal_series(120, 12));
        let config = SeasonalityConfig::default().with_period(12);
        let verdict = check_seasonality(&ts, &config).unwrap();
        assert_eq!((verdict.seasonal, verdict.period), (true, 12));
    }

    #[test]
    fn rejects_requested_period_that_is_not_a_candidate() {
        let ts = make_ts(generate_seasonal_series(120, 12));
        let config = SeasonalityConfig::default().with_period(5);
        let verdict = check_seasonality(&ts, &config).unwrap();
        assert_eq!((verdict.seasonal, verdict.period), (false, 5));
    }

    #[test]
    fn constant_series_is_not_seasonal() {
        let ts = make_ts(vec![3.0; 50]);
        let verdict = check_seasonality(&ts, &SeasonalityConfig::default()).unwrap();
        assert_eq!((verdict.seasonal, verdict.period), (false, 0));

        let config = SeasonalityConfig::default().with_period(7);
        let verdict = check_seasonality(&ts, &config).unwrap();
        assert_eq!((verdict.seasonal, verdict.period), (false, 0));
    }

    #[test]
    fn monotone_acf_has_no_candidates() {
        // A linear trend has a strictly decreasing ACF
        let ts = make_ts((0..60).map(|i| i as f64).collect());
        let verdict = check_seasonality(&ts, &SeasonalityConfig::default()).unwrap();
        assert_eq!((verdict.seasonal, verdict.period), (false, 0));
    }

    #[test]
    fn validates_period() {
        let ts = make_ts(generate_seasonal_series(60, 6));

        let config = SeasonalityConfig::default().with_period(1);
        assert!(matches!(
            check_seasonality(&ts, &config),
            Err(StatsError::InvalidArgument(_))
        ));

        let config = SeasonalityConfig::default().with_period(30).with_max_lag(24);
        assert!(matches!(
            check_seasonality(&ts, &config),
            Err(StatsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn validates_alpha() {
        let ts = make_ts(generate_seasonal_series(60, 6));

        let config = SeasonalityConfig::default().with_alpha(1.5);
        assert!(matches!(
            check_seasonality(&ts, &config),
            Err(StatsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn zero_max_lag_has_no_candidates() {
        let ts = make_ts(generate_seasonal_series(60, 6));

        let config = SeasonalityConfig::default().with_max_lag(0);
        let verdict = check_seasonality(&ts, &config).unwrap();
        assert_eq!((verdict.seasonal, verdict.period), (false, 0));
    }

    #[test]
    fn rejects_multivariate_series() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ts = crate::core::TimeSeriesBuilder::new()
            .timestamps((0..4).map(|i| base + Duration::hours(i)).collect())
            .component(vec![1.0, 2.0, 1.0, 2.0])
            .component(vec![2.0, 1.0, 2.0, 1.0])
            .build()
            .unwrap();

        assert!(matches!(
            check_seasonality(&ts, &SeasonalityConfig::default()),
            Err(StatsError::NotUnivariate { dimensions: 2 })
        ));
    }

    #[test]
    fn max_lag_beyond_series_length_is_truncated() {
        let ts = make_ts(generate_seasonal_series(20, 4));
        let config = SeasonalityConfig::default().with_max_lag(50);
        let verdict = check_seasonality(&ts, &config).unwrap();
        assert!(verdict.period <= 19);
    }

    #[test]
    fn config_default() {
        let config = SeasonalityConfig::default();
        assert_eq!(config.period, None);
        assert_eq!(config.max_lag, 24);
        assert_relative_eq!(config.alpha, 0.05, epsilon = 1e-12);
    }

    // ==================== bartlett_formula ====================

    #[test]
    fn bartlett_order_one_ignores_autocorrelations() {
        assert_relative_eq!(bartlett_formula(&[0.9, 0.8], 1, 100), 0.1, epsilon = 1e-12);
        assert_relative_eq!(bartlett_formula(&[], 1, 25), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn bartlett_sums_preceding_squares() {
        // m = 3 uses r[0] and r[1]
        let r = [0.5, 0.5, 0.9, 0.9];
        let expected = ((1.0 + 2.0 * (0.25 + 0.25)) / 50.0_f64).sqrt();
        assert_relative_eq!(bartlett_formula(&r, 3, 50), expected, epsilon = 1e-12);
    }

    #[test]
    fn bartlett_grows_with_early_magnitudes() {
        let small = bartlett_formula(&[0.1, -0.1, 0.1], 4, 100);
        let large = bartlett_formula(&[0.5, -0.6, 0.7], 4, 100);
        assert!(large > small);
    }
}
