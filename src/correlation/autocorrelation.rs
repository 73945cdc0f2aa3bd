//! Sample autocorrelation and partial autocorrelation.

use crate::error::{Result, StatsError};
use crate::utils::stats::{mean, quantile_normal};
use rustfft::{num_complex::Complex64, FftPlanner};

/// Estimator used to compute the autocovariances behind [`acf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcfEstimator {
    /// Lag-by-lag sums, O(n * nlags). Exact for any lag.
    #[default]
    Direct,
    /// Zero-padded FFT, O(n log n).
    Fft,
}

/// Method used by [`pacf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacfMethod {
    /// Yule-Walker with autocovariances divided by `n - k`.
    #[default]
    YuleWalkerAdjusted,
    /// Yule-Walker with autocovariances divided by `n` (maximum likelihood).
    YuleWalkerMle,
}

/// Correlation coefficients per lag with their confidence intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct AcfResult {
    /// Coefficient per lag, starting at lag 0.
    pub values: Vec<f64>,
    /// `(lower, upper)` interval per lag.
    pub confint: Vec<(f64, f64)>,
}

impl AcfResult {
    /// Highest lag covered.
    pub fn max_lag(&self) -> usize {
        self.values.len().saturating_sub(1)
    }
}

/// Returns the sample autocorrelation function for lags `0..=nlags`.
///
/// The series is demeaned and every lag is normalized by the lag-0 sum of
/// squares (no small-sample adjustment). Lags are capped at `n - 1`. A
/// constant series gives `1.0` at lag 0 and `0.0` elsewhere.
///
/// # Arguments
/// * `series` - Input time series
/// * `nlags` - Highest lag to compute
/// * `estimator` - Direct sums or FFT
pub fn acf(series: &[f64], nlags: usize, estimator: AcfEstimator) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }
    let nlags = nlags.min(n - 1);

    let m = mean(series);
    let centered: Vec<f64> = series.iter().map(|x| x - m).collect();
    let denominator: f64 = centered.iter().map(|x| x * x).sum();

    if denominator == 0.0 {
        let mut flat = vec![0.0; nlags + 1];
        flat[0] = 1.0;
        return flat;
    }

    match estimator {
        AcfEstimator::Direct => (0..=nlags)
            .map(|lag| {
                centered[lag..]
                    .iter()
                    .zip(centered.iter())
                    .map(|(a, b)| a * b)
                    .sum::<f64>()
                    / denominator
            })
            .collect(),
        AcfEstimator::Fft => {
            let autocov = fft_autocovariance(&centered);
            autocov[..=nlags].iter().map(|c| c / autocov[0]).collect()
        }
    }
}

/// Unnormalized autocovariance sums of an already centered series via FFT.
fn fft_autocovariance(centered: &[f64]) -> Vec<f64> {
    let n = centered.len();
    // Pad to avoid circular wrap-around of the correlation
    let size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex64> = centered
        .iter()
        .map(|&x| Complex64::new(x, 0.0))
        .chain(std::iter::repeat(Complex64::new(0.0, 0.0)))
        .take(size)
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(size).process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex64::new(c.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(size).process(&mut buffer);

    buffer
        .iter()
        .take(n)
        .map(|c| c.re / size as f64)
        .collect()
}

/// Returns the ACF together with confidence intervals at level `alpha`.
///
/// With `bartlett_confint` the variance at lag `k` follows Bartlett's formula,
/// `(1 + 2 * sum(acf[1..k]^2)) / n`, which suits MA order identification.
/// Otherwise every lag uses the white-noise variance `1 / n`.
pub fn acf_with_confint(
    series: &[f64],
    nlags: usize,
    alpha: f64,
    bartlett_confint: bool,
) -> Result<AcfResult> {
    if series.is_empty() {
        return Err(StatsError::EmptyData);
    }
    validate_alpha(alpha)?;

    let values = acf(series, nlags, AcfEstimator::Direct);
    let n = series.len() as f64;
    let z = quantile_normal(1.0 - alpha / 2.0);

    let mut cumulative = 0.0;
    let confint = values
        .iter()
        .enumerate()
        .map(|(k, &r)| {
            let var = if !bartlett_confint {
                1.0 / n
            } else if k == 0 {
                0.0
            } else {
                let v = (1.0 + 2.0 * cumulative) / n;
                cumulative += r * r;
                v
            };
            let half_width = z * var.sqrt();
            (r - half_width, r + half_width)
        })
        .collect();

    Ok(AcfResult { values, confint })
}

/// Returns the partial autocorrelation function for lags `0..=nlags`.
///
/// Coefficients come from the Yule-Walker equations solved with the
/// Durbin-Levinson recursion. Intervals use the white-noise standard error
/// `1 / sqrt(n)` at every lag.
///
/// `nlags` must be below half the sample size.
pub fn pacf(series: &[f64], nlags: usize, method: PacfMethod, alpha: f64) -> Result<AcfResult> {
    let n = series.len();
    if n == 0 {
        return Err(StatsError::EmptyData);
    }
    if nlags >= n / 2 {
        return Err(StatsError::InvalidArgument(format!(
            "can only compute partial correlations for lags up to 50% of the sample size, \
             requested {} lags with {} observations",
            nlags, n
        )));
    }
    validate_alpha(alpha)?;

    let m = mean(series);
    let centered: Vec<f64> = series.iter().map(|x| x - m).collect();
    let autocov: Vec<f64> = (0..=nlags)
        .map(|lag| {
            let sum: f64 = centered[lag..]
                .iter()
                .zip(centered.iter())
                .map(|(a, b)| a * b)
                .sum();
            match method {
                PacfMethod::YuleWalkerAdjusted => sum / (n - lag) as f64,
                PacfMethod::YuleWalkerMle => sum / n as f64,
            }
        })
        .collect();

    let r: Vec<f64> = if autocov[0] == 0.0 {
        (0..=nlags).map(|k| if k == 0 { 1.0 } else { 0.0 }).collect()
    } else {
        autocov.iter().map(|c| c / autocov[0]).collect()
    };

    let values = durbin_levinson(&r);
    let half_width = quantile_normal(1.0 - alpha / 2.0) / (n as f64).sqrt();
    let confint = values
        .iter()
        .map(|&v| (v - half_width, v + half_width))
        .collect();

    Ok(AcfResult { values, confint })
}

/// Partial autocorrelations from autocorrelations `r[0..=p]` (with `r[0] == 1`).
///
/// Lags after a degenerate step are NaN.
fn durbin_levinson(r: &[f64]) -> Vec<f64> {
    let p = r.len().saturating_sub(1);
    let mut result = vec![f64::NAN; p + 1];
    result[0] = 1.0;
    if p == 0 {
        return result;
    }

    let mut phi = vec![0.0; p + 1];
    phi[1] = r[1];
    result[1] = r[1];

    for k in 2..=p {
        let mut num = r[k];
        let mut denom = 1.0;
        for j in 1..k {
            num -= phi[j] * r[k - j];
            denom -= phi[j] * r[j];
        }

        if denom.abs() < 1e-12 {
            return result;
        }

        let phi_kk = num / denom;
        let previous = phi.clone();
        for j in 1..k {
            phi[j] = previous[j] - phi_kk * previous[k - j];
        }
        phi[k] = phi_kk;
        result[k] = phi_kk;
    }

    result
}

fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidArgument(format!(
            "alpha must be greater than 0 and less than 1, got {}",
            alpha
        )))
    }
}
