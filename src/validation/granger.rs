//! Granger causality tests.
//!
//! For each lag `L`, compares an autoregression of the effect on its own
//! `L` lags (restricted) with one that also includes `L` lags of the cause
//! (unrestricted). A significant improvement means the cause's past helps
//! predict the effect.

use crate::core::TimeSeries;
use crate::error::{Result, StatsError};
use crate::utils::ols::{ols_fit, OLSResult};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};
use std::collections::BTreeMap;
use tracing::info;

/// One test statistic with its p-value.
#[derive(Debug, Clone, PartialEq)]
pub struct GrangerTest {
    /// Test statistic
    pub statistic: f64,
    /// P-value
    pub p_value: f64,
    /// Numerator degrees of freedom (the lag)
    pub df_num: usize,
    /// Denominator degrees of freedom, for F tests only
    pub df_denom: Option<usize>,
}

impl GrangerTest {
    /// True when the null of no Granger causality is rejected at `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Granger causality tests for a single lag.
#[derive(Debug, Clone)]
pub struct GrangerLagResult {
    /// F test on the sum of squared residuals
    pub ssr_ftest: GrangerTest,
    /// Chi-squared test on the sum of squared residuals
    pub ssr_chi2test: GrangerTest,
    /// Likelihood ratio test
    pub lrtest: GrangerTest,
    /// F test that all cause coefficients are zero
    pub params_ftest: GrangerTest,
    /// Effect regressed on its own lags
    pub restricted: OLSResult,
    /// Effect regressed on its own lags and the cause's lags
    pub unrestricted: OLSResult,
}

/// Runs Granger causality tests for lags `1..=max_lag`.
///
/// Tests whether `cause` Granger-causes `effect`. Both series must be
/// univariate, deterministic and share the same time index.
///
/// # Errors
/// * `InvalidArgument` when `max_lag` is 0
/// * `TimeIndexMismatch` when the time indices differ
/// * `InsufficientData` unless `n > 3 * max_lag + add_const`
/// * `ComputationError` when a regression is singular
#[tracing::instrument(
    skip_all,
    fields(n = effect.len(), max_lag = max_lag, add_const = add_const)
)]
pub fn granger_causality_tests(
    cause: &TimeSeries,
    effect: &TimeSeries,
    max_lag: usize,
    add_const: bool,
) -> Result<BTreeMap<usize, GrangerLagResult>> {
    let x = cause.univariate_values()?;
    let y = effect.univariate_values()?;
    if !cause.has_same_time_as(effect) {
        return Err(StatsError::TimeIndexMismatch);
    }
    if max_lag < 1 {
        return Err(StatsError::InvalidArgument(
            "max_lag must be a positive integer".to_string(),
        ));
    }

    let n = y.len();
    let needed = 3 * max_lag + usize::from(add_const) + 1;
    if n < needed {
        return Err(StatsError::InsufficientData { needed, got: n });
    }

    let mut results = BTreeMap::new();
    for lag in 1..=max_lag {
        let result = test_lag(x, y, lag, add_const)?;
        info!(
            lag,
            ssr_f = result.ssr_ftest.statistic,
            ssr_f_p = result.ssr_ftest.p_value,
            ssr_chi2 = result.ssr_chi2test.statistic,
            ssr_chi2_p = result.ssr_chi2test.p_value,
            lr = result.lrtest.statistic,
            lr_p = result.lrtest.p_value,
            "Granger causality"
        );
        results.insert(lag, result);
    }

    Ok(results)
}

fn test_lag(x: &[f64], y: &[f64], lag: usize, add_const: bool) -> Result<GrangerLagResult> {
    let n = y.len();
    let target = &y[lag..];
    let lagged = |values: &[f64], k: usize| -> Vec<f64> { values[lag - k..n - k].to_vec() };

    let mut own: Vec<Vec<f64>> = (1..=lag).map(|k| lagged(y, k)).collect();
    let mut joint = own.clone();
    joint.extend((1..=lag).map(|k| lagged(x, k)));
    if add_const {
        own.push(vec![1.0; n - lag]);
        joint.push(vec![1.0; n - lag]);
    }

    let restricted = ols_fit(target, &own)?;
    let unrestricted = ols_fit(target, &joint)?;

    let df_u = unrestricted.df_resid;
    let ssr_gain = restricted.ssr - unrestricted.ssr;

    let f_stat = ssr_gain / unrestricted.ssr / lag as f64 * df_u as f64;
    let f_dist = FisherSnedecor::new(lag as f64, df_u as f64)
        .map_err(|e| StatsError::ComputationError(e.to_string()))?;
    let ssr_ftest = GrangerTest {
        statistic: f_stat,
        p_value: f_dist.sf(f_stat),
        df_num: lag,
        df_denom: Some(df_u),
    };

    let chi2 = ChiSquared::new(lag as f64)
        .map_err(|e| StatsError::ComputationError(e.to_string()))?;
    let chi2_stat = restricted.nobs as f64 * ssr_gain / unrestricted.ssr;
    let ssr_chi2test = GrangerTest {
        statistic: chi2_stat,
        p_value: chi2.sf(chi2_stat),
        df_num: lag,
        df_denom: None,
    };

    let lr_stat = -2.0 * (restricted.log_likelihood() - unrestricted.log_likelihood());
    let lrtest = GrangerTest {
        statistic: lr_stat,
        p_value: chi2.sf(lr_stat),
        df_num: lag,
        df_denom: None,
    };

    // Zero restrictions on nested OLS models reduce to the SSR form
    let params_ftest = ssr_ftest.clone();

    Ok(GrangerLagResult {
        ssr_ftest,
        ssr_chi2test,
        lrtest,
        params_ftest,
        restricted,
        unrestricted,
    })
}
