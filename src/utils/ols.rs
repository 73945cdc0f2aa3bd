//! Ordinary Least Squares (OLS) regression on an explicit design matrix.
//!
//! Used by the Granger causality tests, which compare a restricted and an
//! unrestricted autoregression.

use crate::error::{Result, StatsError};

/// Fitted OLS regression.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Coefficients, in the column order of the design matrix.
    pub params: Vec<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    /// Number of observations.
    pub nobs: usize,
    /// Residual degrees of freedom (`nobs - params`).
    pub df_resid: usize,
}

impl OLSResult {
    /// Gaussian log-likelihood at the fitted parameters.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }
}

/// Fit OLS regression: y = X @ params
///
/// Solves the normal equations with a Cholesky decomposition.
///
/// # Arguments
/// * `y` - Target values (length n)
/// * `columns` - Design matrix as column vectors (each length n); add a
///   column of ones for an intercept
pub fn ols_fit(y: &[f64], columns: &[Vec<f64>]) -> Result<OLSResult> {
    let n = y.len();
    let k = columns.len();

    if n == 0 {
        return Err(StatsError::InsufficientData { needed: 1, got: 0 });
    }
    if k == 0 {
        return Err(StatsError::InvalidArgument(
            "design matrix has no columns".into(),
        ));
    }
    if n <= k {
        return Err(StatsError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }
    for col in columns {
        if col.len() != n {
            return Err(StatsError::DimensionMismatch {
                expected: n,
                got: col.len(),
            });
        }
    }

    // X'X and X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for i in 0..k {
        for j in 0..=i {
            let s: f64 = columns[i].iter().zip(&columns[j]).map(|(a, b)| a * b).sum();
            xtx[i][j] = s;
            xtx[j][i] = s;
        }
        xty[i] = columns[i].iter().zip(y).map(|(a, b)| a * b).sum();
    }

    let params = solve_symmetric(&xtx, &xty).ok_or_else(|| {
        StatsError::ComputationError(
            "OLS regression failed: matrix not positive definite".into(),
        )
    })?;

    let ssr = (0..n)
        .map(|obs| {
            let fitted: f64 = columns.iter().zip(&params).map(|(c, p)| c[obs] * p).sum();
            (y[obs] - fitted).powi(2)
        })
        .sum();

    Ok(OLSResult {
        params,
        ssr,
        nobs: n,
        df_resid: n - k,
    })
}

/// Solve symmetric positive definite system using Cholesky decomposition.
///
/// Solves A @ x = b where A is symmetric positive definite.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // Cholesky decomposition A = L @ L'
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 1e-12 * a[i][i].abs().max(1.0) {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
