//! Statistical utility functions.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Quantile function (inverse CDF) of the standard normal distribution.
///
/// # Arguments
/// * `p` - Probability value (0.0 to 1.0)
///
/// # Returns
/// The z-score corresponding to the given probability.
///
/// # Example
/// ```
/// use anofox_seasonality::utils::quantile_normal;
///
/// // 95% confidence level -> z ≈ 1.96
/// let z = quantile_normal(0.975);
/// assert!((z - 1.96).abs() < 0.01);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(p))
        .unwrap_or(f64::NAN)
}

/// Density of a normal distribution with the given mean and standard deviation.
///
/// Returns NaN when `std_dev` is not strictly positive.
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev)
        .map(|normal| normal.pdf(x))
        .unwrap_or(f64::NAN)
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the population variance of a slice (n denominator).
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Calculate the population standard deviation of a slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Indices of strict local maxima.
///
/// An index `i` qualifies when `values[i - 1] < values[i] > values[i + 1]`.
/// The first and last samples never qualify, and a plateau (two or more equal
/// neighbouring values at the top) is not a maximum. NaN never compares
/// greater, so it never qualifies either.
pub fn local_maxima(values: &[f64]) -> Vec<usize> {
    values
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, _)| i + 1)
        .collect()
}

/// `num` evenly spaced points over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
