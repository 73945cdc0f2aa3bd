//! TimeSeries data structure for representing temporal data.

use crate::error::{Result, StatsError};
use chrono::{DateTime, Duration, Utc};

/// A time series with timestamps, one or more components and one or more
/// sample paths per component.
///
/// Values are stored per component. Within a component, sample paths are laid
/// out back to back: `values[component][sample * len + t]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<Vec<f64>>,
    n_samples: usize,
    labels: Vec<String>,
}

/// Builder for constructing TimeSeries.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    timestamps: Vec<DateTime<Utc>>,
    components: Vec<Vec<Vec<f64>>>,
    labels: Vec<String>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Set univariate deterministic values.
    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.components = vec![vec![values]];
        self
    }

    /// Add a deterministic component.
    pub fn component(mut self, values: Vec<f64>) -> Self {
        self.components.push(vec![values]);
        self
    }

    /// Add a stochastic component made of several sample paths.
    pub fn sampled_component(mut self, samples: Vec<Vec<f64>>) -> Self {
        self.components.push(samples);
        self
    }

    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn build(self) -> Result<TimeSeries> {
        TimeSeries::new(self.timestamps, self.components, self.labels)
    }
}

impl TimeSeries {
    /// Create a new TimeSeries from `components[component][sample][t]`.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        components: Vec<Vec<Vec<f64>>>,
        labels: Vec<String>,
    ) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(StatsError::EmptyData);
        }

        // Validate timestamps are strictly increasing
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(StatsError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        if components.is_empty() {
            return Err(StatsError::EmptyData);
        }

        let n = timestamps.len();
        let n_samples = components[0].len();
        if n_samples == 0 {
            return Err(StatsError::EmptyData);
        }

        let mut values = Vec::with_capacity(components.len());
        for samples in components {
            if samples.len() != n_samples {
                return Err(StatsError::DimensionMismatch {
                    expected: n_samples,
                    got: samples.len(),
                });
            }
            let mut flat = Vec::with_capacity(n * n_samples);
            for path in samples {
                if path.len() != n {
                    return Err(StatsError::DimensionMismatch {
                        expected: n,
                        got: path.len(),
                    });
                }
                flat.extend(path);
            }
            values.push(flat);
        }

        // Validate labels count if provided
        if !labels.is_empty() && labels.len() != values.len() {
            return Err(StatsError::DimensionMismatch {
                expected: values.len(),
                got: labels.len(),
            });
        }

        Ok(Self {
            timestamps,
            values,
            n_samples,
            labels,
        })
    }

    /// Create a simple univariate deterministic time series.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        Self::new(timestamps, vec![vec![values]], vec![])
    }

    /// Create a univariate series with several sample paths per timestamp.
    pub fn stochastic(timestamps: Vec<DateTime<Utc>>, samples: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(timestamps, vec![samples], vec![])
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of components (1 for univariate).
    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    /// Number of sample paths per component (1 for deterministic).
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn is_univariate(&self) -> bool {
        self.values.len() == 1
    }

    pub fn is_deterministic(&self) -> bool {
        self.n_samples == 1
    }

    /// Fail unless the series has exactly one component.
    pub fn ensure_univariate(&self) -> Result<()> {
        if self.is_univariate() {
            Ok(())
        } else {
            Err(StatsError::NotUnivariate {
                dimensions: self.dimensions(),
            })
        }
    }

    /// Fail unless the series has exactly one sample path.
    pub fn ensure_deterministic(&self) -> Result<()> {
        if self.is_deterministic() {
            Ok(())
        } else {
            Err(StatsError::NotDeterministic {
                samples: self.n_samples,
            })
        }
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// True when both series share exactly the same timestamps.
    pub fn has_same_time_as(&self, other: &TimeSeries) -> bool {
        self.timestamps == other.timestamps
    }

    /// Get the first sample path of a component.
    pub fn values(&self, dimension: usize) -> Result<&[f64]> {
        self.sample_values(dimension, 0)
    }

    /// Get one sample path of a component.
    pub fn sample_values(&self, dimension: usize, sample: usize) -> Result<&[f64]> {
        let dim = self
            .values
            .get(dimension)
            .ok_or(StatsError::IndexOutOfBounds {
                index: dimension,
                size: self.values.len(),
            })?;
        if sample >= self.n_samples {
            return Err(StatsError::IndexOutOfBounds {
                index: sample,
                size: self.n_samples,
            });
        }
        let n = self.len();
        Ok(&dim[sample * n..(sample + 1) * n])
    }

    /// Get every sample of a component, paths back to back.
    pub fn all_values(&self, dimension: usize) -> Result<&[f64]> {
        self.values
            .get(dimension)
            .map(|v| v.as_slice())
            .ok_or(StatsError::IndexOutOfBounds {
                index: dimension,
                size: self.values.len(),
            })
    }

    /// Values of a univariate deterministic series.
    pub fn univariate_values(&self) -> Result<&[f64]> {
        self.ensure_univariate()?;
        self.ensure_deterministic()?;
        Ok(&self.values[0])
    }

    /// Get component labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of a component, falling back to its index.
    pub fn label(&self, dimension: usize) -> String {
        self.labels
            .get(dimension)
            .cloned()
            .unwrap_or_else(|| dimension.to_string())
    }

    /// Build a univariate series on this series' time index.
    pub fn with_values(&self, values: Vec<f64>) -> Result<TimeSeries> {
        TimeSeries::univariate(self.timestamps.clone(), values)
    }

    /// Combine two univariate deterministic series elementwise.
    ///
    /// The result keeps `self`'s time index. Only the lengths are checked;
    /// the timestamps of `other` are not compared.
    pub fn combine<F>(&self, other: &TimeSeries, op: F) -> Result<TimeSeries>
    where
        F: Fn(f64, f64) -> f64,
    {
        let lhs = self.univariate_values()?;
        let rhs = other.univariate_values()?;
        if lhs.len() != rhs.len() {
            return Err(StatsError::DimensionMismatch {
                expected: lhs.len(),
                got: rhs.len(),
            });
        }

        let values = lhs.iter().zip(rhs).map(|(&a, &b)| op(a, b)).collect();
        Ok(TimeSeries {
            timestamps: self.timestamps.clone(),
            values: vec![values],
            n_samples: 1,
            labels: self.labels.clone(),
        })
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values
            .iter()
            .any(|dim| dim.iter().any(|v| v.is_nan() || v.is_infinite()))
    }

    /// Return a copy with linear interpolation for NaN values, per sample path.
    pub fn interpolated(&self, fill_edges: bool) -> TimeSeries {
        let n = self.len();
        let values: Vec<Vec<f64>> = self
            .values
            .iter()
            .map(|dim| {
                dim.chunks(n)
                    .flat_map(|path| interpolate_series(path, fill_edges))
                    .collect()
            })
            .collect();

        TimeSeries {
            timestamps: self.timestamps.clone(),
            values,
            n_samples: self.n_samples,
            labels: self.labels.clone(),
        }
    }

    /// Gaps between consecutive timestamps.
    pub fn spacings(&self) -> Vec<Duration> {
        self.timestamps.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

/// Linear interpolation for a series with NaN values.
fn interpolate_series(values: &[f64], fill_edges: bool) -> Vec<f64> {
    if values.is_empty() {
        return vec![];
    }

    let mut result = values.to_vec();
    let n = result.len();

    let mut i = 0;
    while i < n {
        if result[i].is_nan() {
            let start = i;
            while i < n && result[i].is_nan() {
                i += 1;
            }
            let end = i;

            let left = if start > 0 {
                Some(result[start - 1])
            } else {
                None
            };
            let right = if end < n { Some(result[end]) } else { None };

            match (left, right) {
                (Some(l), Some(r)) => {
                    // Gap spans (end - start + 1) segments between the two anchors
                    let segments = (end - start + 1) as f64;
                    for (j, idx) in (start..end).enumerate() {
                        let t = (j + 1) as f64 / segments;
                        result[idx] = l + t * (r - l);
                    }
                }
                (Some(l), None) if fill_edges => {
                    result[start..end].fill(l);
                }
                (None, Some(r)) if fill_edges => {
                    result[start..end].fill(r);
                }
                _ => {}
            }
        } else {
            i += 1;
        }
    }

    result
}
