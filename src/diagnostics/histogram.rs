//! Histogram binning for series values.

use crate::core::TimeSeries;
use crate::error::{Result, StatsError};
use tracing::warn;

/// Highest number of components [`series_histograms`] bins.
pub const MAX_HISTOGRAM_COMPONENTS: usize = 4;

/// How values are split into bins.
#[derive(Debug, Clone, PartialEq)]
pub enum Bins {
    /// Equal-width bins spanning the data range.
    Count(usize),
    /// Explicit, strictly increasing bin edges.
    Edges(Vec<f64>),
}

impl Default for Bins {
    fn default() -> Self {
        Bins::Count(10)
    }
}

/// Binned counts.
///
/// Bin `i` covers `[edges[i], edges[i + 1])`; the last bin also includes its
/// right edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins.
    pub edges: Vec<f64>,
    /// Count per bin, or density when `density` is set.
    pub counts: Vec<f64>,
    /// Whether `counts` integrate to 1 over the edges.
    pub density: bool,
}

impl Histogram {
    /// Number of bins.
    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    /// Midpoint of each bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}

/// Bin `values` into a histogram.
///
/// Non-finite values are skipped. Values outside explicit edges are not
/// counted. A constant input with `Bins::Count` spans `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: &Bins, density: bool) -> Result<Histogram> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(StatsError::EmptyData);
    }

    let edges = match bins {
        Bins::Count(0) => {
            return Err(StatsError::InvalidArgument(
                "number of bins must be positive".to_string(),
            ))
        }
        Bins::Count(k) => {
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let (lo, hi) = if min == max {
                (min - 0.5, max + 0.5)
            } else {
                (min, max)
            };
            crate::utils::linspace(lo, hi, k + 1)
        }
        Bins::Edges(edges) => {
            if edges.len() < 2 {
                return Err(StatsError::InvalidArgument(
                    "at least two bin edges are required".to_string(),
                ));
            }
            if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[1] <= w[0]) {
                return Err(StatsError::InvalidArgument(
                    "bin edges must be finite and strictly increasing".to_string(),
                ));
            }
            edges.clone()
        }
    };

    let num_bins = edges.len() - 1;
    let first = edges[0];
    let last = edges[num_bins];
    let mut counts = vec![0.0; num_bins];
    for &x in &finite {
        if x < first || x > last {
            continue;
        }
        // Number of edges <= x, minus one; the right edge folds into the last bin
        let bin = (edges.partition_point(|&e| e <= x) - 1).min(num_bins - 1);
        counts[bin] += 1.0;
    }

    if density {
        let total: f64 = counts.iter().sum();
        for (count, w) in counts.iter_mut().zip(edges.windows(2)) {
            *count /= total * (w[1] - w[0]);
        }
    }

    Ok(Histogram {
        edges,
        counts,
        density,
    })
}

/// One histogram per component, with all sample paths pooled.
///
/// Only the first [`MAX_HISTOGRAM_COMPONENTS`] components are binned.
pub fn series_histograms(
    series: &TimeSeries,
    bins: &Bins,
    density: bool,
) -> Result<Vec<Histogram>> {
    let dimensions = series.dimensions();
    if dimensions > MAX_HISTOGRAM_COMPONENTS {
        warn!(
            dimensions,
            shown = MAX_HISTOGRAM_COMPONENTS,
            "too many components for histograms, only the first ones are binned"
        );
    }

    (0..dimensions.min(MAX_HISTOGRAM_COMPONENTS))
        .map(|dim| histogram(series.all_values(dim)?, bins, density))
        .collect()
}
