//! Decomposition model tags.

use crate::error::StatsError;
use std::fmt;

/// How trend and seasonal components combine with the series.
///
/// Default is `Multiplicative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelMode {
    /// Additive decomposition: y = trend + seasonal + residual
    ///
    /// Use when seasonal variation is constant regardless of the level.
    Additive,
    /// Multiplicative decomposition: y = trend * seasonal * residual
    ///
    /// Use when seasonal variation scales with the level. Needs strictly positive data.
    #[default]
    Multiplicative,
}

/// Seasonality tag, a superset of [`ModelMode`] that can also express
/// the absence of seasonality.
///
/// `None` is never a valid decomposition; operations that decompose or
/// remove a component reject it with [`StatsError::InvalidArgument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeasonalityMode {
    Additive,
    #[default]
    Multiplicative,
    None,
}

impl ModelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelMode::Additive => "additive",
            ModelMode::Multiplicative => "multiplicative",
        }
    }

    /// Remove `component` from `value`.
    pub fn remove(&self, value: f64, component: f64) -> f64 {
        match self {
            ModelMode::Additive => value - component,
            ModelMode::Multiplicative => value / component,
        }
    }

    /// Re-apply `component` to `value`; the inverse of [`ModelMode::remove`].
    pub fn apply(&self, value: f64, component: f64) -> f64 {
        match self {
            ModelMode::Additive => value + component,
            ModelMode::Multiplicative => value * component,
        }
    }
}

impl SeasonalityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonalityMode::Additive => "additive",
            SeasonalityMode::Multiplicative => "multiplicative",
            SeasonalityMode::None => "none",
        }
    }
}

impl From<ModelMode> for SeasonalityMode {
    fn from(mode: ModelMode) -> Self {
        match mode {
            ModelMode::Additive => SeasonalityMode::Additive,
            ModelMode::Multiplicative => SeasonalityMode::Multiplicative,
        }
    }
}

impl TryFrom<SeasonalityMode> for ModelMode {
    type Error = StatsError;

    fn try_from(mode: SeasonalityMode) -> Result<Self, Self::Error> {
        match mode {
            SeasonalityMode::Additive => Ok(ModelMode::Additive),
            SeasonalityMode::Multiplicative => Ok(ModelMode::Multiplicative),
            SeasonalityMode::None => Err(StatsError::InvalidArgument(
                "the model must be either MULTIPLICATIVE or ADDITIVE".to_string(),
            )),
        }
    }
}

impl fmt::Display for ModelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SeasonalityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
