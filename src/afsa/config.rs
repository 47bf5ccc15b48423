//! AFSA configuration.

use crate::error::ValidationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Visual radius schedule, as fractions of the widest bound range.
///
/// The radius decays linearly from `initial` toward zero over the run and
/// never drops below `min`. Serialized as `[min, initial]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 2]", into = "[f64; 2]"))]
pub struct VisualRange {
    /// Floor of the schedule.
    pub min: f64,
    /// Radius at the first iteration.
    pub initial: f64,
}

impl Default for VisualRange {
    fn default() -> Self {
        Self {
            min: 1.0,
            initial: 8.0,
        }
    }
}

impl From<[f64; 2]> for VisualRange {
    fn from([min, initial]: [f64; 2]) -> Self {
        Self { min, initial }
    }
}

impl From<VisualRange> for [f64; 2] {
    fn from(v: VisualRange) -> Self {
        [v.min, v.initial]
    }
}

/// Configuration for the Artificial Fish-Swarm Algorithm.
///
/// # Examples
///
/// ```
/// use u_swarm::afsa::AfsaConfig;
///
/// let config = AfsaConfig::default()
///     .with_visual(0.05, 0.5)
///     .with_teta(0.6)
///     .with_max_tries(10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AfsaConfig {
    /// Best-value change below which an iteration counts as stagnant.
    pub eta: f64,

    /// Stagnant iterations tolerated before random jumps start.
    #[cfg_attr(feature = "serde", serde(rename = "maxTryNum"))]
    pub max_tries: usize,

    /// Visual radius schedule.
    pub visual: VisualRange,

    /// Crowding threshold: when the fraction of the population within
    /// sight exceeds it, a fish only searches.
    pub teta: f64,
}

impl Default for AfsaConfig {
    fn default() -> Self {
        Self {
            eta: 1e-4,
            max_tries: 5,
            visual: VisualRange::default(),
            teta: 1.0,
        }
    }
}

impl AfsaConfig {
    pub fn with_eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    pub fn with_max_tries(mut self, n: usize) -> Self {
        self.max_tries = n;
        self
    }

    pub fn with_visual(mut self, min: f64, initial: f64) -> Self {
        self.visual = VisualRange { min, initial };
        self
    }

    pub fn with_teta(mut self, teta: f64) -> Self {
        self.teta = teta;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.eta >= 0.0 && self.eta.is_finite()) {
            return Err(ValidationError::parameter(
                "eta",
                format!("must be finite and non-negative, got {}", self.eta),
            ));
        }
        let VisualRange { min, initial } = self.visual;
        if !(min >= 0.0 && min.is_finite() && initial >= 0.0 && initial.is_finite()) {
            return Err(ValidationError::parameter(
                "visual",
                format!("bounds must be finite and non-negative, got [{min}, {initial}]"),
            ));
        }
        if !(self.teta >= 0.0 && self.teta.is_finite()) {
            return Err(ValidationError::parameter(
                "teta",
                format!("must be finite and non-negative, got {}", self.teta),
            ));
        }
        Ok(())
    }
}
