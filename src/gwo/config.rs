//! GWO configuration.

use crate::error::ValidationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the Grey Wolf Optimizer.
///
/// # Examples
///
/// ```
/// use u_swarm::gwo::GwoConfig;
///
/// let config = GwoConfig::default().with_initial_a(1.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GwoConfig {
    /// Starting value of the exploration coefficient `a`, which decays
    /// linearly to zero over the run.
    #[cfg_attr(feature = "serde", serde(rename = "InitialA"))]
    pub initial_a: f64,

    /// The coefficient `C`, constant for the whole run.
    #[cfg_attr(feature = "serde", serde(rename = "InitialC"))]
    pub initial_c: f64,
}

impl Default for GwoConfig {
    fn default() -> Self {
        Self {
            initial_a: 2.0,
            initial_c: 2.0,
        }
    }
}

impl GwoConfig {
    pub fn with_initial_a(mut self, a: f64) -> Self {
        self.initial_a = a;
        self
    }

    pub fn with_initial_c(mut self, c: f64) -> Self {
        self.initial_c = c;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [("initial_a", self.initial_a), ("initial_c", self.initial_c)] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ValidationError::parameter(
                    name,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}
