//! Firefly configuration.

use crate::error::ValidationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the Firefly Algorithm.
///
/// # Examples
///
/// ```
/// use u_swarm::fa::FaConfig;
///
/// let config = FaConfig::default().with_gamma(1.0).with_alpha(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FaConfig {
    /// Attractiveness at distance zero.
    pub beta0: f64,

    /// Light absorption coefficient. Divided by the largest distance from
    /// the moving firefly, so it is scale free.
    pub gamma: f64,

    /// Amplitude of the random step added to every move.
    pub alpha: f64,
}

impl Default for FaConfig {
    fn default() -> Self {
        Self {
            beta0: 1.0,
            gamma: 0.8,
            alpha: 0.01,
        }
    }
}

impl FaConfig {
    pub fn with_beta0(mut self, beta0: f64) -> Self {
        self.beta0 = beta0;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.beta0.is_finite() {
            return Err(ValidationError::parameter(
                "beta0",
                format!("must be finite, got {}", self.beta0),
            ));
        }
        for (name, value) in [("gamma", self.gamma), ("alpha", self.alpha)] {
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
