//! SFLA configuration.

use crate::error::ValidationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the Shuffled Frog-Leaping Algorithm.
///
/// # Examples
///
/// ```
/// use u_swarm::sfla::SflaConfig;
///
/// let config = SflaConfig::default().with_subpopulations(4).with_inner_iterations(5);
/// assert!(config.validate_for(20).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SflaConfig {
    /// Number of memeplexes.
    #[cfg_attr(feature = "serde", serde(rename = "subpopulationsCount"))]
    pub subpopulations: usize,

    /// Local search steps per memeplex and iteration.
    #[cfg_attr(feature = "serde", serde(rename = "iMax"))]
    pub inner_iterations: usize,
}

impl Default for SflaConfig {
    fn default() -> Self {
        Self {
            subpopulations: 1,
            inner_iterations: 10,
        }
    }
}

impl SflaConfig {
    pub fn with_subpopulations(mut self, n: usize) -> Self {
        self.subpopulations = n;
        self
    }

    pub fn with_inner_iterations(mut self, n: usize) -> Self {
        self.inner_iterations = n;
        self
    }

    /// Validates the configuration on its own.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subpopulations == 0 {
            return Err(ValidationError::parameter(
                "subpopulations",
                "at least one memeplex is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates the configuration against a population of `population_size`.
    pub fn validate_for(&self, population_size: usize) -> Result<(), ValidationError> {
        self.validate()?;
        if self.subpopulations > population_size {
            return Err(ValidationError::parameter(
                "subpopulations",
                format!(
                    "{} memeplexes cannot be formed from {} members",
                    self.subpopulations, population_size
                ),
            ));
        }
        Ok(())
    }
}
