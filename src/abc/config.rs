//! ABC configuration.

use crate::error::ValidationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the Artificial Bee Colony.
///
/// Both parameters default relative to the population, so they are
/// resolved when the strategy is built.
///
/// # Examples
///
/// ```
/// use u_swarm::abc::AbcConfig;
///
/// let config = AbcConfig::default().with_limit(20).with_forager_size(10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AbcConfig {
    /// Failed improvement attempts a forager tolerates before it is
    /// abandoned and scouted anew.
    ///
    /// Defaults to `population_size * dimensions / 2`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub limit: Option<usize>,

    /// Number of foragers: the first `forager_size` members. The remaining
    /// members are observers.
    ///
    /// Defaults to half the population.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub forager_size: Option<usize>,
}

impl AbcConfig {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_forager_size(mut self, n: usize) -> Self {
        self.forager_size = Some(n);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.forager_size {
            Some(n) if n < 2 => Err(ValidationError::parameter(
                "forager_size",
                format!("at least 2 foragers are required, got {n}"),
            )),
            _ => Ok(()),
        }
    }

    /// Resolves `(limit, forager_size)` for a concrete population.
    pub(crate) fn resolve(
        &self,
        population_size: usize,
        dimensions: usize,
    ) -> Result<(usize, usize), ValidationError> {
        self.validate()?;
        let forager_size = self.forager_size.unwrap_or(population_size / 2);
        if forager_size < 2 {
            return Err(ValidationError::parameter(
                "forager_size",
                format!(
                    "at least 2 foragers are required; the default half of a population of {population_size} gives {forager_size}"
                ),
            ));
        }
        if forager_size > population_size {
            return Err(ValidationError::parameter(
                "forager_size",
                format!("{forager_size} foragers exceed the population of {population_size}"),
            ));
        }
        let limit = self.limit.unwrap_or(population_size * dimensions / 2);
        Ok((limit, forager_size))
    }
}
