//! Base run configuration shared by every algorithm.

use super::types::Bound;
use crate::error::ValidationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Search space, population and budget of a run.
///
/// The population is either given explicitly or sampled uniformly within
/// the bounds. Dimensionality is taken from whichever of `bounds`,
/// `population` and `dimensions` is present; all present ones must agree.
///
/// # Examples
///
/// ```
/// use u_swarm::engine::{Bound, EngineConfig};
///
/// let config = EngineConfig::default()
///     .with_iterations(100)
///     .with_bounds(vec![Bound::new(-5.0, 5.0), Bound::new(-5.0, 5.0)])
///     .with_population_size(30)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Number of iterations after the initial snapshot.
    #[cfg_attr(feature = "serde", serde(rename = "maxIter"))]
    pub iterations: usize,

    /// Per-dimension bounds. Defaults to `[-100, 100]` in every dimension.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bounds: Option<Vec<Bound>>,

    /// Explicit initial population.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "initialPopulation", skip_serializing_if = "Option::is_none")
    )]
    pub population: Option<Vec<Vec<f64>>>,

    /// Population size when no explicit population is given.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "populationSize", skip_serializing_if = "Option::is_none")
    )]
    pub population_size: Option<usize>,

    /// Explicit dimensionality.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "numDimensions", skip_serializing_if = "Option::is_none")
    )]
    pub dimensions: Option<usize>,

    /// Random seed. Absent means a fresh seed per run.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub seed: Option<u64>,
}

/// Shape of a run derived from a valid [`EngineConfig`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Layout {
    pub dimensions: usize,
    pub population_size: usize,
    pub bounds: Vec<Bound>,
}

impl EngineConfig {
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_bounds(mut self, bounds: Vec<Bound>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Uses the same `[min, max]` range in each of `dimensions` dimensions.
    pub fn with_uniform_bounds(self, min: f64, max: f64, dimensions: usize) -> Self {
        self.with_bounds(vec![Bound::new(min, max); dimensions])
    }

    pub fn with_population(mut self, population: Vec<Vec<f64>>) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = Some(n);
        self
    }

    pub fn with_dimensions(mut self, n: usize) -> Self {
        self.dimensions = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.layout().map(|_| ())
    }

    /// Validates the configuration and resolves dimensionality, population
    /// size and effective bounds.
    pub(crate) fn layout(&self) -> Result<Layout, ValidationError> {
        if let Some(bounds) = &self.bounds {
            if bounds.is_empty() {
                return Err(ValidationError::EmptyBounds);
            }
            if let Some((index, b)) = bounds.iter().enumerate().find(|(_, b)| !b.is_valid()) {
                return Err(ValidationError::InvalidBounds {
                    index,
                    min: b.min,
                    max: b.max,
                });
            }
        }

        let population_dims = match &self.population {
            Some(population) => {
                let first = population.first().ok_or(ValidationError::EmptyPopulation)?;
                if let Some((index, member)) = population
                    .iter()
                    .enumerate()
                    .find(|(_, m)| m.len() != first.len())
                {
                    return Err(ValidationError::RaggedPopulation {
                        index,
                        expected: first.len(),
                        got: member.len(),
                    });
                }
                Some(first.len())
            }
            None => None,
        };

        let population_size = match (&self.population, self.population_size) {
            (None, None) => return Err(ValidationError::MissingPopulation),
            (None, Some(0)) => return Err(ValidationError::EmptyPopulation),
            (None, Some(n)) => n,
            (Some(p), Some(n)) if p.len() != n => {
                return Err(ValidationError::PopulationSizeMismatch {
                    population: p.len(),
                    requested: n,
                })
            }
            (Some(p), _) => p.len(),
        };

        if self.dimensions == Some(0) {
            return Err(ValidationError::ZeroDimensions);
        }

        let bounds_dims = self.bounds.as_ref().map(Vec::len);
        let sources = [
            ("bounds", bounds_dims),
            ("population", population_dims),
            ("dimensions", self.dimensions),
        ];
        for (i, (left, left_dims)) in sources.iter().enumerate() {
            for (right, right_dims) in &sources[i + 1..] {
                if let (Some(l), Some(r)) = (left_dims, right_dims) {
                    if l != r {
                        return Err(ValidationError::DimensionMismatch {
                            left: *left,
                            left_dims: *l,
                            right: *right,
                            right_dims: *r,
                        });
                    }
                }
            }
        }

        let dimensions = bounds_dims
            .or(population_dims)
            .or(self.dimensions)
            .ok_or(ValidationError::MissingDimensions)?;
        if dimensions == 0 {
            return Err(ValidationError::ZeroDimensions);
        }

        let bounds = self
            .bounds
            .clone()
            .unwrap_or_else(|| vec![Bound::DEFAULT; dimensions]);

        if let Some(population) = &self.population {
            for (index, member) in population.iter().enumerate() {
                for (dimension, (&value, b)) in member.iter().zip(&bounds).enumerate() {
                    if !b.contains(value) {
                        return Err(ValidationError::PopulationOutOfBounds {
                            index,
                            dimension,
                            value,
                        });
                    }
                }
            }
        }

        Ok(Layout {
            dimensions,
            population_size,
            bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Bound> {
        vec![Bound::new(-5.0, 5.0), Bound::new(-5.0, 5.0)]
    }

    #[test]
    fn test_default_bounds_from_dimensions() {
        let layout = EngineConfig::default()
            .with_population_size(4)
            .with_dimensions(3)
            .layout()
            .unwrap();
        assert_eq!(layout.dimensions, 3);
        assert_eq!(layout.population_size, 4);
        assert_eq!(layout.bounds, vec![Bound::DEFAULT; 3]);
    }

    #[test]
    fn test_dimensions_from_population() {
        let layout = EngineConfig::default()
            .with_population(vec![vec![1.0, 2.0, 3.0, 4.0]; 2])
            .layout()
            .unwrap();
        assert_eq!(layout.dimensions, 4);
        assert_eq!(layout.population_size, 2);
        assert_eq!(layout.bounds.len(), 4);
    }

    #[test]
    fn test_dimensions_from_bounds() {
        let layout = EngineConfig::default()
            .with_bounds(square())
            .with_population_size(10)
            .layout()
            .unwrap();
        assert_eq!(layout.dimensions, 2);
        assert_eq!(layout.bounds, square());
    }

    #[test]
    fn test_missing_population() {
        let err = EngineConfig::default().with_dimensions(2).validate();
        assert_eq!(err, Err(ValidationError::MissingPopulation));
    }

    #[test]
    fn test_empty_population() {
        assert_eq!(
            EngineConfig::default()
                .with_population(Vec::new())
                .validate(),
            Err(ValidationError::EmptyPopulation)
        );
        assert_eq!(
            EngineConfig::default()
                .with_population_size(0)
                .with_dimensions(2)
                .validate(),
            Err(ValidationError::EmptyPopulation)
        );
    }

    #[test]
    fn test_missing_dimensions() {
        let err = EngineConfig::default().with_population_size(5).validate();
        assert_eq!(err, Err(ValidationError::MissingDimensions));
    }

    #[test]
    fn test_zero_dimensions() {
        let err = EngineConfig::default()
            .with_population_size(5)
            .with_dimensions(0)
            .validate();
        assert_eq!(err, Err(ValidationError::ZeroDimensions));
    }

    #[test]
    fn test_bounds_population_mismatch() {
        let err = EngineConfig::default()
            .with_bounds(square())
            .with_population(vec![vec![0.0, 0.0, 0.0]])
            .validate();
        assert_eq!(
            err,
            Err(ValidationError::DimensionMismatch {
                left: "bounds",
                left_dims: 2,
                right: "population",
                right_dims: 3,
            })
        );
    }

    #[test]
    fn test_bounds_dimensions_mismatch() {
        let err = EngineConfig::default()
            .with_bounds(square())
            .with_population_size(3)
            .with_dimensions(5)
            .validate();
        assert!(matches!(
            err,
            Err(ValidationError::DimensionMismatch {
                left: "bounds",
                right: "dimensions",
                ..
            })
        ));
    }

    #[test]
    fn test_population_dimensions_mismatch() {
        let err = EngineConfig::default()
            .with_population(vec![vec![0.0, 0.0]])
            .with_dimensions(1)
            .validate();
        assert!(matches!(
            err,
            Err(ValidationError::DimensionMismatch {
                left: "population",
                right: "dimensions",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_bounds() {
        assert_eq!(
            EngineConfig::default()
                .with_bounds(Vec::new())
                .with_population_size(2)
                .validate(),
            Err(ValidationError::EmptyBounds)
        );
        assert_eq!(
            EngineConfig::default()
                .with_bounds(vec![Bound::new(0.0, 1.0), Bound::new(3.0, 2.0)])
                .with_population_size(2)
                .validate(),
            Err(ValidationError::InvalidBounds {
                index: 1,
                min: 3.0,
                max: 2.0
            })
        );
    }

    #[test]
    fn test_ragged_population() {
        let err = EngineConfig::default()
            .with_population(vec![vec![0.0, 0.0], vec![0.0]])
            .validate();
        assert_eq!(
            err,
            Err(ValidationError::RaggedPopulation {
                index: 1,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_population_out_of_bounds() {
        let err = EngineConfig::default()
            .with_bounds(square())
            .with_population(vec![vec![0.0, 0.0], vec![0.0, 6.0]])
            .validate();
        assert_eq!(
            err,
            Err(ValidationError::PopulationOutOfBounds {
                index: 1,
                dimension: 1,
                value: 6.0
            })
        );
    }

    #[test]
    fn test_population_size_mismatch() {
        let err = EngineConfig::default()
            .with_population(vec![vec![0.0]; 3])
            .with_population_size(4)
            .validate();
        assert_eq!(
            err,
            Err(ValidationError::PopulationSizeMismatch {
                population: 3,
                requested: 4
            })
        );

        let ok = EngineConfig::default()
            .with_population(vec![vec![0.0]; 3])
            .with_population_size(3)
            .validate();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_uniform_bounds() {
        let config = EngineConfig::default().with_uniform_bounds(-1.0, 1.0, 3);
        assert_eq!(config.bounds, Some(vec![Bound::new(-1.0, 1.0); 3]));
    }
}
