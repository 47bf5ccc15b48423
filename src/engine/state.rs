//! Engine state owned by every strategy.

use super::config::{EngineConfig, Layout};
use super::types::{Bound, Member, Snapshot};
use crate::error::{Result, ValidationError};
use crate::objective::{normalize, Formula, Objective};
use crate::random::{rng_from_seed, SwarmRng};
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Shared optimization state of one run.
///
/// Holds the population with cached objective values, the bounds, the
/// iteration budget, the objective, the run's random stream and the
/// global best. Strategies compose one `Engine` and mutate it in place.
///
/// The global best is a private copy: it never aliases a population slot,
/// and its value only ever decreases.
#[derive(Debug, Clone)]
pub struct Engine<O> {
    pub(crate) objective: O,
    pub(crate) iterations: usize,
    pub(crate) bounds: Vec<Bound>,
    pub(crate) population: Vec<Member>,
    pub(crate) best: Member,
    pub(crate) rng: SwarmRng,
}

impl Engine<Formula> {
    /// Builds an engine whose objective is compiled from `formula`.
    ///
    /// The configuration is validated before the formula is compiled, so a
    /// malformed request never reaches the compiler.
    pub fn from_formula(formula: &str, config: &EngineConfig) -> Result<Self> {
        let layout = config.layout()?;
        let objective = Formula::compile(formula)?;
        Ok(Self::assemble(objective, config, layout))
    }
}

impl<O: Objective> Engine<O> {
    /// Builds an engine for `objective`.
    ///
    /// Samples the initial population uniformly within bounds unless one is
    /// given, evaluates every member, and takes the lowest value as the
    /// initial global best (the first one on ties).
    pub fn new(objective: O, config: &EngineConfig) -> std::result::Result<Self, ValidationError> {
        let layout = config.layout()?;
        Ok(Self::assemble(objective, config, layout))
    }

    fn assemble(objective: O, config: &EngineConfig, layout: Layout) -> Self {
        let mut rng = rng_from_seed(config.seed);
        let Layout {
            dimensions,
            population_size,
            bounds,
        } = layout;

        let positions: Vec<Vec<f64>> = match &config.population {
            Some(population) => population.clone(),
            None => (0..population_size)
                .map(|_| sample_position(&bounds, &mut rng))
                .collect(),
        };

        let population = evaluate_all(&objective, positions);
        let best = population
            .iter()
            .skip(1)
            .fold(&population[0], |best, m| if m.value < best.value { m } else { best })
            .clone();

        log::debug!(
            "engine ready: {} members, {} dimensions, {} iterations, seeded={}, best={}",
            population_size,
            dimensions,
            config.iterations,
            config.seed.is_some(),
            best.value
        );

        Self {
            objective,
            iterations: config.iterations,
            bounds,
            population,
            best,
            rng,
        }
    }

    /// Evaluates the objective at `x`, mapping NaN to `+inf`.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        normalize(self.objective.evaluate(x))
    }

    /// Offers a candidate for the global best. Returns `true` if it
    /// strictly improved it.
    pub fn offer(&mut self, position: &[f64], value: f64) -> bool {
        if value < self.best.value {
            self.best.value = value;
            self.best.position.clear();
            self.best.position.extend_from_slice(position);
            true
        } else {
            false
        }
    }

    /// Offers population member `index` for the global best.
    pub fn offer_member(&mut self, index: usize) -> bool {
        let Member { position, value } = &self.population[index];
        if *value < self.best.value {
            self.best = Member::new(position.clone(), *value);
            true
        } else {
            false
        }
    }

    /// Rescans the whole population for the global best.
    pub fn refresh_best(&mut self) -> bool {
        let mut improved = false;
        for i in 0..self.population.len() {
            improved |= self.offer_member(i);
        }
        improved
    }

    /// Draws a position uniformly within bounds.
    pub fn random_position(&mut self) -> Vec<f64> {
        sample_position(&self.bounds, &mut self.rng)
    }

    /// Clamps `value` into the bounds of dimension `dim`.
    pub fn clamp(&self, dim: usize, value: f64) -> f64 {
        self.bounds[dim].clamp(value)
    }

    /// Replaces member `index` and its cached value.
    pub fn replace(&mut self, index: usize, position: Vec<f64>, value: f64) {
        self.population[index] = Member::new(position, value);
    }

    /// Snapshot of the current state tagged with `iteration`.
    pub fn snapshot(&self, iteration: usize) -> Snapshot {
        Snapshot {
            positions: self.positions(),
            best_position: self.best.position.clone(),
            best_value: self.best.value,
            iteration,
        }
    }
}

impl<O> Engine<O> {
    /// The objective being minimized.
    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// Iteration budget.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Problem dimensionality.
    pub fn dimensions(&self) -> usize {
        self.bounds.len()
    }

    /// Fixed population size.
    pub fn population_size(&self) -> usize {
        self.population.len()
    }

    /// Per-dimension bounds.
    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    /// Current population.
    pub fn population(&self) -> &[Member] {
        &self.population
    }

    /// Copy of every member's position.
    pub fn positions(&self) -> Vec<Vec<f64>> {
        self.population.iter().map(|m| m.position.clone()).collect()
    }

    /// Global best member.
    pub fn best(&self) -> &Member {
        &self.best
    }

    pub fn best_value(&self) -> f64 {
        self.best.value
    }

    pub fn best_position(&self) -> &[f64] {
        &self.best.position
    }

    /// Widest range over all dimensions.
    pub fn max_range(&self) -> f64 {
        self.bounds.iter().map(Bound::range).fold(0.0, f64::max)
    }
}

/// Draws one position uniformly within `bounds`.
fn sample_position<R: Rng>(bounds: &[Bound], rng: &mut R) -> Vec<f64> {
    bounds
        .iter()
        .map(|b| b.min + rng.random::<f64>() * b.range())
        .collect()
}

/// Euclidean distance between two positions.
pub(crate) fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<O: Objective>(objective: &O, positions: Vec<Vec<f64>>) -> Vec<Member> {
    positions
        .into_iter()
        .map(|p| {
            let value = normalize(objective.evaluate(&p));
            Member::new(p, value)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_all<O: Objective>(objective: &O, positions: Vec<Vec<f64>>) -> Vec<Member> {
    positions
        .into_par_iter()
        .map(|p| {
            let value = normalize(objective.evaluate(&p));
            Member::new(p, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwarmError;

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    fn four_points() -> Vec<Vec<f64>> {
        vec![
            vec![3.0, 4.0],
            vec![-1.0, 1.0],
            vec![1.0, -1.0],
            vec![0.5, 2.0],
        ]
    }

    #[test]
    fn test_initial_best_is_minimum_first_on_ties() {
        let config = EngineConfig::default()
            .with_bounds(vec![Bound::new(-5.0, 5.0); 2])
            .with_population(four_points());
        let engine = Engine::new(sphere, &config).unwrap();

        assert_eq!(engine.best_value(), 2.0);
        assert_eq!(engine.best_position(), &[-1.0, 1.0]);
        assert_eq!(engine.population_size(), 4);
        assert_eq!(engine.dimensions(), 2);
    }

    #[test]
    fn test_sampled_population_within_bounds() {
        let bounds = vec![Bound::new(-1.0, 1.0), Bound::new(10.0, 20.0), Bound::new(0.0, 0.0)];
        let config = EngineConfig::default()
            .with_bounds(bounds.clone())
            .with_population_size(50)
            .with_seed(3);
        let engine = Engine::new(sphere, &config).unwrap();

        assert_eq!(engine.population_size(), 50);
        for m in engine.population() {
            for (v, b) in m.position.iter().zip(&bounds) {
                assert!(b.contains(*v));
            }
            assert_eq!(m.value, sphere(&m.position));
        }
    }

    #[test]
    fn test_default_bounds() {
        let config = EngineConfig::default()
            .with_population_size(5)
            .with_dimensions(3)
            .with_seed(1);
        let engine = Engine::new(sphere, &config).unwrap();
        assert_eq!(engine.bounds(), &[Bound::DEFAULT; 3]);
        assert_eq!(engine.max_range(), 200.0);
    }

    #[test]
    fn test_seeded_population_is_reproducible() {
        let config = EngineConfig::default()
            .with_population_size(8)
            .with_dimensions(2)
            .with_seed(99);
        let a = Engine::new(sphere, &config).unwrap();
        let b = Engine::new(sphere, &config).unwrap();
        assert_eq!(a.population(), b.population());
    }

    #[test]
    fn test_nan_values_are_infinite() {
        let config = EngineConfig::default()
            .with_population(vec![vec![-1.0], vec![4.0]]);
        let engine = Engine::new(|x: &[f64]| x[0].sqrt(), &config).unwrap();
        assert_eq!(engine.population()[0].value, f64::INFINITY);
        assert_eq!(engine.best_value(), 2.0);
        assert_eq!(engine.evaluate(&[-9.0]), f64::INFINITY);
    }

    #[test]
    fn test_offer_copies_and_is_strict() {
        let config = EngineConfig::default().with_population(four_points());
        let mut engine = Engine::new(sphere, &config).unwrap();

        assert!(!engine.offer(&[9.0, 9.0], 2.0));
        assert!(engine.offer(&[0.0, 0.5], 0.25));
        assert_eq!(engine.best_position(), &[0.0, 0.5]);

        engine.replace(1, vec![0.0, 0.1], 0.01);
        assert!(engine.refresh_best());
        engine.population[1].position[0] = 4.0;
        assert_eq!(engine.best_position(), &[0.0, 0.1]);
    }

    #[test]
    fn test_validation_precedes_compilation() {
        let config = EngineConfig::default()
            .with_bounds(vec![Bound::new(-5.0, 5.0); 2])
            .with_population(vec![vec![0.0, 0.0, 0.0]]);
        let err = Engine::<Formula>::from_formula("this is (not a formula", &config).unwrap_err();
        assert!(err.is_validation());

        let config = EngineConfig::default()
            .with_bounds(vec![Bound::new(-5.0, 5.0); 2])
            .with_population_size(3);
        let err = Engine::<Formula>::from_formula("x +* y", &config).unwrap_err();
        assert!(matches!(err, SwarmError::Compile(_)));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(distance(&[1.0], &[1.0]), 0.0);
    }
}
