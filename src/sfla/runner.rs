//! SFLA update rule.
//!
//! The population is cut into `subpopulations` contiguous blocks of
//! `population_size / subpopulations` members; leftover members belong to
//! no memeplex that iteration. Each memeplex repeatedly leaps its worst
//! frog:
//!
//! 1. toward the memeplex best;
//! 2. if that did not help, onward toward the global best;
//! 3. if that did not help either, to a uniformly random position.
//!
//! The global best is refreshed once all memeplexes are done, then the
//! whole population is shuffled so membership changes.

use std::ops::Range;

use super::config::SflaConfig;
use crate::engine::{Engine, Metaheuristic};
use crate::error::ValidationError;
use crate::objective::Objective;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffled Frog-Leaping Algorithm.
#[derive(Debug, Clone)]
pub struct Sfla<O> {
    engine: Engine<O>,
    subpopulations: usize,
    inner_iterations: usize,
}

impl<O: Objective> Sfla<O> {
    /// Builds the frog population on `engine`.
    pub fn new(engine: Engine<O>, config: &SflaConfig) -> Result<Self, ValidationError> {
        config.validate_for(engine.population_size())?;
        Ok(Self {
            engine,
            subpopulations: config.subpopulations,
            inner_iterations: config.inner_iterations,
        })
    }

    pub fn subpopulations(&self) -> usize {
        self.subpopulations
    }

    pub fn memeplex_size(&self) -> usize {
        self.engine.population_size() / self.subpopulations
    }

    /// Index range of memeplex `k`.
    pub fn memeplex(&self, k: usize) -> Range<usize> {
        let size = self.memeplex_size();
        k * size..(k + 1) * size
    }

    /// First best and first worst member of `range`.
    fn extremes(&self, range: Range<usize>) -> (usize, usize) {
        let population = &self.engine.population;
        let (mut best, mut worst) = (range.start, range.start);
        for j in range {
            if population[j].value < population[best].value {
                best = j;
            }
            if population[j].value > population[worst].value {
                worst = j;
            }
        }
        (best, worst)
    }

    /// Moves frog `i` in place a uniform random fraction toward `target`
    /// and returns its new value.
    fn leap(&mut self, i: usize, target: &[f64]) -> f64 {
        let r = self.engine.rng.random::<f64>();
        let Engine {
            population,
            bounds,
            ..
        } = &mut self.engine;
        for ((x, &t), bound) in population[i].position.iter_mut().zip(target).zip(bounds.iter()) {
            *x = bound.clamp(*x + r * (t - *x));
        }
        let value = self.engine.evaluate(&self.engine.population[i].position);
        self.engine.population[i].value = value;
        value
    }

    fn local_search(&mut self, k: usize) {
        for _ in 0..self.inner_iterations {
            let (best, worst) = self.extremes(self.memeplex(k));
            let before = self.engine.population[worst].value;

            let target = self.engine.population[best].position.clone();
            if self.leap(worst, &target) < before {
                continue;
            }
            let target = self.engine.best_position().to_vec();
            if self.leap(worst, &target) < before {
                continue;
            }

            let position = self.engine.random_position();
            let value = self.engine.evaluate(&position);
            self.engine.replace(worst, position, value);
            log::debug!("SFLA: memeplex {k} replaced frog {worst} at random");
        }
    }
}

impl<O: Objective> Metaheuristic for Sfla<O> {
    type Objective = O;

    fn name(&self) -> &'static str {
        "SFLA"
    }

    fn engine(&self) -> &Engine<O> {
        &self.engine
    }

    fn iterate(&mut self, _iteration: usize) {
        for k in 0..self.subpopulations {
            self.local_search(k);
        }
        self.engine.refresh_best();

        let Engine { population, rng, .. } = &mut self.engine;
        population.shuffle(rng);
    }
}
