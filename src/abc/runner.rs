//! ABC update rule.
//!
//! Each iteration runs three phases over the foragers (the first
//! `forager_size` members):
//!
//! 1. **Forager**: every forager tries a one-dimension perturbation
//!    relative to a random other forager.
//! 2. **Observer**: one attempt per observer, on a forager picked by
//!    roulette over the raw objective values of the foragers.
//! 3. **Scout**: foragers whose trial counter exceeds `limit` are replaced
//!    by a uniformly random position.

use super::config::AbcConfig;
use crate::engine::{Engine, Metaheuristic};
use crate::error::ValidationError;
use crate::objective::Objective;
use crate::random::symmetric;
use rand::Rng;

/// Artificial Bee Colony.
#[derive(Debug, Clone)]
pub struct Abc<O> {
    engine: Engine<O>,
    limit: usize,
    forager_size: usize,
    trials: Vec<usize>,
}

impl<O: Objective> Abc<O> {
    /// Builds the colony on `engine`.
    pub fn new(engine: Engine<O>, config: &AbcConfig) -> Result<Self, ValidationError> {
        let (limit, forager_size) =
            config.resolve(engine.population_size(), engine.dimensions())?;
        Ok(Self {
            engine,
            limit,
            forager_size,
            trials: vec![0; forager_size],
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn forager_size(&self) -> usize {
        self.forager_size
    }

    pub fn observer_size(&self) -> usize {
        self.engine.population_size() - self.forager_size
    }

    /// Stagnation counter of every forager.
    pub fn trials(&self) -> &[usize] {
        &self.trials
    }

    fn forager_phase(&mut self) {
        for i in 0..self.forager_size {
            let k = self.partner(i);
            self.try_improve(i, k);
        }
    }

    fn observer_phase(&mut self) {
        for _ in 0..self.observer_size() {
            let j = self.select_forager();
            let k = self.partner(j);
            self.try_improve(j, k);
        }
    }

    fn scout_phase(&mut self) {
        let mut scouted = 0usize;
        for i in 0..self.forager_size {
            if self.trials[i] > self.limit {
                let position = self.engine.random_position();
                let value = self.engine.evaluate(&position);
                self.engine.replace(i, position, value);
                self.trials[i] = 0;
                self.engine.offer_member(i);
                scouted += 1;
            }
        }
        if scouted > 0 {
            log::debug!("ABC: {scouted} forager(s) abandoned and scouted");
        }
    }

    /// Uniformly random forager other than `j`.
    fn partner(&mut self, j: usize) -> usize {
        let k = self.engine.rng.random_range(0..self.forager_size - 1);
        if k >= j {
            k + 1
        } else {
            k
        }
    }

    /// Perturbs forager `j` against forager `k` in one random dimension and
    /// keeps the result only if strictly better.
    fn try_improve(&mut self, j: usize, k: usize) {
        let dims = self.engine.dimensions();
        let s = self.engine.rng.random_range(0..dims);
        let phi = symmetric(&mut self.engine.rng);

        let current = &self.engine.population[j];
        let xs = current.position[s];
        let mut candidate = current.position.clone();
        candidate[s] = self
            .engine
            .clamp(s, xs + phi * (xs - self.engine.population[k].position[s]));

        let value = self.engine.evaluate(&candidate);
        if value < self.engine.population[j].value {
            self.engine.replace(j, candidate, value);
            self.trials[j] = 0;
            self.engine.offer_member(j);
        } else {
            self.trials[j] += 1;
        }
    }

    /// Roulette selection weighted by raw forager values.
    ///
    /// The weights are not inverted, so larger values are more likely
    /// to be picked.
    fn select_forager(&mut self) -> usize {
        let foragers = &self.engine.population[..self.forager_size];
        let total: f64 = foragers.iter().map(|m| m.value).sum();
        let threshold = self.engine.rng.random::<f64>() * total;

        let mut cumulative = 0.0;
        for (i, m) in foragers.iter().enumerate() {
            cumulative += m.value;
            if cumulative >= threshold {
                return i;
            }
        }
        0
    }
}

impl<O: Objective> Metaheuristic for Abc<O> {
    type Objective = O;

    fn name(&self) -> &'static str {
        "ABC"
    }

    fn engine(&self) -> &Engine<O> {
        &self.engine
    }

    fn iterate(&mut self, _iteration: usize) {
        self.forager_phase();
        self.observer_phase();
        self.scout_phase();
    }
}
