//! GWO update rule.
//!
//! The leaders are ranked from scratch after every iteration. Ranking
//! scans the population in order, and a wolf that beats either the alpha
//! or the beta shifts the ranks down and becomes the new alpha. A wolf
//! that only beats the beta can therefore lead the pack while the old
//! alpha, with a better value, sits at beta.

use super::config::GwoConfig;
use crate::engine::{Engine, Member, Metaheuristic};
use crate::error::ValidationError;
use crate::objective::Objective;
use rand::Rng;

/// One rank of the wolf hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Leader {
    /// `None` while no wolf holds the rank.
    pub position: Option<Vec<f64>>,
    /// `+inf` while no wolf holds the rank.
    pub value: f64,
}

impl Leader {
    pub const UNSET: Leader = Leader {
        position: None,
        value: f64::INFINITY,
    };

    pub fn is_set(&self) -> bool {
        self.position.is_some()
    }

    fn from_member(member: &Member) -> Self {
        Self {
            position: Some(member.position.clone()),
            value: member.value,
        }
    }
}

/// Grey Wolf Optimizer.
#[derive(Debug, Clone)]
pub struct Gwo<O> {
    engine: Engine<O>,
    initial_a: f64,
    c: f64,
    alpha: Leader,
    beta: Leader,
    delta: Leader,
}

impl<O: Objective> Gwo<O> {
    /// Builds the pack on `engine`.
    pub fn new(engine: Engine<O>, config: &GwoConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            engine,
            initial_a: config.initial_a,
            c: config.initial_c,
            alpha: Leader::UNSET,
            beta: Leader::UNSET,
            delta: Leader::UNSET,
        })
    }

    pub fn alpha(&self) -> &Leader {
        &self.alpha
    }

    pub fn beta(&self) -> &Leader {
        &self.beta
    }

    pub fn delta(&self) -> &Leader {
        &self.delta
    }

    /// Exploration coefficient for 1-based `iteration`.
    pub fn a_at(&self, iteration: usize) -> f64 {
        let t = (iteration - 1) as f64;
        self.initial_a - self.initial_a * t / self.engine.iterations() as f64
    }

    /// Re-ranks the leaders over the current population and refreshes the
    /// global best.
    fn rank(&mut self) {
        let mut alpha = Leader::UNSET;
        let mut beta = Leader::UNSET;
        let mut delta = Leader::UNSET;

        for wolf in &self.engine.population {
            if wolf.value < alpha.value || wolf.value < beta.value {
                delta = std::mem::replace(&mut beta, alpha);
                alpha = Leader::from_member(wolf);
            } else if wolf.value < delta.value {
                delta = Leader::from_member(wolf);
            }
        }

        self.alpha = alpha;
        self.beta = beta;
        self.delta = delta;
        self.engine.refresh_best();
    }

    /// Prey positions for alpha, beta and delta. A rank nobody holds
    /// borrows the position of the rank above it; the alpha falls back to
    /// the global best.
    fn preys(&self) -> [Vec<f64>; 3] {
        let alpha = self
            .alpha
            .position
            .clone()
            .unwrap_or_else(|| self.engine.best_position().to_vec());
        let beta = self.beta.position.clone().unwrap_or_else(|| alpha.clone());
        let delta = self.delta.position.clone().unwrap_or_else(|| beta.clone());
        [alpha, beta, delta]
    }

    fn hunt<R: Rng>(rng: &mut R, prey: f64, wolf: f64, a: f64, c: f64) -> f64 {
        let r1 = rng.random::<f64>();
        let r2 = rng.random::<f64>();
        let big_a = a * (2.0 * r1 - 1.0);
        let big_c = c * r2;
        let d = (big_c * prey - wolf).abs();
        prey - big_a * d
    }
}

impl<O: Objective> Metaheuristic for Gwo<O> {
    type Objective = O;

    fn name(&self) -> &'static str {
        "GWO"
    }

    fn engine(&self) -> &Engine<O> {
        &self.engine
    }

    fn prepare(&mut self) {
        self.rank();
    }

    fn iterate(&mut self, iteration: usize) {
        let a = self.a_at(iteration);
        let c = self.c;
        let preys = self.preys();

        for i in 0..self.engine.population_size() {
            let Engine {
                population,
                bounds,
                rng,
                ..
            } = &mut self.engine;

            let candidate: Vec<f64> = population[i]
                .position
                .iter()
                .zip(bounds.iter())
                .enumerate()
                .map(|(j, (&w, bound))| {
                    let sum: f64 = preys.iter().map(|p| Self::hunt(rng, p[j], w, a, c)).sum();
                    bound.clamp(sum / 3.0)
                })
                .collect();

            let value = self.engine.evaluate(&candidate);
            if value < self.engine.population[i].value {
                self.engine.replace(i, candidate, value);
            }
        }

        self.rank();
    }
}
