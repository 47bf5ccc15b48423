//! Firefly update rule.

use super::config::FaConfig;
use crate::engine::{distance, Engine, Metaheuristic};
use crate::error::ValidationError;
use crate::objective::Objective;
use rand::Rng;

/// Firefly Algorithm.
///
/// Every firefly moves toward each strictly brighter (lower valued) one,
/// in population order. Moves are applied immediately, so a firefly with
/// several brighter peers is displaced several times per iteration, each
/// move starting from where the previous one left it.
#[derive(Debug, Clone)]
pub struct Firefly<O> {
    engine: Engine<O>,
    config: FaConfig,
}

impl<O: Objective> Firefly<O> {
    /// Builds the swarm on `engine`.
    pub fn new(engine: Engine<O>, config: &FaConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            engine,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &FaConfig {
        &self.config
    }

    /// Largest distance from firefly `i` to any other member.
    fn max_distance(&self, i: usize) -> f64 {
        let population = &self.engine.population;
        population
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, m)| distance(&population[i].position, &m.position))
            .fold(0.0, f64::max)
    }

    /// Moves firefly `i` toward firefly `j` with absorption `gamma`.
    fn attract(&mut self, i: usize, j: usize, gamma: f64) {
        let FaConfig { beta0, alpha, .. } = self.config;
        let Engine {
            population,
            bounds,
            rng,
            ..
        } = &mut self.engine;

        let xi = &population[i].position;
        let xj = &population[j].position;
        let r = distance(xi, xj);
        let beta = beta0 * (-gamma * r * r).exp();

        let position: Vec<f64> = xi
            .iter()
            .zip(xj)
            .zip(bounds.iter())
            .map(|((&a, &b), bound)| {
                let noise = alpha * (rng.random::<f64>() - 0.5);
                bound.clamp(a + beta * (b - a) + noise)
            })
            .collect();

        let value = self.engine.evaluate(&position);
        self.engine.replace(i, position, value);
    }
}

impl<O: Objective> Metaheuristic for Firefly<O> {
    type Objective = O;

    fn name(&self) -> &'static str {
        "FA"
    }

    fn engine(&self) -> &Engine<O> {
        &self.engine
    }

    fn iterate(&mut self, _iteration: usize) {
        let n = self.engine.population_size();
        for i in 0..n {
            let max_distance = self.max_distance(i);
            // coincident swarm: no scale to normalize by
            let gamma = if max_distance > 0.0 {
                self.config.gamma / max_distance
            } else {
                0.0
            };

            for j in 0..n {
                if j != i && self.engine.population[j].value < self.engine.population[i].value {
                    self.attract(i, j, gamma);
                }
            }
            self.engine.offer_member(i);
        }
    }
}
