//! AFSA update rule.
//!
//! Per iteration, each fish `i` looks for neighbors within the current
//! visual radius and picks one behavior:
//!
//! - **random move** when nobody is in sight;
//! - **search** (step toward a random neighbor) when the neighborhood is
//!   more crowded than `teta`;
//! - otherwise the swarm-or-search choice is drawn first, then overridden
//!   by **chase** (step toward the best neighbor) if that neighbor beats
//!   the fish, or by a fresh search if not.
//!
//! The candidate replaces the fish only if strictly better. After each
//! emitted iteration the best value history drives stagnation detection
//! and random jumps.

use super::config::AfsaConfig;
use crate::engine::{distance, Bound, Engine, Metaheuristic};
use crate::error::ValidationError;
use crate::objective::Objective;
use crate::random::symmetric;
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Artificial Fish-Swarm Algorithm.
#[derive(Debug, Clone)]
pub struct Afsa<O> {
    engine: Engine<O>,
    config: AfsaConfig,
    visual: f64,
    distances: Vec<Vec<f64>>,
    history: Vec<f64>,
    stagnation: usize,
    jumps: usize,
}

impl<O: Objective> Afsa<O> {
    /// Builds the school on `engine`.
    pub fn new(engine: Engine<O>, config: &AfsaConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let history = vec![engine.best_value()];
        Ok(Self {
            engine,
            config: config.clone(),
            visual: config.visual.initial,
            distances: Vec::new(),
            history,
            stagnation: 0,
            jumps: 0,
        })
    }

    /// Current visual fraction (before scaling by the widest range).
    pub fn visual(&self) -> f64 {
        self.visual
    }

    /// Current visual radius in coordinate units.
    pub fn radius(&self) -> f64 {
        self.visual * self.engine.max_range()
    }

    /// Global best value after every completed iteration, starting with
    /// the initial best.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Consecutive stagnant iterations.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Random jumps performed so far.
    pub fn jumps(&self) -> usize {
        self.jumps
    }

    /// Pairwise distances of the initial population.
    pub fn distances(&self) -> &[Vec<f64>] {
        &self.distances
    }

    /// Visual fraction for 1-based `iteration`.
    fn visual_at(&self, iteration: usize) -> f64 {
        let progress = (iteration - 1) as f64 / self.engine.iterations() as f64;
        self.config
            .visual
            .min
            .max(self.config.visual.initial * (1.0 - progress))
    }

    fn neighbors(&self, i: usize, radius: f64) -> Vec<usize> {
        self.distances[i]
            .iter()
            .enumerate()
            .filter(|&(j, &d)| j != i && d <= radius)
            .map(|(j, _)| j)
            .collect()
    }

    fn next_position(&mut self, i: usize, radius: f64) -> Vec<f64> {
        let neighbors = self.neighbors(i, radius);
        if neighbors.is_empty() {
            return self.random_move(i, radius);
        }

        let density = neighbors.len() as f64 / self.engine.population_size() as f64;
        if density > self.config.teta {
            return self.search(i, &neighbors);
        }

        // Drawn for its effect on the random stream; the chase-or-search
        // decision below always supersedes it.
        let center = self.mean_position(&neighbors);
        let _provisional = if self.engine.evaluate(&center) < self.engine.population[i].value {
            self.swarm(i, &center)
        } else {
            self.search(i, &neighbors)
        };

        let best = self.best_neighbor(&neighbors);
        if self.engine.population[best].value < self.engine.population[i].value {
            self.chase(i, best)
        } else {
            self.search(i, &neighbors)
        }
    }

    fn random_move(&mut self, i: usize, radius: f64) -> Vec<f64> {
        let Engine {
            population,
            bounds,
            rng,
            ..
        } = &mut self.engine;
        population[i]
            .position
            .iter()
            .zip(bounds.iter())
            .map(|(&x, b)| b.clamp(x + symmetric(rng) * radius.min(b.range())))
            .collect()
    }

    fn swarm(&mut self, i: usize, center: &[f64]) -> Vec<f64> {
        let Engine {
            population,
            bounds,
            rng,
            ..
        } = &mut self.engine;
        step_toward(&population[i].position, center, bounds, rng)
    }

    fn search(&mut self, i: usize, neighbors: &[usize]) -> Vec<f64> {
        let j = neighbors[self.engine.rng.random_range(0..neighbors.len())];
        self.chase(i, j)
    }

    fn chase(&mut self, i: usize, j: usize) -> Vec<f64> {
        let Engine {
            population,
            bounds,
            rng,
            ..
        } = &mut self.engine;
        step_toward(&population[i].position, &population[j].position, bounds, rng)
    }

    fn mean_position(&self, neighbors: &[usize]) -> Vec<f64> {
        let mut mean = vec![0.0; self.engine.dimensions()];
        for &j in neighbors {
            for (m, x) in mean.iter_mut().zip(&self.engine.population[j].position) {
                *m += x;
            }
        }
        let n = neighbors.len() as f64;
        mean.iter_mut().for_each(|m| *m /= n);
        mean
    }

    /// First neighbor with the lowest value.
    fn best_neighbor(&self, neighbors: &[usize]) -> usize {
        let population = &self.engine.population;
        neighbors
            .iter()
            .skip(1)
            .fold(neighbors[0], |best, &j| {
                if population[j].value < population[best].value {
                    j
                } else {
                    best
                }
            })
    }

    /// Large random displacement of fish `j` scaled by a random share of
    /// each dimension's range.
    fn jump(&mut self, j: usize) {
        let Engine {
            population,
            bounds,
            rng,
            ..
        } = &mut self.engine;
        let p = rng.random::<f64>();
        let position: Vec<f64> = population[j]
            .position
            .iter()
            .zip(bounds.iter())
            .map(|(&x, b)| b.clamp(x + symmetric(rng) * p * b.range()))
            .collect();

        let value = self.engine.evaluate(&position);
        self.engine.replace(j, position, value);
        self.engine.offer_member(j);
        self.jumps += 1;
        log::debug!(
            "AFSA: stagnant for {} iterations, fish {j} jumped (p={p:.3})",
            self.stagnation
        );
    }
}

/// Moves `from` a uniform random fraction of the way toward `target`,
/// clamped per dimension.
fn step_toward<R: Rng>(from: &[f64], target: &[f64], bounds: &[Bound], rng: &mut R) -> Vec<f64> {
    let r = rng.random::<f64>();
    from.iter()
        .zip(target)
        .zip(bounds)
        .map(|((&x, &t), b)| b.clamp(x + r * (t - x)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn distance_matrix(positions: &[Vec<f64>]) -> Vec<Vec<f64>> {
    positions
        .iter()
        .map(|a| positions.iter().map(|b| distance(a, b)).collect())
        .collect()
}

#[cfg(feature = "parallel")]
fn distance_matrix(positions: &[Vec<f64>]) -> Vec<Vec<f64>> {
    positions
        .par_iter()
        .map(|a| positions.iter().map(|b| distance(a, b)).collect())
        .collect()
}

impl<O: Objective> Metaheuristic for Afsa<O> {
    type Objective = O;

    fn name(&self) -> &'static str {
        "AFSA"
    }

    fn engine(&self) -> &Engine<O> {
        &self.engine
    }

    /// Builds the distance matrix once; it is not refreshed as fish move.
    fn prepare(&mut self) {
        self.distances = distance_matrix(&self.engine.positions());
    }

    fn iterate(&mut self, iteration: usize) {
        self.visual = self.visual_at(iteration);
        let radius = self.radius();

        for i in 0..self.engine.population_size() {
            let candidate = self.next_position(i, radius);
            let value = self.engine.evaluate(&candidate);

            if value < self.engine.best_value() {
                self.engine.offer(&candidate, value);
            }
            if value < self.engine.population[i].value {
                self.engine.replace(i, candidate, value);
            }
        }
    }

    fn after_emit(&mut self, iteration: usize) {
        let best = self.engine.best_value();
        let previous = self.history.last().copied().unwrap_or(best);
        self.history.push(best);

        if iteration > 1 && (best - previous).abs() < self.config.eta {
            self.stagnation += 1;
        } else {
            self.stagnation = 0;
        }

        // the last snapshot is final: no jump may move the best after it
        if self.stagnation > self.config.max_tries && iteration < self.engine.iterations() {
            let j = self.engine.rng.random_range(0..self.engine.population_size());
            self.jump(j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineConfig, Snapshot};

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    fn school<F>(f: F, engine: EngineConfig, config: AfsaConfig) -> Afsa<F>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync,
    {
        Afsa::new(Engine::new(f, &engine).unwrap(), &config).unwrap()
    }

    fn mean_value<O>(engine: &Engine<O>) -> f64 {
        let population = engine.population();
        population.iter().map(|m| m.value).sum::<f64>() / population.len() as f64
    }

    fn base(size: usize, iterations: usize) -> EngineConfig {
        EngineConfig::default()
            .with_bounds(vec![Bound::new(-5.0, 5.0); 2])
            .with_population_size(size)
            .with_iterations(iterations)
            .with_seed(42)
    }

    #[test]
    fn test_afsa_sphere_improves() {
        let config = AfsaConfig::default().with_visual(0.05, 0.5).with_teta(0.8);
        let mut afsa = school(sphere, base(30, 100), config);
        let initial_best = afsa.engine.best_value();
        let initial_mean = mean_value(&afsa.engine);

        let result = afsa.run();

        let final_mean = mean_value(&afsa.engine);
        assert!(result.best_value <= initial_best);
        assert!(
            final_mean < initial_mean,
            "population should improve: {initial_mean} -> {final_mean}"
        );
    }

    #[test]
    fn test_afsa_visual_schedule() {
        let config = AfsaConfig::default().with_visual(1.0, 8.0);
        let afsa = school(sphere, base(5, 10), config);
        assert_eq!(afsa.visual_at(1), 8.0);
        assert!((afsa.visual_at(6) - 4.0).abs() < 1e-12);
        assert_eq!(afsa.visual_at(10), 1.0);
    }

    #[test]
    fn test_afsa_distance_matrix_is_frozen() {
        let mut afsa = school(sphere, base(8, 5), AfsaConfig::default());
        afsa.prepare();
        let frozen = afsa.distances().to_vec();
        for t in 1..=5 {
            afsa.iterate(t);
        }
        assert_eq!(afsa.distances(), frozen.as_slice());
        for (i, row) in frozen.iter().enumerate() {
            assert_eq!(row[i], 0.0);
        }
    }

    #[test]
    fn test_afsa_isolated_fish_move_within_radius() {
        let population = vec![vec![-4.0, -4.0], vec![4.0, 4.0], vec![-4.0, 4.0], vec![4.0, -4.0]];
        let engine = EngineConfig::default()
            .with_bounds(vec![Bound::new(-5.0, 5.0); 2])
            .with_population(population.clone())
            .with_iterations(1)
            .with_seed(5);
        // radius 0.1 * 10 = 1: nobody is in sight
        let config = AfsaConfig::default().with_visual(0.1, 0.1);
        let mut afsa = school(sphere, engine, config);
        afsa.prepare();
        afsa.iterate(1);

        for (member, old) in afsa.engine.population().iter().zip(&population) {
            for (x, o) in member.position.iter().zip(old) {
                assert!((x - o).abs() <= 1.0 + 1e-12);
            }
        }
    }

    #[test]
    fn test_afsa_stagnation_jumps_every_iteration_once_exceeded() {
        let engine = base(6, 10).with_seed(9);
        let config = AfsaConfig::default().with_max_tries(2);
        let mut afsa = school(|_: &[f64]| 3.0, engine, config);
        let initial = afsa.engine.positions();

        let result = afsa.run();

        assert_eq!(result.iterations, 10);
        // iteration 1 resets, iterations 2..=10 are stagnant
        assert_eq!(afsa.stagnation(), 9);
        // counter exceeds 2 from iteration 4 on; none after the last snapshot
        assert_eq!(afsa.jumps(), 6);
        assert_eq!(afsa.history().len(), 11);
        assert_ne!(afsa.engine.positions(), initial);
    }

    #[test]
    fn test_afsa_result_matches_last_snapshot() {
        // every iteration after the first is stagnant and triggers a jump
        let config = AfsaConfig::default().with_eta(1e9).with_max_tries(0);
        for seed in 0..50 {
            let mut afsa = school(sphere, base(6, 3).with_seed(seed), config.clone());
            let mut snapshots: Vec<Snapshot> = Vec::new();
            let result = afsa.run_with_sink(&mut snapshots);

            let last = &snapshots[snapshots.len() - 1];
            assert_eq!(last.iteration, 3);
            assert_eq!(result.best_value, last.best_value, "seed {seed}");
            assert_eq!(result.best_position, last.best_position, "seed {seed}");
            assert_eq!(result.value_history.last(), Some(&result.best_value));
            assert_eq!(afsa.jumps(), 1, "seed {seed}");
        }
    }

    #[test]
    fn test_afsa_provisional_step_consumes_its_draw() {
        // fish 0 sees both others (density 2/3 <= teta 1); the neighbor
        // mean beats it, so the swarm step draws first, then chase draws
        let population = vec![vec![4.0, 0.0], vec![1.0, 0.0], vec![2.0, 0.0]];
        let engine = EngineConfig::default()
            .with_bounds(vec![Bound::new(-5.0, 5.0); 2])
            .with_population(population)
            .with_iterations(1)
            .with_seed(31);
        let mut afsa = school(sphere, engine, AfsaConfig::default());
        afsa.prepare();

        let mut rng = afsa.engine.rng.clone();
        let swarm_r = rng.random::<f64>();
        let chase_r = rng.random::<f64>();
        assert_ne!(swarm_r, chase_r);

        let radius = afsa.radius();
        let candidate = afsa.next_position(0, radius);

        // chase toward the best neighbor [1, 0] with the second draw
        assert_eq!(candidate, vec![4.0 + chase_r * (1.0 - 4.0), 0.0]);
        // both draws were taken from the run's stream
        assert_eq!(afsa.engine.rng.random::<u64>(), rng.random::<u64>());
    }

    #[test]
    fn test_afsa_crowded_school_searches() {
        let config = AfsaConfig::default().with_teta(0.0);
        let mut afsa = school(sphere, base(10, 20), config);
        let mut snapshots: Vec<Snapshot> = Vec::new();
        let result = afsa.run_with_sink(&mut snapshots);

        assert_eq!(snapshots.len(), 21);
        for window in result.value_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
        for snap in &snapshots {
            for p in &snap.positions {
                assert!(p.iter().all(|v| (-5.0..=5.0).contains(v)));
            }
        }
    }

    #[test]
    fn test_afsa_rejects_bad_config() {
        let engine = Engine::new(sphere, &base(4, 1)).unwrap();
        assert!(Afsa::new(engine, &AfsaConfig::default().with_eta(-1.0)).is_err());
    }
}
