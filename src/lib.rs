//! Population-based swarm metaheuristics for box-bounded real vectors.
//!
//! Provides five stochastic optimizers that share one engine:
//!
//! - **Artificial Bee Colony (ABC)**: foragers exploit food sources,
//!   observers reinforce them by roulette, exhausted sources are scouted.
//! - **Artificial Fish-Swarm (AFSA)**: swarm, chase, search and random
//!   moves inside a shrinking visual radius, with jumps on stagnation.
//! - **Firefly Algorithm (FA)**: distance-attenuated attraction toward
//!   brighter fireflies.
//! - **Grey Wolf Optimizer (GWO)**: encircling guided by an alpha, beta and
//!   delta hierarchy.
//! - **Shuffled Frog-Leaping (SFLA)**: memeplex local search on the worst
//!   frog with a population shuffle between iterations.
//!
//! # Architecture
//!
//! Every strategy composes one [`engine::Engine`] holding the population,
//! bounds, objective, seeded random stream and global best, and implements
//! [`engine::Metaheuristic`]. Runs publish a [`engine::Snapshot`] before the
//! first iteration and after each one; a [`engine::ProgressSink`] can stop
//! the run at any iteration boundary. Objectives are anything implementing
//! [`objective::Objective`], including compiled [`objective::Formula`]s.
//!
//! # Examples
//!
//! ```
//! use u_swarm::engine::{Engine, EngineConfig, Metaheuristic};
//! use u_swarm::gwo::{Gwo, GwoConfig};
//!
//! let config = EngineConfig::default()
//!     .with_uniform_bounds(-5.0, 5.0, 3)
//!     .with_population_size(20)
//!     .with_iterations(50)
//!     .with_seed(42);
//! let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//!
//! let engine = Engine::new(sphere, &config).unwrap();
//! let mut gwo = Gwo::new(engine, &GwoConfig::default()).unwrap();
//! let result = gwo.run();
//! assert!(result.best_value < 1.0);
//! ```

pub mod abc;
pub mod afsa;
pub mod engine;
pub mod error;
pub mod fa;
pub mod gwo;
pub mod objective;
pub mod random;
pub mod request;
pub mod sfla;

pub use error::{CompileError, Result, SwarmError, ValidationError};
