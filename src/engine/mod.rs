//! Shared optimization engine.
//!
//! Every strategy composes one [`Engine`]: the population with cached
//! objective values, per-dimension bounds, the iteration budget, the
//! objective, the run's seeded random stream and the global best.
//! [`Metaheuristic`] is the single capability all strategies expose, and
//! its provided `run_with_sink` method implements the snapshot protocol.
//!
//! # Key Types
//!
//! - [`EngineConfig`]: base request (budget, bounds, population, seed)
//! - [`Engine`]: run state with validation, sampling, clamping, best tracking
//! - [`Snapshot`] / [`ProgressSink`]: per-iteration progress publication
//! - [`SwarmResult`]: final outcome

mod config;
mod protocol;
mod state;
mod types;

pub use config::EngineConfig;
pub use protocol::Metaheuristic;
pub use state::Engine;
pub use types::{Bound, Member, ProgressSink, Snapshot, SwarmResult};

pub(crate) use state::distance;
