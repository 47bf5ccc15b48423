//! Artificial Bee Colony (ABC).
//!
//! The population splits into foragers, which each exploit one food
//! source, and observers, which reinforce foragers chosen by roulette.
//! Foragers that stagnate for more than `limit` attempts turn into scouts
//! and restart at a random position.
//!
//! # References
//!
//! - Karaboga (2005), "An Idea Based on Honey Bee Swarm for Numerical
//!   Optimization", Technical Report TR06, Erciyes University
//! - Karaboga & Basturk (2007), "A powerful and efficient algorithm for
//!   numerical function optimization: artificial bee colony (ABC) algorithm"

mod config;
mod runner;

pub use config::AbcConfig;
pub use runner::Abc;
