//! Grey Wolf Optimizer (GWO).
//!
//! Wolves encircle the prey by averaging three moves, one guided by each
//! of the alpha, beta and delta leaders. The exploration coefficient `a`
//! shrinks to zero, turning encircling into attacking.
//!
//! # References
//!
//! - Mirjalili, Mirjalili & Lewis (2014), "Grey Wolf Optimizer",
//!   Advances in Engineering Software 69

mod config;
mod runner;

pub use config::GwoConfig;
pub use runner::{Gwo, Leader};
