//! Artificial Fish-Swarm Algorithm (AFSA).
//!
//! Fish move by local rules inside a shrinking visual radius: random
//! moves when alone, swarming toward the neighborhood center, chasing the
//! best neighbor, or searching toward a random one. A stagnating best
//! value triggers random jumps.
//!
//! # References
//!
//! - Li, Shao & Qian (2002), "An optimizing method based on autonomous
//!   animats: fish-swarm algorithm", Systems Engineering Theory & Practice
//! - Neshat, Sepidnam, Sargolzaei & Toosi (2014), "Artificial fish swarm
//!   algorithm: a survey of the state-of-the-art, hybridization,
//!   combinatorial and indicative applications"

mod config;
mod runner;

pub use config::{AfsaConfig, VisualRange};
pub use runner::Afsa;
