//! Firefly Algorithm (FA).
//!
//! Fireflies are attracted to brighter ones with a strength that decays
//! with distance, plus a small random step.
//!
//! # References
//!
//! - Yang (2009), "Firefly algorithms for multimodal optimization",
//!   Stochastic Algorithms: Foundations and Applications, LNCS 5792

mod config;
mod runner;

pub use config::FaConfig;
pub use runner::Firefly;
