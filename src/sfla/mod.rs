//! Shuffled Frog-Leaping Algorithm (SFLA).
//!
//! Memeplexes of frogs run a local search on their worst member, and the
//! whole population is shuffled between iterations to mix information.
//!
//! # References
//!
//! - Eusuff & Lansey (2003), "Optimization of water distribution network
//!   design using the shuffled frog leaping algorithm", Journal of Water
//!   Resources Planning and Management 129(3)

mod config;
mod runner;

pub use config::SflaConfig;
pub use runner::Sfla;
