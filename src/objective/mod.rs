//! Objective functions.
//!
//! The engine depends on nothing but [`Objective`]: a pure mapping from a
//! coordinate vector to a scalar, lower being better. Any
//! `Fn(&[f64]) -> f64` qualifies; [`Formula`] compiles the textual
//! formulas sent by clients into one.
//!
//! # Examples
//!
//! ```
//! use u_swarm::objective::{Formula, Objective};
//!
//! let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//! assert_eq!(sphere.evaluate(&[1.0, 2.0]), 5.0);
//!
//! let formula = Formula::compile("x^2 + y^2").unwrap();
//! assert_eq!(formula.evaluate(&[1.0, 2.0]), 5.0);
//! ```

mod formula;

pub use formula::Formula;

/// A scalar function to minimize.
///
/// Implementations must be pure: the same input always yields the same
/// output. Strategies rely on this to cache member values.
pub trait Objective: Send + Sync {
    /// Evaluates the objective at `x`. Lower is better.
    fn evaluate(&self, x: &[f64]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: &[f64]) -> f64 {
        self(x)
    }
}

/// Maps a NaN result to `+inf` so it compares as infinitely bad.
pub fn normalize(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}
