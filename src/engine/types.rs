//! Shared data types: bounds, members, snapshots, sinks and results.

use std::ops::ControlFlow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Admissible `[min, max]` range of one dimension.
///
/// Serialized as a two-element array `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 2]", into = "[f64; 2]"))]
pub struct Bound {
    /// Lower limit (inclusive).
    pub min: f64,
    /// Upper limit (inclusive).
    pub max: f64,
}

impl Bound {
    /// Range used when a request carries no bounds.
    pub const DEFAULT: Bound = Bound {
        min: -100.0,
        max: 100.0,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Clamps `value` into the range. NaN is pushed to `max`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.max).max(self.min)
    }

    /// Returns `true` if `value` lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl From<[f64; 2]> for Bound {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<(f64, f64)> for Bound {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<Bound> for [f64; 2] {
    fn from(b: Bound) -> Self {
        [b.min, b.max]
    }
}

/// One population member together with its cached objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Coordinates, one per dimension.
    pub position: Vec<f64>,
    /// Objective value at `position`.
    pub value: f64,
}

impl Member {
    pub fn new(position: Vec<f64>, value: f64) -> Self {
        Self { position, value }
    }
}

/// Search state published after every iteration.
///
/// Iteration 0 is the initial population, before any update.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Snapshot {
    /// Population positions at the end of the iteration.
    #[cfg_attr(feature = "serde", serde(rename = "stepPositions"))]
    pub positions: Vec<Vec<f64>>,
    /// Best position found so far.
    pub best_position: Vec<f64>,
    /// Best value found so far.
    pub best_value: f64,
    /// Iteration index, starting at 0.
    pub iteration: usize,
}

/// Receives snapshots while a run progresses.
///
/// Returning [`ControlFlow::Break`] means the sink can accept no more
/// snapshots. The run then stops before doing any further work and
/// returns the best solution known at that moment.
pub trait ProgressSink {
    /// Publishes one snapshot.
    fn emit(&mut self, snapshot: Snapshot) -> ControlFlow<()>;
}

impl<F> ProgressSink for F
where
    F: FnMut(Snapshot) -> ControlFlow<()>,
{
    fn emit(&mut self, snapshot: Snapshot) -> ControlFlow<()> {
        self(snapshot)
    }
}

/// Records every snapshot and never stops the run.
impl ProgressSink for Vec<Snapshot> {
    fn emit(&mut self, snapshot: Snapshot) -> ControlFlow<()> {
        self.push(snapshot);
        ControlFlow::Continue(())
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmResult {
    /// Best position found.
    pub best_position: Vec<f64>,

    /// Objective value at `best_position`.
    pub best_value: f64,

    /// Number of iterations fully executed.
    pub iterations: usize,

    /// Whether the sink stopped the run early.
    pub cancelled: bool,

    /// Best value of every emitted snapshot, in order.
    pub value_history: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_clamp() {
        let b = Bound::new(-1.0, 2.0);
        assert_eq!(b.clamp(5.0), 2.0);
        assert_eq!(b.clamp(-5.0), -1.0);
        assert_eq!(b.clamp(0.5), 0.5);
        assert_eq!(b.clamp(f64::INFINITY), 2.0);
        assert_eq!(b.clamp(f64::NEG_INFINITY), -1.0);
        assert!(b.contains(b.clamp(f64::NAN)));
    }

    #[test]
    fn test_bound_validity() {
        assert!(Bound::new(0.0, 0.0).is_valid());
        assert!(!Bound::new(1.0, 0.0).is_valid());
        assert!(!Bound::new(f64::NAN, 0.0).is_valid());
        assert!(!Bound::new(0.0, f64::INFINITY).is_valid());
        assert_eq!(Bound::DEFAULT.range(), 200.0);
    }

    #[test]
    fn test_vec_sink_records() {
        let mut sink: Vec<Snapshot> = Vec::new();
        let snap = Snapshot {
            positions: vec![vec![0.0]],
            best_position: vec![0.0],
            best_value: 0.0,
            iteration: 0,
        };
        assert!(sink.emit(snap.clone()).is_continue());
        assert_eq!(sink, vec![snap]);
    }

    #[test]
    fn test_closure_sink_can_stop() {
        let mut count = 0;
        let mut sink = |_: Snapshot| {
            count += 1;
            ControlFlow::Break(())
        };
        let snap = Snapshot {
            positions: Vec::new(),
            best_position: Vec::new(),
            best_value: 0.0,
            iteration: 3,
        };
        assert!(sink.emit(snap).is_break());
        assert_eq!(count, 1);
    }
}
