//! The run protocol shared by every strategy.

use std::ops::ControlFlow;

use super::state::Engine;
use super::types::{ProgressSink, Snapshot, SwarmResult};
use crate::objective::Objective;

/// A population-based metaheuristic built on one [`Engine`].
///
/// Implementors supply the per-iteration update rule; the provided
/// [`run_with_sink`](Metaheuristic::run_with_sink) drives the protocol:
///
/// 1. [`prepare`](Metaheuristic::prepare), then emit iteration 0.
/// 2. For `t = 1..=iterations`: [`iterate`](Metaheuristic::iterate),
///    emit iteration `t`, then [`after_emit`](Metaheuristic::after_emit).
///
/// As soon as the sink breaks, the run returns the best known at that
/// instant without doing any further work.
pub trait Metaheuristic {
    /// Objective type of the underlying engine.
    type Objective: Objective;

    /// Short algorithm name, e.g. `"ABC"`.
    fn name(&self) -> &'static str;

    /// The engine this strategy composes.
    fn engine(&self) -> &Engine<Self::Objective>;

    /// Called once before the iteration-0 snapshot.
    fn prepare(&mut self) {}

    /// Performs iteration `iteration` (1-based) across the population,
    /// leaving the global best refreshed.
    fn iterate(&mut self, iteration: usize);

    /// Called after iteration `iteration` was emitted and the sink asked
    /// to continue.
    fn after_emit(&mut self, _iteration: usize) {}

    /// Runs the full budget without an observer.
    fn run(&mut self) -> SwarmResult {
        let mut ignore = |_: Snapshot| ControlFlow::Continue(());
        self.run_with_sink(&mut ignore)
    }

    /// Runs the full budget, publishing a snapshot before the first
    /// iteration and after every iteration.
    fn run_with_sink(&mut self, sink: &mut dyn ProgressSink) -> SwarmResult {
        let total = self.engine().iterations();
        let mut value_history = Vec::with_capacity(total + 1);

        self.prepare();
        value_history.push(self.engine().best_value());
        if sink.emit(self.engine().snapshot(0)).is_break() {
            log::info!("{}: sink closed before the first iteration", self.name());
            return finish(self.engine(), 0, true, value_history);
        }

        for t in 1..=total {
            self.iterate(t);
            let best = self.engine().best_value();
            value_history.push(best);
            log::trace!("{}: iteration {}/{} best={}", self.name(), t, total, best);

            if sink.emit(self.engine().snapshot(t)).is_break() {
                log::info!("{}: sink closed after iteration {}, best={}", self.name(), t, best);
                return finish(self.engine(), t, true, value_history);
            }
            self.after_emit(t);
        }

        log::info!(
            "{}: finished {} iterations, best={}",
            self.name(),
            total,
            self.engine().best_value()
        );
        finish(self.engine(), total, false, value_history)
    }
}

fn finish<O>(
    engine: &Engine<O>,
    iterations: usize,
    cancelled: bool,
    value_history: Vec<f64>,
) -> SwarmResult {
    SwarmResult {
        best_position: engine.best_position().to_vec(),
        best_value: engine.best_value(),
        iterations,
        cancelled,
        value_history,
    }
}
