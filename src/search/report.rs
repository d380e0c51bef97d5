//! Status reporting through `tracing`.

use super::types::{StatusReporter, TrialStatus};
use tracing::field::display;

/// Reports every trial as a structured `tracing` event.
///
/// Each trial is logged at `DEBUG` with the candidate, its performance,
/// the best record and, in the adaptive phase, the temperature and the
/// unsuccessful-trial count. At `TRACE` the full population follows, best
/// first.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl StatusReporter for TracingReporter {
    fn on_trial(&mut self, status: &TrialStatus<'_>) {
        let best_trial = status.best.map(|b| display(b.trial));
        let best_performance = status.best.map(|b| b.performance);
        let best = status.best.map(|b| display(status.space.candidate(&b.key)));

        match status.annealing {
            Some(annealing) => tracing::debug!(
                trial = %status.trial,
                candidate = %status.candidate,
                performance = status.performance,
                best_trial,
                best,
                best_performance,
                population = status.population.len(),
                temperature = annealing.temperature,
                unsuccessful_trials = annealing.unsuccessful_trials,
                "adaptive trial"
            ),
            None => tracing::debug!(
                trial = %status.trial,
                candidate = %status.candidate,
                performance = status.performance,
                best_trial,
                best,
                best_performance,
                population = status.population.len(),
                "seeding trial"
            ),
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            for (rank, entry) in status.population.iter().rev().enumerate() {
                tracing::trace!(
                    rank = rank + 1,
                    trial = %entry.trial,
                    candidate = %status.space.candidate(&entry.key),
                    performance = entry.performance,
                    "population member"
                );
            }
        }
    }
}
