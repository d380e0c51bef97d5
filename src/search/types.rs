//! Caller-facing traits and records for the K-best search.
//!
//! The caller supplies an [`Objective`] and, optionally, a
//! [`StatusReporter`]. The search owns everything else.

use crate::population::{PopulationEntry, TrialId};
use crate::space::{Candidate, CandidateKey, SearchSpace};

/// The function being maximized.
///
/// Receives a complete assignment and returns its performance; higher is
/// better. Evaluation may be arbitrarily expensive. The search neither
/// times out nor catches panics from it: a panic aborts the whole search.
/// Callers that want to tolerate failing evaluations should map them to a
/// low score inside the objective.
///
/// Any `FnMut(&Candidate<'_>) -> f64` closure is an objective:
///
/// ```
/// use u_kbest::search::Objective;
/// use u_kbest::space::{Candidate, SearchSpace, SpaceSpec};
///
/// let mut objective = |c: &Candidate<'_>| if c.get("mode") == Some("fast") { 1.0 } else { 0.0 };
///
/// let space = SearchSpace::uniform(SpaceSpec::new().with_choice("mode", ["slow", "fast"])).unwrap();
/// let key = u_kbest::space::CandidateKey::new(vec![1]);
/// assert_eq!(objective.evaluate(&space.candidate(&key)), 1.0);
/// ```
pub trait Objective {
    /// Evaluates a candidate. Higher is better.
    fn evaluate(&mut self, candidate: &Candidate<'_>) -> f64;
}

impl<F> Objective for F
where
    F: FnMut(&Candidate<'_>) -> f64,
{
    fn evaluate(&mut self, candidate: &Candidate<'_>) -> f64 {
        self(candidate)
    }
}

/// The single best candidate evaluated so far.
///
/// Independent of population membership and of the admission threshold.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestRecord {
    pub key: CandidateKey,
    pub performance: f64,
    pub trial: TrialId,
}

impl BestRecord {
    /// Replaces `best` if `performance` strictly improves on it.
    ///
    /// The first non-NaN evaluation always becomes the best. Ties keep the
    /// earlier record.
    pub(crate) fn offer(
        best: &mut Option<BestRecord>,
        key: &CandidateKey,
        performance: f64,
        trial: TrialId,
    ) -> bool {
        let improves = match best {
            Some(current) => performance > current.performance,
            None => !performance.is_nan(),
        };
        if improves {
            *best = Some(BestRecord {
                key: key.clone(),
                performance,
                trial,
            });
        }
        improves
    }
}

/// Temperature state reported during the adaptive phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingSnapshot {
    pub temperature: f64,
    pub unsuccessful_trials: usize,
}

/// Snapshot handed to a [`StatusReporter`] after each trial.
#[derive(Debug, Clone, Copy)]
pub struct TrialStatus<'a> {
    pub trial: TrialId,
    pub candidate: Candidate<'a>,
    pub performance: f64,
    pub best: Option<&'a BestRecord>,
    /// Current population, ascending by performance.
    pub population: &'a [PopulationEntry],
    /// Current sampling distribution; resolves population keys.
    pub space: &'a SearchSpace,
    /// `None` during seeding.
    pub annealing: Option<AnnealingSnapshot>,
}

/// Observer invoked after every trial.
///
/// Purely observational: nothing a reporter does can change the course of
/// the search. `()` is the no-op reporter.
pub trait StatusReporter {
    fn on_trial(&mut self, status: &TrialStatus<'_>);
}

impl StatusReporter for () {
    fn on_trial(&mut self, _status: &TrialStatus<'_>) {}
}
