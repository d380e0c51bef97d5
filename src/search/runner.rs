//! K-best search execution loop.

use super::config::KBestConfig;
use super::report::TracingReporter;
use super::types::{AnnealingSnapshot, BestRecord, Objective, StatusReporter, TrialStatus};
use crate::annealing::{AnnealingSchedule, AnnealingStep};
use crate::error::KBestError;
use crate::generator::{CandidateGenerator, CandidateHistory};
use crate::population::{Population, PopulationEntry, TrialId};
use crate::space::{Candidate, CandidateKey, SearchSpace, SpaceSpec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// The generator found no unexplored candidate within its retry bound.
    Exhausted,
    /// `population_size` unsuccessful trials at the floor temperature.
    Converged,
    /// Cancelled through the cancellation flag.
    Cancelled,
    /// `max_trials` evaluations were spent.
    TrialLimit,
}

/// Result of a K-best search.
#[derive(Debug, Clone)]
pub struct KBestResult {
    /// Best candidate ever evaluated. `None` only if nothing (non-NaN) was
    /// evaluated.
    pub best: Option<BestRecord>,

    /// Final population, ascending by performance. Holds fewer than
    /// `population_size` entries if seeding never filled it.
    pub population: Vec<PopulationEntry>,

    /// Final sampling distribution.
    pub space: SearchSpace,

    /// Every candidate generated, in generation order.
    pub history: CandidateHistory,

    pub termination: Termination,

    /// Number of seeding trials evaluated.
    pub seeding_trials: usize,

    /// Number of adaptive trials evaluated.
    pub adaptive_trials: usize,

    /// Temperature when the search stopped. `None` if the adaptive phase
    /// was never entered.
    pub final_temperature: Option<f64>,

    /// Best performance after each trial, from the first non-NaN evaluation.
    pub best_history: Vec<f64>,
}

impl KBestResult {
    /// Total number of objective evaluations.
    pub fn trials(&self) -> usize {
        self.seeding_trials + self.adaptive_trials
    }

    /// Assignment view of the best candidate.
    pub fn best_candidate(&self) -> Option<Candidate<'_>> {
        self.best.as_ref().map(|b| self.space.candidate(&b.key))
    }

    /// Assignment view of any key generated during this search.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not fit the searched space. Every key in
    /// `history` and `population` does.
    pub fn candidate<'a>(&'a self, key: &'a CandidateKey) -> Candidate<'a> {
        self.space.candidate(key)
    }
}

/// Executes the K-best search.
///
/// Seeding draws uniformly until `population_size` candidates meeting the
/// performance threshold have been found. The adaptive phase then draws
/// from a distribution derived from the population, replacing its worst
/// member whenever a candidate beats it, and cools whenever
/// `population_size` trials in a row fail to do so.
pub struct KBestRunner;

impl KBestRunner {
    /// Runs the search, reporting each trial through [`TracingReporter`].
    pub fn run<O>(
        spec: SpaceSpec,
        objective: &mut O,
        config: &KBestConfig,
    ) -> Result<KBestResult, KBestError>
    where
        O: Objective + ?Sized,
    {
        Self::run_with_cancel(spec, objective, config, &mut TracingReporter, None)
    }

    /// Runs the search with a custom reporter and an optional cancellation
    /// token. The token is checked before each candidate is drawn; an
    /// evaluation already in progress is never interrupted.
    pub fn run_with_cancel<O, S>(
        spec: SpaceSpec,
        objective: &mut O,
        config: &KBestConfig,
        reporter: &mut S,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<KBestResult, KBestError>
    where
        O: Objective + ?Sized,
        S: StatusReporter + ?Sized,
    {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(spec, objective, config, reporter, cancel.as_deref(), &mut rng)
    }

    /// Runs the search drawing all randomness from `rng`.
    ///
    /// `config.seed` is ignored.
    pub fn run_with_rng<O, S, R>(
        spec: SpaceSpec,
        objective: &mut O,
        config: &KBestConfig,
        reporter: &mut S,
        cancel: Option<&AtomicBool>,
        rng: &mut R,
    ) -> Result<KBestResult, KBestError>
    where
        O: Objective + ?Sized,
        S: StatusReporter + ?Sized,
        R: Rng,
    {
        config.validate()?;
        let space = SearchSpace::uniform(spec)?;
        tracing::debug!(
            choices = space.spec().len(),
            combinations = space.combinations(),
            population_size = config.population_size,
            "starting k-best search"
        );

        let search = Search {
            config,
            objective,
            reporter,
            rng,
            cancel,
            space,
            history: CandidateHistory::new(),
            population: Population::new(config.population_size),
            best: None,
            best_history: Vec::new(),
            seeding_trials: 0,
            adaptive_trials: 0,
            final_temperature: None,
        };
        Ok(search.execute())
    }
}

/// State of one search run.
struct Search<'a, O: ?Sized, S: ?Sized, R> {
    config: &'a KBestConfig,
    objective: &'a mut O,
    reporter: &'a mut S,
    rng: &'a mut R,
    cancel: Option<&'a AtomicBool>,
    space: SearchSpace,
    history: CandidateHistory,
    population: Population,
    best: Option<BestRecord>,
    best_history: Vec<f64>,
    seeding_trials: usize,
    adaptive_trials: usize,
    final_temperature: Option<f64>,
}

impl<O, S, R> Search<'_, O, S, R>
where
    O: Objective + ?Sized,
    S: StatusReporter + ?Sized,
    R: Rng,
{
    fn execute(mut self) -> KBestResult {
        let termination = match self.seed() {
            Some(termination) => termination,
            None => self.adapt(),
        };

        tracing::info!(
            ?termination,
            trials = self.seeding_trials + self.adaptive_trials,
            best_performance = self.best.as_ref().map(|b| b.performance),
            population = self.population.len(),
            "k-best search finished"
        );

        KBestResult {
            best: self.best,
            population: self.population.into_entries(),
            space: self.space,
            history: self.history,
            termination,
            seeding_trials: self.seeding_trials,
            adaptive_trials: self.adaptive_trials,
            final_temperature: self.final_temperature,
            best_history: self.best_history,
        }
    }

    /// Seeding phase. Returns `None` once the population is full, or the
    /// reason the search ended before that.
    fn seed(&mut self) -> Option<Termination> {
        while !self.population.is_full() {
            if let Some(stop) = self.stop_requested() {
                return Some(stop);
            }
            let key = match self.next_candidate() {
                Some(key) => key,
                None => {
                    tracing::debug!(
                        admitted = self.population.len(),
                        "candidate space exhausted during seeding"
                    );
                    return Some(Termination::Exhausted);
                }
            };

            self.seeding_trials += 1;
            let trial = TrialId::Seeding(self.seeding_trials);
            let performance = self.evaluate(&key, trial);

            self.population.try_admit(
                PopulationEntry {
                    key: key.clone(),
                    performance,
                    trial,
                },
                self.config.performance_threshold,
            );

            self.report(&key, performance, trial, None);
        }
        None
    }

    /// Adaptive phase. Entered only with a full population.
    fn adapt(&mut self) -> Termination {
        let mut schedule = AnnealingSchedule::new(
            self.config.start_temperature,
            self.config.end_temperature,
            self.config.temperature_drop,
            self.config.population_size,
        );
        self.final_temperature = Some(schedule.temperature());
        self.space = self.space.update(&self.population, schedule.temperature());
        tracing::debug!(
            temperature = schedule.temperature(),
            seeding_trials = self.seeding_trials,
            "population seeded, entering adaptive phase"
        );

        loop {
            if let Some(stop) = self.stop_requested() {
                return stop;
            }
            let Some(key) = self.next_candidate() else {
                tracing::debug!(
                    temperature = schedule.temperature(),
                    "candidate space exhausted during adaptive phase"
                );
                return Termination::Exhausted;
            };

            self.adaptive_trials += 1;
            let trial = TrialId::Adaptive(self.adaptive_trials);
            let performance = self.evaluate(&key, trial);

            let improved = self.population.try_replace(PopulationEntry {
                key: key.clone(),
                performance,
                trial,
            });
            schedule.record(improved);

            // Refresh at the temperature this trial ran at, then cool.
            self.space = self.space.update(&self.population, schedule.temperature());
            let step = schedule.advance();
            self.final_temperature = Some(schedule.temperature());

            let snapshot = AnnealingSnapshot {
                temperature: schedule.temperature(),
                unsuccessful_trials: schedule.unsuccessful_trials(),
            };
            self.report(&key, performance, trial, Some(snapshot));

            match step {
                AnnealingStep::Continue => {}
                AnnealingStep::Cooled => {
                    tracing::debug!(temperature = schedule.temperature(), "cooled");
                }
                AnnealingStep::Terminate => return Termination::Converged,
            }
        }
    }

    fn stop_requested(&self) -> Option<Termination> {
        if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Some(Termination::Cancelled);
        }
        let trials = self.seeding_trials + self.adaptive_trials;
        if self.config.max_trials > 0 && trials >= self.config.max_trials {
            return Some(Termination::TrialLimit);
        }
        None
    }

    fn next_candidate(&mut self) -> Option<CandidateKey> {
        CandidateGenerator::generate(&self.space, &mut self.history, &mut *self.rng)
    }

    /// Evaluates `key` and updates the best record.
    fn evaluate(&mut self, key: &CandidateKey, trial: TrialId) -> f64 {
        let performance = self.objective.evaluate(&self.space.candidate(key));
        BestRecord::offer(&mut self.best, key, performance, trial);
        if let Some(best) = &self.best {
            self.best_history.push(best.performance);
        }
        performance
    }

    fn report(
        &mut self,
        key: &CandidateKey,
        performance: f64,
        trial: TrialId,
        annealing: Option<AnnealingSnapshot>,
    ) {
        let status = TrialStatus {
            trial,
            candidate: self.space.candidate(key),
            performance,
            best: self.best.as_ref(),
            population: self.population.entries(),
            space: &self.space,
            annealing,
        };
        self.reporter.on_trial(&status);
    }
}
