//! K-best configuration search.
//!
//! Finds the `k` best distinct configurations of a categorical search space
//! under an expensive objective. The search runs in two phases:
//!
//! 1. **Seeding**: candidates are drawn uniformly; those meeting the
//!    performance threshold join the population until it holds `k` entries.
//! 2. **Adaptive**: candidates are drawn from a softmax over rank-weighted
//!    alternative counts in the population. A candidate that beats the
//!    worst member replaces it. After `k` unsuccessful trials in a row the
//!    temperature drops by a fixed step; `k` unsuccessful trials at the
//!    floor temperature end the search.
//!
//! The search also ends as soon as no unexplored candidate can be drawn.
//!
//! # Key Types
//!
//! - [`KBestConfig`]: population size, temperatures, threshold, seed
//! - [`KBestRunner`]: executes the search
//! - [`KBestResult`]: best record, final population and run statistics
//! - [`Objective`] / [`StatusReporter`]: caller-supplied evaluation and
//!   observation hooks
//!
//! # Examples
//!
//! ```
//! use u_kbest::search::{KBestConfig, KBestRunner, Termination};
//! use u_kbest::space::{Candidate, SpaceSpec};
//!
//! let spec = SpaceSpec::new()
//!     .with_choice("optimizer", ["sgd", "adam", "rmsprop"])
//!     .with_choice("batch", ["16", "32", "64", "128"])
//!     .with_choice("norm", ["none", "batch"]);
//!
//! let mut objective = |c: &Candidate<'_>| {
//!     let mut score = 0.5;
//!     if c.get("optimizer") == Some("adam") { score += 0.3; }
//!     if c.get("batch") == Some("64") { score += 0.15; }
//!     if c.get("norm") == Some("batch") { score += 0.04; }
//!     score
//! };
//!
//! let config = KBestConfig::default()
//!     .with_population_size(3)
//!     .with_performance_threshold(0.5)
//!     .with_seed(7);
//!
//! let result = KBestRunner::run(spec, &mut objective, &config).unwrap();
//! assert!(result.best.is_some());
//! assert!(result.population.len() <= 3);
//! assert!(matches!(result.termination, Termination::Converged | Termination::Exhausted));
//! ```

mod config;
mod report;
mod runner;
mod types;

pub use config::KBestConfig;
pub use report::TracingReporter;
pub use runner::{KBestResult, KBestRunner, Termination};
pub use types::{AnnealingSnapshot, BestRecord, Objective, StatusReporter, TrialStatus};
