//! K-best combinatorial configuration search.
//!
//! Given a set of independent categorical choices, each with a fixed set
//! of alternatives, searches for the `k` best-performing distinct
//! configurations under an external, expensive objective:
//!
//! - **Seeding**: unbiased uniform sampling until `k` configurations meet
//!   a performance threshold.
//! - **Adaptive**: sampling biased toward alternatives that appear in
//!   high-ranking configurations, through a temperature-annealed softmax,
//!   much like simulated annealing over a categorical space.
//!
//! # Modules
//!
//! - [`space`]: choices, alternatives, candidates and the sampling
//!   distribution
//! - [`generator`]: candidate sampling with run-wide deduplication
//! - [`population`]: bounded, sorted store of the best candidates
//! - [`annealing`]: temperature and unsuccessful-trial bookkeeping
//! - [`search`]: the two-phase search driver
//!
//! # Architecture
//!
//! Every run owns its state exclusively and is strictly sequential. All
//! randomness flows through one explicit RNG, so a seeded run is fully
//! reproducible.

pub mod annealing;
pub mod error;
pub mod generator;
pub mod population;
pub mod search;
pub mod space;

pub use error::KBestError;
