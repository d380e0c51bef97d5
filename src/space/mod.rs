//! Search space: choices, alternatives and their sampling distribution.
//!
//! - [`SpaceSpec`]: the raw, caller-supplied list of choices and their
//!   alternatives
//! - [`SearchSpace`]: per-choice probabilities over those alternatives,
//!   uniform at first and later derived from the population
//! - [`CandidateKey`] / [`Candidate`]: identity and assignment view of one
//!   configuration

mod candidate;
mod model;
mod spec;

pub use candidate::{Candidate, CandidateKey};
pub use model::{SearchSpace, NORMALIZATION_TOLERANCE};
pub use spec::{ChoiceSpec, SpaceSpec};
