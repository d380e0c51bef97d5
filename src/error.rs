//! Configuration errors.

use thiserror::Error;

/// Errors raised while validating a search before any evaluation happens.
///
/// Running out of unexplored candidates is *not* an error; it ends the
/// search normally with [`Termination::Exhausted`](crate::search::Termination::Exhausted).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KBestError {
    /// The search space has no choices at all.
    #[error("search space must contain at least one choice")]
    EmptySpace,

    /// A choice was configured without any alternatives.
    #[error("choice `{choice}` has no alternatives")]
    NoAlternatives { choice: String },

    /// The same choice name appears twice.
    #[error("choice `{choice}` is defined more than once")]
    DuplicateChoice { choice: String },

    /// An alternative label is repeated within one choice.
    #[error("alternative `{alternative}` appears more than once in choice `{choice}`")]
    DuplicateAlternative { choice: String, alternative: String },

    /// A search parameter is out of range.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}
