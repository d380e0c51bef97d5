//! Raw search-space definition.

use super::candidate::CandidateKey;
use crate::error::KBestError;
use std::collections::HashSet;

/// One decision axis: a named choice and its ordered alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceSpec {
    /// Choice name. Unique within a space.
    pub name: String,

    /// Alternative labels in sampling order. Must be non-empty and
    /// duplicate-free.
    pub alternatives: Vec<String>,
}

/// The raw search space as supplied by the caller.
///
/// Choices keep the order in which they were added; that order fixes both
/// the sampling order and the layout of every
/// [`CandidateKey`](super::CandidateKey).
///
/// # Examples
///
/// ```
/// use u_kbest::space::SpaceSpec;
///
/// let spec = SpaceSpec::new()
///     .with_choice("optimizer", ["sgd", "adam"])
///     .with_choice("layers", ["2", "4", "8"]);
///
/// assert!(spec.validate().is_ok());
/// assert_eq!(spec.combinations(), 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SpaceSpec {
    choices: Vec<ChoiceSpec>,
}

impl SpaceSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a choice with the given alternatives.
    pub fn with_choice<N, I, A>(mut self, name: N, alternatives: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.choices.push(ChoiceSpec {
            name: name.into(),
            alternatives: alternatives.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// The choices in their fixed order.
    pub fn choices(&self) -> &[ChoiceSpec] {
        &self.choices
    }

    /// Number of choices.
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Position of a choice by name.
    pub fn choice_index(&self, name: &str) -> Option<usize> {
        self.choices.iter().position(|c| c.name == name)
    }

    /// Whether `key` has one in-range alternative index per choice.
    pub fn contains_key(&self, key: &CandidateKey) -> bool {
        let indices = key.indices();
        indices.len() == self.choices.len()
            && self
                .choices
                .iter()
                .zip(indices)
                .all(|(choice, &alt)| alt < choice.alternatives.len())
    }

    /// Size of the full combinatorial space (saturating).
    pub fn combinations(&self) -> usize {
        self.choices
            .iter()
            .fold(1usize, |acc, c| acc.saturating_mul(c.alternatives.len()))
    }

    /// Validates the choices and their alternatives.
    ///
    /// A choice without alternatives would make the uniform
    /// initialization divide by zero, so it is rejected here.
    pub fn validate(&self) -> Result<(), KBestError> {
        if self.choices.is_empty() {
            return Err(KBestError::EmptySpace);
        }

        let mut names = HashSet::with_capacity(self.choices.len());
        for choice in &self.choices {
            if !names.insert(choice.name.as_str()) {
                return Err(KBestError::DuplicateChoice {
                    choice: choice.name.clone(),
                });
            }
            if choice.alternatives.is_empty() {
                return Err(KBestError::NoAlternatives {
                    choice: choice.name.clone(),
                });
            }
            let mut labels = HashSet::with_capacity(choice.alternatives.len());
            for alternative in &choice.alternatives {
                if !labels.insert(alternative.as_str()) {
                    return Err(KBestError::DuplicateAlternative {
                        choice: choice.name.clone(),
                        alternative: alternative.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<N, A> FromIterator<(N, Vec<A>)> for SpaceSpec
where
    N: Into<String>,
    A: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, Vec<A>)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(SpaceSpec::new(), |spec, (name, alternatives)| {
                spec.with_choice(name, alternatives)
            })
    }
}
