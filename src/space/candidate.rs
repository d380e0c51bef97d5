//! Candidate identity and assignment views.

use super::spec::SpaceSpec;
use std::fmt;

/// Canonical identity of a candidate.
///
/// Holds one alternative index per choice, in the space's fixed choice
/// order. Two candidates from the same space are the same configuration
/// exactly when their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CandidateKey(Vec<usize>);

impl CandidateKey {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Alternative index chosen for each choice.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

/// A complete assignment of one alternative per choice, borrowed from
/// the space it was drawn from.
///
/// This is what the objective receives.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    spec: &'a SpaceSpec,
    key: &'a CandidateKey,
}

impl<'a> Candidate<'a> {
    /// `key` must satisfy [`SpaceSpec::contains_key`].
    pub(crate) fn new(spec: &'a SpaceSpec, key: &'a CandidateKey) -> Self {
        debug_assert!(spec.contains_key(key));
        Self { spec, key }
    }

    pub fn key(&self) -> &'a CandidateKey {
        self.key
    }

    /// The alternative assigned to `choice`, if the choice exists.
    pub fn get(&self, choice: &str) -> Option<&'a str> {
        let idx = self.spec.choice_index(choice)?;
        let alternative = *self.key.indices().get(idx)?;
        self.spec.choices()[idx]
            .alternatives
            .get(alternative)
            .map(String::as_str)
    }

    /// `(choice, alternative)` pairs in choice order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let (spec, key) = (self.spec, self.key);
        spec.choices()
            .iter()
            .zip(key.indices())
            .map(|(choice, &alt)| (choice.name.as_str(), choice.alternatives[alt].as_str()))
    }

    /// Owned copy of the assignment.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(c, a)| (c.to_owned(), a.to_owned()))
            .collect()
    }
}

impl fmt::Display for Candidate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (choice, alternative)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{choice}: {alternative}")?;
        }
        f.write_str("}")
    }
}
