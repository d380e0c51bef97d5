//! Candidate sampling with run-wide deduplication.

use crate::space::{CandidateKey, SearchSpace};
use rand::Rng;
use std::collections::HashSet;

/// Every candidate key generated during a run, in generation order.
///
/// Append-only: a key is recorded when it is generated, before it is
/// evaluated, and is never removed.
#[derive(Debug, Clone, Default)]
pub struct CandidateHistory {
    seen: HashSet<CandidateKey>,
    order: Vec<CandidateKey>,
}

impl CandidateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &CandidateKey) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in the order they were generated.
    pub fn keys(&self) -> &[CandidateKey] {
        &self.order
    }

    /// Records `key`. Returns `false` if it was already present.
    fn insert(&mut self, key: CandidateKey) -> bool {
        if !self.seen.insert(key.clone()) {
            return false;
        }
        self.order.push(key);
        true
    }
}

/// Draws unexplored candidates from a [`SearchSpace`].
pub struct CandidateGenerator;

impl CandidateGenerator {
    /// Samples a candidate that is not yet in `history` and records it.
    ///
    /// Each attempt draws every choice independently from its distribution.
    /// After `2 × combinations` attempts without finding an unused key the
    /// space is treated as exhausted and `None` is returned.
    pub fn generate<R: Rng>(
        space: &SearchSpace,
        history: &mut CandidateHistory,
        rng: &mut R,
    ) -> Option<CandidateKey> {
        let max_attempts = Self::max_attempts(space);
        for _ in 0..max_attempts {
            let key = Self::sample(space, rng);
            if history.insert(key.clone()) {
                return Some(key);
            }
        }
        None
    }

    /// Retry bound for one [`generate`](Self::generate) call: twice the
    /// size of the full combinatorial space.
    pub fn max_attempts(space: &SearchSpace) -> usize {
        space.combinations().saturating_mul(2)
    }

    fn sample<R: Rng>(space: &SearchSpace, rng: &mut R) -> CandidateKey {
        let indices = space
            .distributions()
            .map(|probabilities| select_alternative(probabilities, rng.random::<f64>()))
            .collect();
        CandidateKey::new(indices)
    }
}

/// Roulette selection over `probabilities` for a uniform draw `u` in `[0, 1)`.
///
/// Picks the first alternative whose cumulative mass reaches `u`. Falls back
/// to the last alternative when rounding leaves the total just short of `u`.
pub(crate) fn select_alternative(probabilities: &[f64], u: f64) -> usize {
    debug_assert!(!probabilities.is_empty());
    let mut cumulative = 0.0;
    for (i, &p) in probabilities.iter().enumerate() {
        cumulative += p;
        if cumulative >= u {
            return i;
        }
    }
    probabilities.len() - 1
}
