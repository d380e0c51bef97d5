//! Per-choice sampling distributions.

use super::candidate::{Candidate, CandidateKey};
use super::spec::SpaceSpec;
use crate::error::KBestError;
use crate::population::Population;
use std::sync::Arc;

/// Tolerance used when checking that a choice's probabilities sum to one.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Sampling distribution over a search space.
///
/// Each choice carries one probability per alternative, aligned with the
/// alternative order of the underlying [`SpaceSpec`]. Probabilities of a
/// choice always sum to one.
///
/// A `SearchSpace` is never mutated after construction;
/// [`update`](SearchSpace::update) returns a new instance sharing the same
/// immutable layout.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    spec: Arc<SpaceSpec>,
    probabilities: Vec<Vec<f64>>,
}

impl SearchSpace {
    /// Builds the uniform distribution: `1/n` for each of a choice's `n`
    /// alternatives.
    ///
    /// # Errors
    ///
    /// Returns an error if `spec` fails [`SpaceSpec::validate`], most
    /// notably when a choice has no alternatives.
    pub fn uniform(spec: SpaceSpec) -> Result<Self, KBestError> {
        spec.validate()?;
        let probabilities = spec
            .choices()
            .iter()
            .map(|c| {
                let n = c.alternatives.len();
                vec![1.0 / n as f64; n]
            })
            .collect();
        Ok(Self {
            spec: Arc::new(spec),
            probabilities,
        })
    }

    /// Derives a new distribution from the population.
    ///
    /// Entries are ranked by their position in the ascending population:
    /// the worst entry weighs 1, the best weighs `len`. Each entry adds its
    /// weight to every `(choice, alternative)` pair it uses, and each
    /// choice's counts are turned into probabilities with a softmax at the
    /// given temperature:
    ///
    /// `p(a) = exp(count(a) / T) / Σ exp(count(a') / T)`
    ///
    /// Alternatives absent from the population keep a count of zero and
    /// still receive probability mass.
    pub fn update(&self, population: &Population, temperature: f64) -> SearchSpace {
        debug_assert!(temperature > 0.0, "temperature must be positive");

        let mut counts: Vec<Vec<f64>> = self
            .probabilities
            .iter()
            .map(|p| vec![0.0; p.len()])
            .collect();

        for (rank, entry) in population.entries().iter().enumerate() {
            let weight = (rank + 1) as f64;
            for (choice, &alt) in entry.key.indices().iter().enumerate() {
                counts[choice][alt] += weight;
            }
        }

        let probabilities = counts
            .iter()
            .map(|c| softmax(c, temperature))
            .collect();

        let space = SearchSpace {
            spec: Arc::clone(&self.spec),
            probabilities,
        };
        debug_assert!(space.is_normalized(NORMALIZATION_TOLERANCE));
        space
    }

    /// The raw choices and alternatives this space was built from.
    pub fn spec(&self) -> &SpaceSpec {
        &self.spec
    }

    /// Probabilities of the choice at `choice`, in alternative order.
    ///
    /// # Panics
    ///
    /// Panics if `choice` is not below the number of choices.
    pub fn probabilities(&self, choice: usize) -> &[f64] {
        &self.probabilities[choice]
    }

    /// Probability of `alternative` for the named choice.
    pub fn probability(&self, choice: &str, alternative: &str) -> Option<f64> {
        let c = self.spec.choice_index(choice)?;
        let a = self.spec.choices()[c]
            .alternatives
            .iter()
            .position(|label| label == alternative)?;
        Some(self.probabilities[c][a])
    }

    /// Number of distinct candidates in the space (saturating).
    pub fn combinations(&self) -> usize {
        self.spec.combinations()
    }

    /// Resolves a key drawn from this space into an assignment view.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not belong to this space: wrong number of
    /// indices, or an index past a choice's last alternative. Use
    /// [`try_candidate`](Self::try_candidate) for keys from elsewhere.
    pub fn candidate<'a>(&'a self, key: &'a CandidateKey) -> Candidate<'a> {
        match self.try_candidate(key) {
            Some(candidate) => candidate,
            None => panic!("candidate key {:?} does not fit this search space", key.indices()),
        }
    }

    /// Like [`candidate`](Self::candidate), but `None` for a foreign key.
    pub fn try_candidate<'a>(&'a self, key: &'a CandidateKey) -> Option<Candidate<'a>> {
        self.spec
            .contains_key(key)
            .then(|| Candidate::new(&self.spec, key))
    }

    /// Whether every choice's probabilities sum to one within `tolerance`.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        self.probabilities
            .iter()
            .all(|p| (p.iter().sum::<f64>() - 1.0).abs() <= tolerance)
    }

    /// Per-choice probabilities in choice order.
    pub(crate) fn distributions(&self) -> impl Iterator<Item = &[f64]> {
        self.probabilities.iter().map(Vec::as_slice)
    }
}

/// Softmax of `counts / temperature`, shifted by the maximum count so the
/// exponent never exceeds zero.
fn softmax(counts: &[f64], temperature: f64) -> Vec<f64> {
    let max = counts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = counts
        .iter()
        .map(|&c| ((c - max) / temperature).exp())
        .collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{PopulationEntry, TrialId};
    use proptest::prelude::*;

    fn spec() -> SpaceSpec {
        SpaceSpec::new()
            .with_choice("c1", ["a1", "a2", "a3"])
            .with_choice("c2", ["b1", "b2", "b3", "b4"])
            .with_choice("c3", ["d1", "d2"])
    }

    fn entry(indices: Vec<usize>, performance: f64, n: usize) -> PopulationEntry {
        PopulationEntry {
            key: CandidateKey::new(indices),
            performance,
            trial: TrialId::Seeding(n),
        }
    }

    #[test]
    fn test_uniform() {
        let space = SearchSpace::uniform(spec()).unwrap();
        assert_eq!(space.probabilities(0), &[1.0 / 3.0; 3]);
        assert_eq!(space.probabilities(1), &[0.25; 4]);
        assert_eq!(space.probabilities(2), &[0.5; 2]);
        assert!(space.is_normalized(NORMALIZATION_TOLERANCE));
        assert_eq!(space.combinations(), 24);
    }

    #[test]
    fn test_uniform_rejects_empty_choice() {
        let spec = SpaceSpec::new().with_choice("c1", Vec::<String>::new());
        assert!(matches!(
            SearchSpace::uniform(spec),
            Err(KBestError::NoAlternatives { .. })
        ));
    }

    #[test]
    fn test_update_rank_weights() {
        let space = SearchSpace::uniform(spec()).unwrap();
        let mut population = Population::new(2);
        population.try_admit(entry(vec![0, 0, 0], 0.95, 1), 0.9);
        population.try_admit(entry(vec![1, 0, 0], 0.97, 2), 0.9);

        let t = 2.0;
        let updated = space.update(&population, t);

        // c1: a1 weighs 1 (worst), a2 weighs 2 (best), a3 absent.
        let denom = (1.0f64 / t).exp() + (2.0f64 / t).exp() + 1.0;
        let p = updated.probabilities(0);
        assert!((p[0] - (1.0f64 / t).exp() / denom).abs() < 1e-12);
        assert!((p[1] - (2.0f64 / t).exp() / denom).abs() < 1e-12);
        assert!((p[2] - 1.0 / denom).abs() < 1e-12);
        assert!(p[1] > p[0] && p[0] > p[2]);

        // c2: b1 accumulates 1 + 2 = 3.
        let denom = (3.0f64 / t).exp() + 3.0;
        assert!((updated.probability("c2", "b1").unwrap() - (3.0f64 / t).exp() / denom).abs() < 1e-12);
        assert!((updated.probability("c2", "b4").unwrap() - 1.0 / denom).abs() < 1e-12);
    }

    #[test]
    fn test_update_leaves_original_untouched() {
        let space = SearchSpace::uniform(spec()).unwrap();
        let mut population = Population::new(1);
        population.try_admit(entry(vec![2, 3, 1], 1.0, 1), 0.0);
        let updated = space.update(&population, 1.0);
        assert_eq!(space.probabilities(0), &[1.0 / 3.0; 3]);
        assert!(updated.probabilities(0)[2] > 1.0 / 3.0);
    }

    #[test]
    fn test_lower_temperature_sharpens() {
        let space = SearchSpace::uniform(spec()).unwrap();
        let mut population = Population::new(1);
        population.try_admit(entry(vec![0, 0, 0], 1.0, 1), 0.0);
        let hot = space.update(&population, 10.0);
        let cold = space.update(&population, 1.0);
        assert!(cold.probabilities(0)[0] > hot.probabilities(0)[0]);
    }

    #[test]
    fn test_softmax_large_counts_finite() {
        let p = softmax(&[5000.0, 4999.0, 0.0], 0.5);
        assert!(p.iter().all(|x| x.is_finite()));
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[0] > p[1]);
    }

    #[test]
    fn test_probability_unknown_labels() {
        let space = SearchSpace::uniform(spec()).unwrap();
        assert_eq!(space.probability("nope", "a1"), None);
        assert_eq!(space.probability("c1", "nope"), None);
    }

    #[test]
    fn test_try_candidate_rejects_foreign_key() {
        let space = SearchSpace::uniform(spec()).unwrap();
        let own = CandidateKey::new(vec![2, 3, 1]);
        assert_eq!(space.try_candidate(&own).unwrap().get("c2"), Some("b4"));

        for foreign in [vec![3, 0, 0], vec![0, 0], vec![0, 0, 0, 0]] {
            assert!(space.try_candidate(&CandidateKey::new(foreign)).is_none());
        }
    }

    #[test]
    #[should_panic(expected = "does not fit this search space")]
    fn test_candidate_panics_on_out_of_range_index() {
        let space = SearchSpace::uniform(spec()).unwrap();
        let key = CandidateKey::new(vec![0, 9, 0]);
        let _ = space.candidate(&key);
    }

    proptest! {
        #[test]
        fn prop_update_is_normalized(
            picks in prop::collection::vec((0usize..3, 0usize..4, 0usize..2, 0.0f64..1.0), 1..8),
            temperature in 0.05f64..20.0,
        ) {
            let space = SearchSpace::uniform(spec()).unwrap();
            let mut population = Population::new(picks.len());
            for (n, (a, b, c, perf)) in picks.into_iter().enumerate() {
                population.try_admit(entry(vec![a, b, c], perf, n + 1), 0.0);
            }
            let updated = space.update(&population, temperature);
            prop_assert!(updated.is_normalized(NORMALIZATION_TOLERANCE));
            for dist in updated.distributions() {
                prop_assert!(dist.iter().all(|&p| (0.0..=1.0).contains(&p)));
            }
        }
    }
}
