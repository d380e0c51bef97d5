//! Bounded population of the k best distinct candidates.

use crate::space::CandidateKey;
use std::fmt;

/// Identifies a trial within one search run.
///
/// Seeding and adaptive trials are numbered independently, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrialId {
    /// A trial drawn from the uniform distribution during seeding.
    Seeding(usize),
    /// A trial drawn from the adaptive distribution.
    Adaptive(usize),
}

impl fmt::Display for TrialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialId::Seeding(n) => write!(f, "r{n}"),
            TrialId::Adaptive(n) => write!(f, "{n}"),
        }
    }
}

/// An evaluated candidate held in the population.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationEntry {
    pub key: CandidateKey,
    pub performance: f64,
    pub trial: TrialId,
}

/// The k best candidates found so far, sorted ascending by performance.
///
/// The first entry is the worst member and the one displaced by a better
/// candidate. Distinctness of keys is not checked here; it follows from
/// the generator never producing the same key twice in a run.
#[derive(Debug, Clone)]
pub struct Population {
    capacity: usize,
    entries: Vec<PopulationEntry>,
}

impl Population {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Entries in ascending order of performance.
    pub fn entries(&self) -> &[PopulationEntry] {
        &self.entries
    }

    /// The lowest-performing entry.
    pub fn worst(&self) -> Option<&PopulationEntry> {
        self.entries.first()
    }

    /// Seeding admission.
    ///
    /// Admits `entry` if the population still has room and its performance
    /// meets `threshold`. Returns whether it was admitted.
    pub fn try_admit(&mut self, entry: PopulationEntry, threshold: f64) -> bool {
        // NaN never meets the threshold.
        let meets_threshold = entry.performance >= threshold;
        if self.is_full() || !meets_threshold {
            return false;
        }
        self.entries.push(entry);
        self.sort();
        true
    }

    /// Adaptive replacement.
    ///
    /// Replaces the worst entry if `entry` performs strictly better.
    /// Ties never replace. Returns whether the trial was successful.
    pub fn try_replace(&mut self, entry: PopulationEntry) -> bool {
        match self.entries.first_mut() {
            Some(worst) if entry.performance > worst.performance => {
                *worst = entry;
                self.sort();
                true
            }
            _ => false,
        }
    }

    pub fn into_entries(self) -> Vec<PopulationEntry> {
        self.entries
    }

    /// Stable, so entries with equal performance keep their order.
    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| a.performance.total_cmp(&b.performance));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(i: usize, performance: f64) -> PopulationEntry {
        PopulationEntry {
            key: CandidateKey::new(vec![i]),
            performance,
            trial: TrialId::Seeding(i),
        }
    }

    fn performances(p: &Population) -> Vec<f64> {
        p.entries().iter().map(|e| e.performance).collect()
    }

    #[test]
    fn test_trial_id_display() {
        assert_eq!(TrialId::Seeding(3).to_string(), "r3");
        assert_eq!(TrialId::Adaptive(12).to_string(), "12");
    }

    #[test]
    fn test_admit_respects_threshold() {
        let mut p = Population::new(3);
        assert!(!p.try_admit(entry(0, 0.5), 0.9));
        assert!(p.try_admit(entry(1, 0.9), 0.9));
        assert!(p.try_admit(entry(2, 0.95), 0.9));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_admit_sorts_ascending() {
        let mut p = Population::new(3);
        p.try_admit(entry(0, 0.99), 0.0);
        p.try_admit(entry(1, 0.91), 0.0);
        p.try_admit(entry(2, 0.95), 0.0);
        assert_eq!(performances(&p), vec![0.91, 0.95, 0.99]);
        assert!(p.is_full());
        assert_eq!(p.worst().unwrap().key, CandidateKey::new(vec![1]));
    }

    #[test]
    fn test_admit_stops_at_capacity() {
        let mut p = Population::new(1);
        assert!(p.try_admit(entry(0, 0.5), 0.0));
        assert!(!p.try_admit(entry(1, 0.9), 0.0));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_admit_rejects_nan() {
        let mut p = Population::new(2);
        assert!(!p.try_admit(entry(0, f64::NAN), f64::NEG_INFINITY));
        assert!(p.is_empty());
    }

    #[test]
    fn test_replace_strictly_better() {
        let mut p = Population::new(2);
        p.try_admit(entry(0, 0.5), 0.0);
        p.try_admit(entry(1, 0.7), 0.0);

        assert!(!p.try_replace(entry(2, 0.5)), "ties must not replace");
        assert!(!p.try_replace(entry(3, 0.4)));
        assert!(p.try_replace(entry(4, 0.9)));
        assert_eq!(performances(&p), vec![0.7, 0.9]);
        assert_eq!(p.entries()[1].key, CandidateKey::new(vec![4]));
    }

    #[test]
    fn test_replace_on_empty_population() {
        let mut p = Population::new(2);
        assert!(!p.try_replace(entry(0, 1.0)));
    }

    #[test]
    fn test_replacement_sorts_before_equal_scores() {
        let mut p = Population::new(3);
        p.try_admit(entry(0, 0.1), 0.0);
        p.try_admit(entry(1, 0.6), 0.0);
        p.try_admit(entry(2, 0.8), 0.0);
        assert!(p.try_replace(entry(3, 0.6)));
        let keys: Vec<usize> = p.entries().iter().map(|e| e.key.indices()[0]).collect();
        assert_eq!(keys, vec![3, 1, 2]);
    }

    proptest! {
        #[test]
        fn prop_bounded_and_sorted(
            capacity in 1usize..6,
            seeds in prop::collection::vec(0.0f64..1.0, 0..12),
            trials in prop::collection::vec(0.0f64..1.0, 0..30),
        ) {
            let mut p = Population::new(capacity);
            for (i, perf) in seeds.into_iter().enumerate() {
                p.try_admit(entry(i, perf), 0.3);
                prop_assert!(p.len() <= capacity);
                prop_assert!(p.entries().windows(2).all(|w| w[0].performance <= w[1].performance));
            }
            for (i, perf) in trials.into_iter().enumerate() {
                let before = p.worst().map(|e| e.performance);
                let replaced = p.try_replace(entry(100 + i, perf));
                prop_assert_eq!(replaced, before.is_some_and(|w| perf > w));
                prop_assert!(p.len() <= capacity);
                prop_assert!(p.entries().windows(2).all(|w| w[0].performance <= w[1].performance));
            }
        }
    }
}
