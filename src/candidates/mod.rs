//! Candidate pair generation
//!
//! Decides which sentence pairs are worth an exact overlap computation.
//! The exhaustive policy proposes every pair; the MinHash/LSH policy only
//! proposes pairs whose signatures collide in at least one band.

pub mod lsh;
pub mod minhash;

use crate::errors::Result;
use crate::types::TermSet;
use lsh::{LshBanding, LshConfig};
use serde::{Deserialize, Serialize};

/// An unordered pair of distinct units, stored as `first < second`.
///
/// Units are identified by their position in the caller-supplied collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidatePair {
    pub first: u32,
    pub second: u32,
}

impl CandidatePair {
    /// Canonicalize a pair; `None` for a self pair
    pub fn new(a: u32, b: u32) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a,
                second: b,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b,
                second: a,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A sorted, duplicate-free set of candidate pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    pairs: Vec<CandidatePair>,
}

impl CandidateSet {
    /// Build a set from arbitrary `(a, b)` pairs; self pairs are dropped
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut pairs: Vec<CandidatePair> = pairs
            .into_iter()
            .filter_map(|(a, b)| CandidatePair::new(a, b))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        Self { pairs }
    }

    /// Every pair of distinct units among `num_units`
    pub fn all_pairs(num_units: usize) -> Self {
        let n = num_units as u32;
        let mut pairs = Vec::with_capacity(num_units * num_units.saturating_sub(1) / 2);
        for a in 0..n {
            for b in (a + 1)..n {
                pairs.push(CandidatePair {
                    first: a,
                    second: b,
                });
            }
        }
        Self { pairs }
    }

    /// At most `max` pairs of distinct units among `num_units`.
    ///
    /// Pairs are drawn by increasing position gap, so a small budget still
    /// touches every unit instead of fanning out from the first one.
    /// Enumeration stops as soon as the budget is met.
    pub fn bounded_pairs(num_units: usize, max: usize) -> Self {
        let total = num_units * num_units.saturating_sub(1) / 2;
        if max >= total {
            return Self::all_pairs(num_units);
        }

        let mut pairs: Vec<CandidatePair> = spread_pairs(num_units)
            .take(max)
            .map(|(a, b)| CandidatePair {
                first: a as u32,
                second: b as u32,
            })
            .collect();
        pairs.sort_unstable();
        Self { pairs }
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if there are no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Check membership of an unordered pair
    pub fn contains(&self, a: u32, b: u32) -> bool {
        CandidatePair::new(a, b)
            .map(|p| self.pairs.binary_search(&p).is_ok())
            .unwrap_or(false)
    }

    /// Check that every pair is a subset of another set
    pub fn is_subset(&self, other: &CandidateSet) -> bool {
        self.pairs
            .iter()
            .all(|p| other.pairs.binary_search(p).is_ok())
    }

    /// Iterate over the pairs in canonical order
    pub fn iter(&self) -> std::slice::Iter<'_, CandidatePair> {
        self.pairs.iter()
    }

    /// Borrow the pairs as a slice
    pub fn as_slice(&self) -> &[CandidatePair] {
        &self.pairs
    }
}

/// Index pairs `(i, i + gap)` over `0..len`, ordered by gap then by `i`.
pub(crate) fn spread_pairs(len: usize) -> impl Iterator<Item = (usize, usize)> {
    (1..len).flat_map(move |gap| (0..len - gap).map(move |i| (i, i + gap)))
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a CandidatePair;
    type IntoIter = std::slice::Iter<'a, CandidatePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Candidate generation policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CandidateStrategy {
    /// Every unordered pair, O(n²)
    #[default]
    Exhaustive,
    /// Pairs sharing a MinHash band bucket
    MinHashLsh(LshConfig),
}

impl CandidateStrategy {
    /// Validate the policy's tunables
    pub fn validate(&self) -> Result<()> {
        match self {
            CandidateStrategy::Exhaustive => Ok(()),
            CandidateStrategy::MinHashLsh(config) => config.validate(),
        }
    }
}

/// Produce the candidate pairs for a collection of term sets.
///
/// With `max_pairs` set, generation stops once that many distinct pairs
/// exist.
pub fn build_candidates(
    term_sets: &[TermSet],
    strategy: &CandidateStrategy,
    max_pairs: Option<usize>,
) -> Result<CandidateSet> {
    let candidates = match (strategy, max_pairs) {
        (CandidateStrategy::Exhaustive, None) => CandidateSet::all_pairs(term_sets.len()),
        (CandidateStrategy::Exhaustive, Some(max)) => {
            CandidateSet::bounded_pairs(term_sets.len(), max)
        }
        (CandidateStrategy::MinHashLsh(config), max) => {
            LshBanding::new(*config)?.bounded_candidates(term_sets, max)
        }
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        units = term_sets.len(),
        pairs = candidates.len(),
        max_pairs,
        "built candidate pairs"
    );

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(raw: &[&[&str]]) -> Vec<TermSet> {
        raw.iter().map(|s| s.iter().copied().collect()).collect()
    }

    #[test]
    fn test_pair_canonical_order() {
        assert_eq!(
            CandidatePair::new(3, 1),
            Some(CandidatePair {
                first: 1,
                second: 3
            })
        );
        assert_eq!(CandidatePair::new(2, 2), None);
    }

    #[test]
    fn test_from_pairs_dedup() {
        let set = CandidateSet::from_pairs(vec![(1, 0), (0, 1), (2, 2), (2, 1)]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(0, 1));
        assert!(set.contains(2, 1));
        assert!(!set.contains(0, 2));
    }

    #[test]
    fn test_all_pairs() {
        let set = CandidateSet::all_pairs(4);
        assert_eq!(set.len(), 6);
        assert!(set.iter().all(|p| p.first < p.second));
        assert!(CandidateSet::all_pairs(0).is_empty());
        assert!(CandidateSet::all_pairs(1).is_empty());
    }

    #[test]
    fn test_bounded_pairs_spread_over_units() {
        let set = CandidateSet::bounded_pairs(50, 49);
        assert_eq!(set.len(), 49);
        for unit in 0..50u32 {
            assert!(set.iter().any(|p| p.first == unit || p.second == unit));
        }
        assert!(set.contains(0, 1));
        assert!(set.contains(48, 49));
        assert!(!set.contains(0, 2));
    }

    #[test]
    fn test_bounded_pairs_without_limit_pressure() {
        assert_eq!(CandidateSet::bounded_pairs(4, 6), CandidateSet::all_pairs(4));
        assert_eq!(CandidateSet::bounded_pairs(4, 100), CandidateSet::all_pairs(4));
        assert!(CandidateSet::bounded_pairs(4, 0).is_empty());

        let set = CandidateSet::bounded_pairs(4, 4);
        let pairs: Vec<_> = set.iter().map(|p| (p.first, p.second)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_build_exhaustive_stops_at_limit() {
        // Five billion pairs if enumerated in full
        let terms = vec![TermSet::new(); 100_000];
        let set = build_candidates(&terms, &CandidateStrategy::Exhaustive, Some(10)).unwrap();
        assert_eq!(set.len(), 10);
        assert!(set.iter().all(|p| p.second == p.first + 1));
    }

    #[test]
    fn test_build_exhaustive() {
        let terms = sets(&[&["a"], &["b"], &["c"]]);
        let set = build_candidates(&terms, &CandidateStrategy::Exhaustive, None).unwrap();
        assert_eq!(set, CandidateSet::all_pairs(3));
    }

    #[test]
    fn test_build_lsh_is_subset_of_exhaustive() {
        let terms = sets(&[
            &["cat", "dog", "bird"],
            &["cat", "dog", "bird"],
            &["fish", "whale"],
            &["cat", "dog", "mouse"],
        ]);
        let strategy = CandidateStrategy::MinHashLsh(LshConfig::new(40, 20));
        let set = build_candidates(&terms, &strategy, None).unwrap();

        assert!(set.contains(0, 1));
        assert!(set.is_subset(&CandidateSet::all_pairs(terms.len())));
    }

    #[test]
    fn test_build_lsh_rejects_bad_banding() {
        let terms = sets(&[&["a"], &["a"]]);
        let strategy = CandidateStrategy::MinHashLsh(LshConfig::new(10, 3));
        assert!(build_candidates(&terms, &strategy, None)
            .unwrap_err()
            .is_configuration_error());
    }
}
