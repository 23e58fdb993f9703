//! LSH banding over MinHash signatures
//!
//! A signature of `num_hashes` values is cut into `bands` contiguous bands of
//! `rows = num_hashes / bands` values. Units whose band tuples are identical
//! land in the same bucket, and every pair inside a bucket becomes a
//! candidate. Two units with Jaccard similarity `s` become candidates with
//! probability `1 - (1 - s^rows)^bands`.

use super::minhash::{MinHashSignature, MinHasher, DEFAULT_SEED};
use super::{spread_pairs, CandidatePair, CandidateSet};
use crate::errors::{Result, TextRankError};
use crate::types::TermSet;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Below this many units signatures are computed sequentially
const PARALLEL_THRESHOLD: usize = 512;

/// Banding parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LshConfig {
    /// Signature length (number of hash functions)
    pub num_hashes: usize,
    /// Number of bands; must divide `num_hashes`
    pub bands: usize,
    /// Seed for the hash family
    pub seed: u64,
}

impl Default for LshConfig {
    fn default() -> Self {
        Self {
            num_hashes: 100,
            bands: 20,
            seed: DEFAULT_SEED,
        }
    }
}

impl LshConfig {
    /// Create a config with the default seed
    pub fn new(num_hashes: usize, bands: usize) -> Self {
        Self {
            num_hashes,
            bands,
            seed: DEFAULT_SEED,
        }
    }

    /// Create a config from rows per band and band count
    pub fn from_rows(rows: usize, bands: usize) -> Self {
        Self::new(rows * bands, bands)
    }

    /// Builder method: set the hash family seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the banding
    pub fn validate(&self) -> Result<()> {
        if self.num_hashes == 0 {
            return Err(TextRankError::invalid_config("num_hashes must be > 0"));
        }
        if self.bands == 0 {
            return Err(TextRankError::invalid_config("bands must be > 0"));
        }
        if self.num_hashes % self.bands != 0 {
            return Err(TextRankError::invalid_config(format!(
                "num_hashes ({}) must be divisible by bands ({})",
                self.num_hashes, self.bands
            )));
        }
        Ok(())
    }

    /// Rows per band
    pub fn rows(&self) -> usize {
        if self.bands == 0 {
            0
        } else {
            self.num_hashes / self.bands
        }
    }

    /// Probability that a pair with Jaccard similarity `s` becomes a candidate
    pub fn candidate_probability(&self, s: f64) -> f64 {
        let s = s.clamp(0.0, 1.0);
        1.0 - (1.0 - s.powi(self.rows() as i32)).powi(self.bands as i32)
    }

    /// Similarity at which the candidate probability curve is steepest,
    /// approximately `(1/bands)^(1/rows)`
    pub fn similarity_threshold(&self) -> f64 {
        (1.0 / self.bands as f64).powf(1.0 / self.rows() as f64)
    }
}

/// Banded LSH candidate generator
#[derive(Debug, Clone)]
pub struct LshBanding {
    config: LshConfig,
    hasher: MinHasher,
}

impl LshBanding {
    /// Create a generator; fails on an invalid banding
    pub fn new(config: LshConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            hasher: MinHasher::with_seed(config.num_hashes, config.seed),
            config,
        })
    }

    /// The banding parameters
    pub fn config(&self) -> &LshConfig {
        &self.config
    }

    /// Signatures for each unit; `None` for units with no terms, which can
    /// never overlap with anything
    pub fn signatures(&self, term_sets: &[TermSet]) -> Vec<Option<MinHashSignature>> {
        let sign = |terms: &TermSet| {
            if terms.is_empty() {
                None
            } else {
                Some(self.hasher.signature(terms))
            }
        };

        if term_sets.len() < PARALLEL_THRESHOLD {
            term_sets.iter().map(sign).collect()
        } else {
            term_sets.par_iter().map(sign).collect()
        }
    }

    /// Buckets of band number `band` holding two or more units.
    ///
    /// Members are listed in input order and buckets are ordered by their
    /// first member.
    pub fn buckets(&self, signatures: &[Option<MinHashSignature>], band: usize) -> Vec<Vec<u32>> {
        let rows = self.config.rows();
        let mut table: FxHashMap<&[u64], Vec<u32>> = FxHashMap::default();

        for (unit, signature) in signatures.iter().enumerate() {
            if let Some(signature) = signature {
                table
                    .entry(signature.band(band, rows))
                    .or_default()
                    .push(unit as u32);
            }
        }

        let mut buckets: Vec<Vec<u32>> = table.into_values().filter(|b| b.len() > 1).collect();
        buckets.sort_unstable_by_key(|b| b[0]);
        buckets
    }

    /// Candidate pairs: units sharing a bucket in at least one band
    pub fn candidates(&self, term_sets: &[TermSet]) -> CandidateSet {
        self.bounded_candidates(term_sets, None)
    }

    /// Candidate pairs, stopping once `max_pairs` distinct pairs exist.
    ///
    /// Bands are scanned in order; inside a bucket pairs are drawn by
    /// increasing member gap so a small budget spreads over the bucket.
    pub fn bounded_candidates(&self, term_sets: &[TermSet], max_pairs: Option<usize>) -> CandidateSet {
        let signatures = self.signatures(term_sets);
        let limit = max_pairs.unwrap_or(usize::MAX);
        let mut seen: FxHashSet<CandidatePair> = FxHashSet::default();

        'bands: for band in 0..self.config.bands {
            if seen.len() >= limit {
                break;
            }
            for bucket in self.buckets(&signatures, band) {
                for (i, j) in spread_pairs(bucket.len()) {
                    // Bucket members are in input order, so the pair is canonical
                    seen.insert(CandidatePair {
                        first: bucket[i],
                        second: bucket[j],
                    });
                    if seen.len() >= limit {
                        break 'bands;
                    }
                }
            }
        }

        let mut pairs: Vec<CandidatePair> = seen.into_iter().collect();
        pairs.sort_unstable();
        let candidates = CandidateSet { pairs };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bands = self.config.bands,
            rows = self.config.rows(),
            unique_pairs = candidates.len(),
            "lsh banding complete"
        );

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(raw: &[&[&str]]) -> Vec<TermSet> {
        raw.iter().map(|s| s.iter().copied().collect()).collect()
    }

    #[test]
    fn test_validate() {
        assert!(LshConfig::new(100, 20).validate().is_ok());
        assert!(LshConfig::new(0, 1).validate().is_err());
        assert!(LshConfig::new(10, 0).validate().is_err());
        assert!(LshConfig::new(10, 3).validate().is_err());
        assert!(LshBanding::new(LshConfig::new(10, 3)).is_err());
    }

    #[test]
    fn test_rows_and_probability() {
        let config = LshConfig::from_rows(5, 20);
        assert_eq!(config.num_hashes, 100);
        assert_eq!(config.rows(), 5);

        assert_eq!(config.candidate_probability(0.0), 0.0);
        assert_eq!(config.candidate_probability(1.0), 1.0);
        let p_low = config.candidate_probability(0.2);
        let p_high = config.candidate_probability(0.8);
        assert!(p_low < 0.1);
        assert!(p_high > 0.99);

        let t = config.similarity_threshold();
        assert!(t > 0.4 && t < 0.7, "threshold {}", t);
    }

    #[test]
    fn test_identical_sets_always_collide() {
        let banding = LshBanding::new(LshConfig::new(20, 10)).unwrap();
        let terms = sets(&[&["x", "y"], &["p", "q", "r"], &["x", "y"]]);
        let candidates = banding.candidates(&terms);
        assert!(candidates.contains(0, 2));
    }

    #[test]
    fn test_empty_term_sets_skipped() {
        let banding = LshBanding::new(LshConfig::new(20, 10)).unwrap();
        let terms = sets(&[&[], &[], &["x"]]);
        let signatures = banding.signatures(&terms);
        assert!(signatures[0].is_none());
        assert!(signatures[2].is_some());
        assert!(banding.candidates(&terms).is_empty());
    }

    #[test]
    fn test_buckets_ordered() {
        let banding = LshBanding::new(LshConfig::new(4, 4)).unwrap();
        let terms = sets(&[&["a"], &["b"], &["a"], &["b"], &["c"]]);
        let signatures = banding.signatures(&terms);
        let buckets = banding.buckets(&signatures, 0);
        assert_eq!(buckets, vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn test_more_bands_never_lose_candidates() {
        let terms = sets(&[
            &["a", "b", "c", "d"],
            &["a", "b", "c", "e"],
            &["a", "f", "g", "h"],
            &["b", "c", "d", "e"],
            &["x", "y", "z", "a"],
        ]);
        let mut previous = CandidateSet::default();
        for bands in 1..=12 {
            let config = LshConfig::from_rows(3, bands).with_seed(11);
            let current = LshBanding::new(config).unwrap().candidates(&terms);
            assert!(previous.is_subset(&current), "bands={}", bands);
            previous = current;
        }
    }

    #[test]
    fn test_bounded_candidates_stop_at_limit() {
        // Two hundred million pairs share the single bucket if enumerated in full
        let terms: Vec<TermSet> = (0..20_000).map(|_| ["x"].into_iter().collect()).collect();
        let banding = LshBanding::new(LshConfig::new(4, 4)).unwrap();

        let capped = banding.bounded_candidates(&terms, Some(10));
        assert_eq!(capped.len(), 10);
        assert!(capped.iter().all(|p| p.second == p.first + 1));
    }

    #[test]
    fn test_bounded_candidates_subset_of_unbounded() {
        let terms = sets(&[
            &["a", "b", "c"],
            &["a", "b", "c"],
            &["a", "b", "c"],
            &["a", "b", "d"],
            &["p", "q"],
            &["p", "q"],
        ]);
        let banding = LshBanding::new(LshConfig::new(20, 10)).unwrap();
        let full = banding.candidates(&terms);

        for max in 0..=full.len() + 2 {
            let capped = banding.bounded_candidates(&terms, Some(max));
            assert_eq!(capped.len(), max.min(full.len()));
            assert!(capped.is_subset(&full));
        }
        assert_eq!(banding.bounded_candidates(&terms, None), full);
    }
}
