//! Core types for textrank_lsh
//!
//! This module defines the data structures shared by every stage: term sets,
//! sentence units, tagged tokens, and the ranking configuration.

use crate::candidates::CandidateStrategy;
use crate::errors::{Result, TextRankError};
use crate::pagerank::standard::StandardPageRank;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

// ============================================================================
// Term sets
// ============================================================================

/// The deduplicated set of relevant terms attached to one unit.
///
/// Multiplicity and order are irrelevant: inserting a term twice keeps one copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSet {
    terms: FxHashSet<String>,
}

impl TermSet {
    /// Create an empty term set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term, returning whether it was new
    pub fn insert(&mut self, term: impl Into<String>) -> bool {
        self.terms.insert(term.into())
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if the set has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check membership
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// Iterate over the terms (unspecified order)
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|s| s.as_str())
    }

    /// Size of the intersection with another set
    pub fn intersection_count(&self, other: &TermSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.terms.iter().filter(|t| large.terms.contains(*t)).count()
    }

    /// Size of the union with another set
    pub fn union_count(&self, other: &TermSet) -> usize {
        self.len() + other.len() - self.intersection_count(other)
    }

    /// Terms in sorted order (deterministic view for display and tests)
    pub fn sorted(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.iter().collect();
        terms.sort_unstable();
        terms
    }
}

impl<S: Into<String>> FromIterator<S> for TermSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Units and tokens
// ============================================================================

/// A sentence to rank: caller-supplied id, raw text, and its relevant terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceUnit {
    /// Opaque id, unique within one ranking run
    pub id: String,
    /// The raw sentence text
    pub text: String,
    /// Relevant terms (e.g. noun and adjective lemmas)
    pub terms: TermSet,
}

impl SentenceUnit {
    /// Create a new sentence unit
    pub fn new(id: impl Into<String>, text: impl Into<String>, terms: TermSet) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            terms,
        }
    }

    /// Join `(unit_id, text)` sentences with a tagged token stream.
    ///
    /// Every relevant token is added to the term set of the sentence it names.
    /// Sentences keep their input order; sentences with no relevant token get an
    /// empty term set. Duplicate sentence ids and tokens naming an unknown
    /// sentence are errors.
    pub fn from_tagged_tokens<I, S, T>(sentences: I, tokens: &[TaggedToken]) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut units: Vec<SentenceUnit> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();

        for (id, text) in sentences {
            let id = id.into();
            if index.contains_key(&id) {
                return Err(TextRankError::duplicate_unit(id));
            }
            index.insert(id.clone(), units.len());
            units.push(SentenceUnit::new(id, text, TermSet::new()));
        }

        for token in tokens {
            let Some(&i) = index.get(token.unit_id.as_str()) else {
                return Err(TextRankError::unknown_unit(token.unit_id.clone()));
            };
            if token.relevant {
                units[i].terms.insert(token.token.as_str());
            }
        }

        Ok(units)
    }
}

/// One `(unit-id, token, relevance-flag)` tuple produced by the caller's
/// linguistic preprocessing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    /// Id of the sentence this token belongs to
    pub unit_id: String,
    /// Token text (typically the lemma)
    pub token: String,
    /// Whether the token takes part in ranking
    pub relevant: bool,
}

impl TaggedToken {
    /// Create a new tagged token
    pub fn new(unit_id: impl Into<String>, token: impl Into<String>, relevant: bool) -> Self {
        Self {
            unit_id: unit_id.into(),
            token: token.into(),
            relevant,
        }
    }
}

// ============================================================================
// Keyword vertex retention
// ============================================================================

/// How many ranked word vertices count as "important" in keyword mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepVertices {
    /// Keep the top fraction of vertices; must lie in (0, 1]
    Fraction(f64),
    /// Keep the top `k` vertices; must be at least 1
    Count(usize),
}

impl Default for KeepVertices {
    fn default() -> Self {
        KeepVertices::Fraction(1.0 / 3.0)
    }
}

impl KeepVertices {
    /// Validate the retention setting
    pub fn validate(&self) -> Result<()> {
        match *self {
            KeepVertices::Fraction(p) if !(p > 0.0 && p <= 1.0) => {
                Err(TextRankError::invalid_config(format!(
                    "keep fraction must be in (0, 1], got {}",
                    p
                )))
            }
            KeepVertices::Count(0) => Err(TextRankError::invalid_config("keep count must be > 0")),
            _ => Ok(()),
        }
    }

    /// Number of vertices retained out of `total`.
    ///
    /// Fractions round up, so any non-empty vertex set keeps at least one word.
    pub fn resolve(&self, total: usize) -> usize {
        match *self {
            KeepVertices::Fraction(p) => ((total as f64 * p).ceil() as usize).min(total),
            KeepVertices::Count(k) => k.min(total),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a full ranking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRankConfig {
    /// Damping factor for PageRank (typically 0.85)
    pub damping: f64,
    /// Maximum iterations for PageRank convergence
    pub max_iterations: usize,
    /// Convergence threshold on the L1 delta between iterations
    pub convergence_threshold: f64,
    /// Candidate pair generation policy (sentence mode only)
    pub candidates: CandidateStrategy,
    /// Upper bound on the number of sentence pairs compared
    pub max_candidates: Option<usize>,
    /// Number of sentences in a summary
    pub num_sentences: usize,
    /// Return summary sentences in document order instead of score order
    pub keep_original_order: bool,
    /// Which ranked words count as important (keyword mode)
    pub keep: KeepVertices,
    /// Longest keyword, in tokens; `None` means unbounded
    pub ngram_max: Option<usize>,
    /// Separator placed between the words of a multi-word keyword
    pub separator: String,
}

impl Default for TextRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 30,
            convergence_threshold: 1e-4,
            candidates: CandidateStrategy::Exhaustive,
            max_candidates: None,
            num_sentences: 3,
            keep_original_order: false,
            keep: KeepVertices::default(),
            ngram_max: None,
            separator: "-".to_string(),
        }
    }
}

impl TextRankConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.pagerank().validate()?;

        if self.num_sentences == 0 {
            return Err(TextRankError::invalid_config("num_sentences must be > 0"));
        }

        if self.max_candidates == Some(0) {
            return Err(TextRankError::invalid_config("max_candidates must be > 0"));
        }

        if self.ngram_max == Some(0) {
            return Err(TextRankError::invalid_config("ngram_max must be > 0"));
        }

        self.keep.validate()?;
        self.candidates.validate()?;

        Ok(())
    }

    /// The PageRank solver described by this configuration
    pub fn pagerank(&self) -> StandardPageRank {
        StandardPageRank::new()
            .with_damping(self.damping)
            .with_max_iterations(self.max_iterations)
            .with_threshold(self.convergence_threshold)
    }

    /// Builder method: set damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Builder method: set max iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method: set convergence threshold
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Builder method: set candidate strategy
    pub fn with_candidates(mut self, candidates: CandidateStrategy) -> Self {
        self.candidates = candidates;
        self
    }

    /// Builder method: cap the number of compared sentence pairs
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = Some(max);
        self
    }

    /// Builder method: set summary length
    pub fn with_num_sentences(mut self, n: usize) -> Self {
        self.num_sentences = n;
        self
    }

    /// Builder method: keep summary sentences in document order
    pub fn with_keep_original_order(mut self, keep: bool) -> Self {
        self.keep_original_order = keep;
        self
    }

    /// Builder method: set important-vertex retention
    pub fn with_keep(mut self, keep: KeepVertices) -> Self {
        self.keep = keep;
        self
    }

    /// Builder method: cap keyword length
    pub fn with_ngram_max(mut self, ngram_max: usize) -> Self {
        self.ngram_max = Some(ngram_max);
        self
    }

    /// Builder method: set keyword separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::lsh::LshConfig;

    #[test]
    fn test_term_set_dedup_and_overlap() {
        let a: TermSet = ["cat", "dog", "dog"].into_iter().collect();
        let b: TermSet = ["dog", "bird"].into_iter().collect();

        assert_eq!(a.len(), 2);
        assert_eq!(a.intersection_count(&b), 1);
        assert_eq!(b.intersection_count(&a), 1);
        assert_eq!(a.union_count(&b), 3);
        assert_eq!(a.sorted(), vec!["cat", "dog"]);
    }

    #[test]
    fn test_from_tagged_tokens() {
        let tokens = vec![
            TaggedToken::new("s1", "cat", true),
            TaggedToken::new("s1", "the", false),
            TaggedToken::new("s1", "cat", true),
            TaggedToken::new("s2", "dog", true),
        ];
        let units = SentenceUnit::from_tagged_tokens(
            vec![("s1", "The cat."), ("s2", "A dog."), ("s3", "Nothing here.")],
            &tokens,
        )
        .unwrap();

        assert_eq!(units.len(), 3);
        assert_eq!(units[0].terms.sorted(), vec!["cat"]);
        assert_eq!(units[1].terms.sorted(), vec!["dog"]);
        assert!(units[2].terms.is_empty());
    }

    #[test]
    fn test_from_tagged_tokens_errors() {
        let dup = SentenceUnit::from_tagged_tokens(vec![("s1", "a"), ("s1", "b")], &[]);
        assert_eq!(dup.unwrap_err(), TextRankError::duplicate_unit("s1"));

        let tokens = vec![TaggedToken::new("s9", "cat", true)];
        let unknown = SentenceUnit::from_tagged_tokens(vec![("s1", "a")], &tokens);
        assert_eq!(unknown.unwrap_err(), TextRankError::unknown_unit("s9"));
    }

    #[test]
    fn test_keep_vertices() {
        assert!(KeepVertices::Fraction(0.0).validate().is_err());
        assert!(KeepVertices::Fraction(1.5).validate().is_err());
        assert!(KeepVertices::Fraction(f64::NAN).validate().is_err());
        assert!(KeepVertices::Fraction(1.0).validate().is_ok());
        assert!(KeepVertices::Count(0).validate().is_err());

        assert_eq!(KeepVertices::default().resolve(9), 3);
        assert_eq!(KeepVertices::default().resolve(10), 4);
        assert_eq!(KeepVertices::default().resolve(1), 1);
        assert_eq!(KeepVertices::Count(5).resolve(2), 2);
    }

    #[test]
    fn test_threshold_rule_matches_solver() {
        for threshold in [0.0, 1e-4, -1e-3, f64::NAN] {
            let config = TextRankConfig::default().with_convergence_threshold(threshold);
            assert_eq!(
                config.validate().is_ok(),
                config.pagerank().validate().is_ok(),
                "threshold {}",
                threshold
            );
        }
        // Zero runs to the iteration cap
        assert!(TextRankConfig::default()
            .with_convergence_threshold(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(TextRankConfig::default().validate().is_ok());
        assert!(TextRankConfig::default().with_damping(1.5).validate().is_err());
        assert!(TextRankConfig::default().with_max_iterations(0).validate().is_err());
        assert!(TextRankConfig::default()
            .with_convergence_threshold(-1e-3)
            .validate()
            .is_err());
        assert!(TextRankConfig::default().with_num_sentences(0).validate().is_err());
        assert!(TextRankConfig::default().with_ngram_max(0).validate().is_err());
        assert!(TextRankConfig::default()
            .with_keep(KeepVertices::Fraction(2.0))
            .validate()
            .is_err());

        let bad_lsh = CandidateStrategy::MinHashLsh(LshConfig::new(10, 3));
        assert!(TextRankConfig::default()
            .with_candidates(bad_lsh)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_json() {
        let config = TextRankConfig::from_json(r#"{"damping": 0.5, "separator": " "}"#).unwrap();
        assert_eq!(config.damping, 0.5);
        assert_eq!(config.separator, " ");
        assert_eq!(config.max_iterations, 30);

        let json = TextRankConfig::default()
            .with_candidates(CandidateStrategy::MinHashLsh(LshConfig::new(100, 20)))
            .to_json()
            .unwrap();
        let parsed = TextRankConfig::from_json(&json).unwrap();
        assert_eq!(
            parsed.candidates,
            CandidateStrategy::MinHashLsh(LshConfig::new(100, 20))
        );

        assert!(TextRankConfig::from_json(r#"{"damping": 3.0}"#).is_err());
        assert!(matches!(
            TextRankConfig::from_json("{").unwrap_err(),
            TextRankError::Serialization { .. }
        ));
    }
}
