//! Top-n sentence selection for summarization
//!
//! Sentences are chosen by PageRank score, ties going to the sentence that
//! appears first. The chosen set can then be reported in score order or in
//! document order; the set itself never depends on that choice.

use crate::errors::{Result, TextRankError};
use crate::pagerank::PageRankResult;
use crate::types::SentenceUnit;
use serde::Serialize;

/// Configuration for sentence selection
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Number of sentences to select
    pub num_sentences: usize,
    /// Report the selection in document order instead of score order
    pub keep_original_order: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            num_sentences: 3,
            keep_original_order: false,
        }
    }
}

/// A selected sentence with its scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedSentence {
    /// Caller-supplied sentence id
    pub id: String,
    /// Sentence text
    pub text: String,
    /// PageRank score
    pub score: f64,
    /// 1-based rank by score
    pub rank: usize,
    /// Position of the sentence in the input
    pub index: usize,
}

/// Score-based sentence selector
#[derive(Debug, Clone, Default)]
pub struct SentenceSelector {
    config: SelectorConfig,
}

impl SentenceSelector {
    /// Create a new selector with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Set number of sentences to select
    pub fn with_num_sentences(mut self, n: usize) -> Self {
        self.config.num_sentences = n;
        self
    }

    /// Report sentences in document order
    pub fn with_keep_original_order(mut self, keep: bool) -> Self {
        self.config.keep_original_order = keep;
        self
    }

    /// Validate the selector settings
    pub fn validate(&self) -> Result<()> {
        if self.config.num_sentences == 0 {
            return Err(TextRankError::invalid_config("num_sentences must be > 0"));
        }
        Ok(())
    }

    /// Positions of the selected sentences.
    ///
    /// Asking for more sentences than exist returns all of them.
    pub fn select_indices(&self, scores: &[f64]) -> Result<Vec<usize>> {
        self.validate()?;

        let mut chosen: Vec<usize> = (0..scores.len()).collect();
        // Stable sort: equal scores keep input order
        chosen.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        chosen.truncate(self.config.num_sentences);

        if self.config.keep_original_order {
            chosen.sort_unstable();
        }
        Ok(chosen)
    }

    /// Select sentences for a summary.
    ///
    /// `pagerank` must score the units in the order they were supplied to the
    /// graph builder.
    pub fn select(
        &self,
        units: &[SentenceUnit],
        pagerank: &PageRankResult,
    ) -> Result<Vec<SelectedSentence>> {
        if units.len() != pagerank.scores.len() {
            return Err(TextRankError::length_mismatch(
                "sentence scores",
                units.len(),
                pagerank.scores.len(),
            ));
        }

        let ranks = rank_positions(&pagerank.scores);
        let chosen = self.select_indices(&pagerank.scores)?;

        Ok(chosen
            .into_iter()
            .map(|i| SelectedSentence {
                id: units[i].id.clone(),
                text: units[i].text.clone(),
                score: pagerank.scores[i],
                rank: ranks[i],
                index: i,
            })
            .collect())
    }
}

/// 1-based rank of every position, ties by position
pub(crate) fn rank_positions(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    let mut ranks = vec![0; scores.len()];
    for (rank, i) in order.into_iter().enumerate() {
        ranks[i] = rank + 1;
    }
    ranks
}
