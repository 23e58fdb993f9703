//! Keyword merging and aggregation
//!
//! The top-ranked words are marked important. Every maximal run of adjacent
//! tokens that are both relevant and important becomes one keyword whose
//! `ngram` is the run length; identical keywords are counted across the
//! document.
//!
//! With `ngram_max` set, a run longer than the cap is cut left to right into
//! consecutive keywords of at most `ngram_max` tokens.

use crate::errors::{Result, TextRankError};
use crate::graph::csr::CsrGraph;
use crate::pagerank::PageRankResult;
use crate::summarizer::selector::rank_positions;
use crate::types::KeepVertices;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Configuration for keyword extraction
#[derive(Debug, Clone)]
pub struct KeywordConfig {
    /// Which ranked words count as important
    pub keep: KeepVertices,
    /// Longest keyword in tokens; `None` means unbounded
    pub ngram_max: Option<usize>,
    /// Joins the words of a multi-word keyword
    pub separator: String,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            keep: KeepVertices::default(),
            ngram_max: None,
            separator: "-".to_string(),
        }
    }
}

/// One row of the keyword table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    /// Words joined by the separator
    pub keyword: String,
    /// Number of words
    pub ngram: usize,
    /// Number of occurrences in the document
    pub freq: usize,
}

/// Frequency of a relevant word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermFrequency {
    pub term: String,
    pub freq: usize,
}

/// A word vertex with its PageRank score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedWord {
    pub word: String,
    pub score: f64,
    /// 1-based rank by score
    pub rank: usize,
}

/// Keyword extractor
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    config: KeywordConfig,
}

impl KeywordExtractor {
    /// Create an extractor with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: KeywordConfig) -> Self {
        Self { config }
    }

    /// Set important-vertex retention
    pub fn with_keep(mut self, keep: KeepVertices) -> Self {
        self.config.keep = keep;
        self
    }

    /// Cap keyword length
    pub fn with_ngram_max(mut self, ngram_max: usize) -> Self {
        self.config.ngram_max = Some(ngram_max);
        self
    }

    /// Set keyword separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.config.separator = separator.into();
        self
    }

    /// Validate the extractor settings
    pub fn validate(&self) -> Result<()> {
        self.config.keep.validate()?;
        if self.config.ngram_max == Some(0) {
            return Err(TextRankError::invalid_config("ngram_max must be > 0"));
        }
        Ok(())
    }

    /// Mark the important word vertices of `graph`
    pub fn important_vertices(&self, graph: &CsrGraph, pagerank: &PageRankResult) -> Vec<bool> {
        let keep = self.config.keep.resolve(graph.num_nodes);
        let mut important = vec![false; graph.num_nodes];
        for node in pagerank.ranking().into_iter().take(keep) {
            important[node as usize] = true;
        }
        important
    }

    /// Build the keyword table.
    ///
    /// Rows are ordered by descending `freq`, ties by first occurrence.
    pub fn extract<S: AsRef<str>>(
        &self,
        words: &[S],
        relevant: &[bool],
        graph: &CsrGraph,
        pagerank: &PageRankResult,
    ) -> Result<Vec<Keyword>> {
        self.validate()?;
        if words.len() != relevant.len() {
            return Err(TextRankError::length_mismatch(
                "relevance flags",
                words.len(),
                relevant.len(),
            ));
        }
        if pagerank.scores.len() != graph.num_nodes {
            return Err(TextRankError::length_mismatch(
                "word scores",
                graph.num_nodes,
                pagerank.scores.len(),
            ));
        }

        let important = self.important_vertices(graph, pagerank);
        let node_ids: FxHashMap<&str, usize> = graph
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();

        let is_hit = |i: usize| {
            relevant[i]
                && node_ids
                    .get(words[i].as_ref())
                    .is_some_and(|&node| important[node])
        };

        let max_len = self.config.ngram_max.unwrap_or(usize::MAX);
        let mut rows: Vec<Keyword> = Vec::new();
        let mut row_index: FxHashMap<String, usize> = FxHashMap::default();

        let mut i = 0;
        while i < words.len() {
            if !is_hit(i) {
                i += 1;
                continue;
            }

            let start = i;
            while i < words.len() && i - start < max_len && is_hit(i) {
                i += 1;
            }

            let keyword = words[start..i]
                .iter()
                .map(|w| w.as_ref())
                .collect::<Vec<_>>()
                .join(self.config.separator.as_str());

            match row_index.get(&keyword) {
                Some(&row) => rows[row].freq += 1,
                None => {
                    row_index.insert(keyword.clone(), rows.len());
                    rows.push(Keyword {
                        keyword,
                        ngram: i - start,
                        freq: 1,
                    });
                }
            }
        }

        // Stable sort: equal frequencies keep first-occurrence order
        rows.sort_by(|a, b| b.freq.cmp(&a.freq));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            important = important.iter().filter(|&&x| x).count(),
            keywords = rows.len(),
            "merged keywords"
        );

        Ok(rows)
    }
}

/// Frequency table of the relevant words, by descending frequency then first
/// occurrence
pub fn term_frequencies<S: AsRef<str>>(words: &[S], relevant: &[bool]) -> Result<Vec<TermFrequency>> {
    if words.len() != relevant.len() {
        return Err(TextRankError::length_mismatch(
            "relevance flags",
            words.len(),
            relevant.len(),
        ));
    }

    let mut rows: Vec<TermFrequency> = Vec::new();
    let mut row_index: FxHashMap<&str, usize> = FxHashMap::default();
    for (word, _) in words.iter().zip(relevant).filter(|(_, is_relevant)| **is_relevant) {
        let word = word.as_ref();
        match row_index.get(word) {
            Some(&row) => rows[row].freq += 1,
            None => {
                row_index.insert(word, rows.len());
                rows.push(TermFrequency {
                    term: word.to_string(),
                    freq: 1,
                });
            }
        }
    }

    rows.sort_by(|a, b| b.freq.cmp(&a.freq));
    Ok(rows)
}

/// Word vertices ordered by descending score
pub fn ranked_words(graph: &CsrGraph, pagerank: &PageRankResult) -> Vec<RankedWord> {
    let ranks = rank_positions(&pagerank.scores);
    pagerank
        .ranking()
        .into_iter()
        .map(|node| RankedWord {
            word: graph.label(node).to_string(),
            score: pagerank.score(node),
            rank: ranks[node as usize],
        })
        .collect()
}
