//! Sentence ranking and summarization
//!
//! Sentences are linked by the overlap of their term sets and ranked with
//! PageRank. With the MinHash/LSH strategy only sentence pairs that collide
//! in some band are compared, which keeps large documents tractable.

use super::trace_stage;
use crate::candidates::build_candidates;
use crate::errors::Result;
use crate::graph::builder::GraphBuilder;
use crate::graph::csr::CsrGraph;
use crate::graph::overlap::{NormalizedOverlap, Overlap};
use crate::pagerank::PageRankResult;
use crate::summarizer::selector::{rank_positions, SelectedSentence, SentenceSelector};
use crate::types::{SentenceUnit, TermSet, TextRankConfig};
use serde::Serialize;

/// A sentence with its PageRank score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSentence {
    pub id: String,
    pub text: String,
    pub score: f64,
    /// 1-based rank by score
    pub rank: usize,
}

/// A weighted link between two sentences
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceEdge {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

/// Output of a sentence ranking run
#[derive(Debug, Clone, Serialize)]
pub struct SentenceRanking {
    /// Sentences in input order
    pub sentences: Vec<RankedSentence>,
    /// Graph edges, each undirected edge once
    pub edges: Vec<SentenceEdge>,
    /// Number of pairs whose overlap was computed
    pub candidate_pairs: usize,
    /// Solver output, including the convergence flag
    pub pagerank: PageRankResult,
}

impl SentenceRanking {
    /// The `n` best sentences, by score or in document order
    pub fn summary(&self, n: usize, keep_original_order: bool) -> Result<Vec<SelectedSentence>> {
        let chosen = SentenceSelector::new()
            .with_num_sentences(n)
            .with_keep_original_order(keep_original_order)
            .select_indices(&self.pagerank.scores)?;

        Ok(chosen
            .into_iter()
            .map(|i| {
                let sentence = &self.sentences[i];
                SelectedSentence {
                    id: sentence.id.clone(),
                    text: sentence.text.clone(),
                    score: sentence.score,
                    rank: sentence.rank,
                    index: i,
                }
            })
            .collect())
    }

    /// Serialize the ranking to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Sentence ranker
#[derive(Debug, Clone, Default)]
pub struct TextRankSentences {
    config: TextRankConfig,
}

impl TextRankSentences {
    /// Create a ranker with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: TextRankConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &TextRankConfig {
        &self.config
    }

    /// Rank sentences using the normalized term overlap
    pub fn rank(&self, units: &[SentenceUnit]) -> Result<SentenceRanking> {
        self.rank_with(units, &NormalizedOverlap)
    }

    /// Rank sentences using a custom overlap strategy
    pub fn rank_with<O>(&self, units: &[SentenceUnit], overlap: &O) -> Result<SentenceRanking>
    where
        O: Overlap + ?Sized,
    {
        self.config.validate()?;

        let candidates = {
            trace_stage!("candidates");
            let term_sets: Vec<TermSet> = units.iter().map(|u| u.terms.clone()).collect();
            build_candidates(
                &term_sets,
                &self.config.candidates,
                self.config.max_candidates,
            )?
        };

        let graph = {
            trace_stage!("graph");
            let builder = GraphBuilder::from_sentences(units, Some(&candidates), overlap)?;
            CsrGraph::from_builder(&builder)
        };

        let pagerank = {
            trace_stage!("pagerank");
            self.config.pagerank().run(&graph)?
        };

        let ranks = rank_positions(&pagerank.scores);
        let sentences = units
            .iter()
            .zip(&pagerank.scores)
            .zip(ranks)
            .map(|((unit, &score), rank)| RankedSentence {
                id: unit.id.clone(),
                text: unit.text.clone(),
                score,
                rank,
            })
            .collect();

        let edges = graph
            .undirected_edges()
            .into_iter()
            .map(|e| SentenceEdge {
                from: graph.label(e.a).to_string(),
                to: graph.label(e.b).to_string(),
                weight: e.weight,
            })
            .collect();

        Ok(SentenceRanking {
            sentences,
            edges,
            candidate_pairs: candidates.len(),
            pagerank,
        })
    }

    /// Rank and summarize using the configured summary length and order
    pub fn summarize(&self, units: &[SentenceUnit]) -> Result<Vec<SelectedSentence>> {
        let ranking = self.rank(units)?;
        trace_stage!("select");
        ranking.summary(self.config.num_sentences, self.config.keep_original_order)
    }
}

/// Convenience function to summarize sentences
pub fn summarize_sentences(
    units: &[SentenceUnit],
    config: &TextRankConfig,
) -> Result<Vec<SelectedSentence>> {
    TextRankSentences::with_config(config.clone()).summarize(units)
}
