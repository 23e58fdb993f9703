//! Keyword extraction
//!
//! Relevant words are linked when they appear next to each other, ranked with
//! PageRank, and the top words are merged back into multi-word keywords.

use super::trace_stage;
use crate::errors::Result;
use crate::graph::builder::GraphBuilder;
use crate::graph::csr::CsrGraph;
use crate::pagerank::PageRankResult;
use crate::phrase::keywords::{
    ranked_words, term_frequencies, Keyword, KeywordConfig, KeywordExtractor, RankedWord,
    TermFrequency,
};
use crate::types::{TaggedToken, TextRankConfig};
use serde::Serialize;

/// Output of a keyword extraction run
#[derive(Debug, Clone, Serialize)]
pub struct KeywordResult {
    /// Merged keywords by descending frequency
    pub keywords: Vec<Keyword>,
    /// Relevant word frequencies
    pub terms: Vec<TermFrequency>,
    /// Word vertices by descending score
    pub words: Vec<RankedWord>,
    /// Solver output, including the convergence flag
    pub pagerank: PageRankResult,
}

impl KeywordResult {
    /// Serialize the result to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Keyword extractor over a tagged token sequence
#[derive(Debug, Clone, Default)]
pub struct TextRankKeywords {
    config: TextRankConfig,
}

impl TextRankKeywords {
    /// Create an extractor with default config
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

    /// Extract keywords from words in document order and their relevance flags
    pub fn extract<S: AsRef<str>>(&self, words: &[S], relevant: &[bool]) -> Result<KeywordResult> {
        self.config.validate()?;

        let graph = {
            trace_stage!("graph");
            CsrGraph::from_builder(&GraphBuilder::from_keywords(words, relevant)?)
        };

        let pagerank = {
            trace_stage!("pagerank");
            self.config.pagerank().run(&graph)?
        };

        trace_stage!("keywords");
        let extractor = KeywordExtractor::with_config(KeywordConfig {
            keep: self.config.keep,
            ngram_max: self.config.ngram_max,
            separator: self.config.separator.clone(),
        });
        let keywords = extractor.extract(words, relevant, &graph, &pagerank)?;

        Ok(KeywordResult {
            keywords,
            terms: term_frequencies(words, relevant)?,
            words: ranked_words(&graph, &pagerank),
            pagerank,
        })
    }

    /// Extract keywords from `(unit-id, token, relevant)` tuples in document order
    pub fn extract_tagged(&self, tokens: &[TaggedToken]) -> Result<KeywordResult> {
        let words: Vec<&str> = tokens.iter().map(|t| t.token.as_str()).collect();
        let relevant: Vec<bool> = tokens.iter().map(|t| t.relevant).collect();
        self.extract(&words, &relevant)
    }
}

/// Convenience function to extract the keyword table
pub fn extract_keywords<S: AsRef<str>>(
    words: &[S],
    relevant: &[bool],
    config: &TextRankConfig,
) -> Result<Vec<Keyword>> {
    Ok(TextRankKeywords::with_config(config.clone())
        .extract(words, relevant)?
        .keywords)
}
