//! # textrank_lsh
//!
//! Graph-based extractive summarization and keyword extraction.
//!
//! Sentences (linked by term overlap) or words (linked by adjacency) become
//! the vertices of a weighted graph that is ranked with PageRank. For large
//! inputs, MinHash signatures and LSH banding restrict the sentence pairs that
//! are compared at all.
//!
//! ## Stages
//!
//! - **Candidates**: exhaustive pairs or MinHash/LSH buckets ([`candidates`])
//! - **Graph**: weighted undirected graph in CSR form ([`graph`])
//! - **PageRank**: power iteration with dangling-mass redistribution ([`pagerank`])
//! - **Selection**: top-n sentences or merged keywords ([`summarizer`], [`phrase`])
//!
//! Tokenization, lemmatization and tagging happen upstream; this crate starts
//! from term sets and `(unit-id, token, relevant)` tuples.

pub mod candidates;
pub mod errors;
pub mod graph;
pub mod pagerank;
pub mod phrase;
pub mod summarizer;
pub mod textrank;
pub mod types;

// Re-export commonly used types
pub use errors::{Result, TextRankError};
pub use types::{KeepVertices, SentenceUnit, TaggedToken, TermSet, TextRankConfig};

// Re-export main functionality
pub use candidates::{
    build_candidates,
    lsh::{LshBanding, LshConfig},
    minhash::{MinHashSignature, MinHasher},
    CandidatePair, CandidateSet, CandidateStrategy,
};
pub use graph::{
    builder::GraphBuilder,
    csr::{CsrGraph, WeightedEdge},
    overlap::{JaccardOverlap, NormalizedOverlap, Overlap},
};
pub use pagerank::{standard::StandardPageRank, PageRankResult};
pub use phrase::keywords::{Keyword, KeywordExtractor, RankedWord, TermFrequency};
pub use summarizer::selector::{SelectedSentence, SentenceSelector};
pub use textrank::{
    keywords::{extract_keywords, KeywordResult, TextRankKeywords},
    sentences::{summarize_sentences, RankedSentence, SentenceEdge, SentenceRanking, TextRankSentences},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
