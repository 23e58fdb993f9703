//! End-to-end ranking runners
//!
//! - [`sentences::TextRankSentences`]: candidates → overlap graph → PageRank → summary
//! - [`keywords::TextRankKeywords`]: adjacency graph → PageRank → keyword table

/// Enter a tracing span for one ranking stage; it closes at the end of the
/// enclosing block. A no-op without the `tracing` feature.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("textrank_stage", stage = $name).entered();
    };
}

pub(crate) use trace_stage;

pub mod keywords;
pub mod sentences;
