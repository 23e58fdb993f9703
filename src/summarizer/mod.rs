//! Summarization components
//!
//! Picks the highest-ranked sentences for an extractive summary.

pub mod selector;
