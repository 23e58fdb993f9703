//! Keyword extraction components
//!
//! Turns ranked word vertices back into multi-word keywords by walking the
//! original token sequence.

pub mod keywords;
