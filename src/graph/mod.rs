//! Graph construction and representation
//!
//! This module builds the weighted, undirected ranking graph for both modes
//! (sentence overlap and word adjacency) and stores it in CSR form for
//! PageRank.

pub mod builder;
pub mod csr;
pub mod overlap;
