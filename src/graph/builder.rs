//! Graph builder with efficient edge handling
//!
//! This module provides a mutable graph builder that uses FxHashMap
//! for O(1) edge lookups during construction. Every edge is stored in both
//! directions, so the finished graph is undirected.

use super::overlap::Overlap;
use crate::candidates::{CandidatePair, CandidateSet};
use crate::errors::{Result, TextRankError};
use crate::types::SentenceUnit;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Below this many pairs, weights are computed sequentially
const PARALLEL_THRESHOLD: usize = 1000;

/// A node in the graph builder
#[derive(Debug, Clone)]
pub struct BuilderNode {
    /// Unit id (sentence mode) or word (keyword mode)
    pub label: String,
    /// Adjacency list: target node ID -> edge weight
    pub edges: FxHashMap<u32, f64>,
}

impl BuilderNode {
    /// Create a new node
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            edges: FxHashMap::default(),
        }
    }
}

/// A mutable graph builder optimized for incremental construction
#[derive(Debug)]
pub struct GraphBuilder {
    /// Maps label -> node ID
    label_to_id: FxHashMap<String, u32>,
    /// Node storage, in creation order
    nodes: Vec<BuilderNode>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a new empty graph builder
    pub fn new() -> Self {
        Self {
            label_to_id: FxHashMap::default(),
            nodes: Vec::new(),
        }
    }

    /// Create a graph builder with pre-allocated capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            label_to_id: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
        }
    }

    /// Get or create a node for the given label, returning its ID
    pub fn get_or_create_node(&mut self, label: &str) -> u32 {
        if let Some(&id) = self.label_to_id.get(label) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.label_to_id.insert(label.to_string(), id);
        self.nodes.push(BuilderNode::new(label));
        id
    }

    /// Create a node whose label must not exist yet
    pub fn add_unique_node(&mut self, label: &str) -> Result<u32> {
        if self.label_to_id.contains_key(label) {
            return Err(TextRankError::duplicate_unit(label));
        }
        Ok(self.get_or_create_node(label))
    }

    /// Increment the edge weight between two nodes
    ///
    /// Self loops and weights that are not strictly positive and finite are
    /// ignored.
    pub fn increment_edge(&mut self, from: u32, to: u32, weight: f64) {
        if from == to || !(weight > 0.0 && weight.is_finite()) {
            return;
        }

        // Add edge in both directions (undirected graph)
        if let Some(node) = self.nodes.get_mut(from as usize) {
            *node.edges.entry(to).or_insert(0.0) += weight;
        }
        if let Some(node) = self.nodes.get_mut(to as usize) {
            *node.edges.entry(from).or_insert(0.0) += weight;
        }
    }

    /// Build a sentence graph.
    ///
    /// Every unit becomes a node, in input order, whether or not it ends up
    /// with edges. Weights are computed by `overlap` for each candidate pair,
    /// or for every pair when `candidates` is `None`.
    pub fn from_sentences<O>(
        units: &[SentenceUnit],
        candidates: Option<&CandidateSet>,
        overlap: &O,
    ) -> Result<Self>
    where
        O: Overlap + ?Sized,
    {
        let mut builder = Self::with_capacity(units.len());
        for unit in units {
            builder.add_unique_node(&unit.id)?;
        }

        let all_pairs;
        let candidates = match candidates {
            Some(candidates) => candidates,
            None => {
                all_pairs = CandidateSet::all_pairs(units.len());
                &all_pairs
            }
        };

        if let Some(bad) = candidates
            .iter()
            .find(|p| p.second as usize >= units.len())
        {
            return Err(TextRankError::invalid_config(format!(
                "candidate pair ({}, {}) refers to a unit outside 0..{}",
                bad.first,
                bad.second,
                units.len()
            )));
        }

        let weigh = |pair: &CandidatePair| {
            let a = &units[pair.first as usize].terms;
            let b = &units[pair.second as usize].terms;
            (pair.first, pair.second, overlap.weight(a, b))
        };

        // Fragments come back in candidate order, so merging is deterministic
        let weighted: Vec<(u32, u32, f64)> = if candidates.len() < PARALLEL_THRESHOLD {
            candidates.iter().map(weigh).collect()
        } else {
            candidates.as_slice().par_iter().map(weigh).collect()
        };

        for (a, b, weight) in weighted {
            builder.increment_edge(a, b, weight);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = builder.node_count(),
            pairs = candidates.len(),
            edges = builder.edge_count(),
            "built sentence graph"
        );

        Ok(builder)
    }

    /// Build a word co-occurrence graph from a token sequence.
    ///
    /// Each distinct relevant word is a node. Adjacent relevant words are
    /// linked and the link weight grows by one per adjacency; an irrelevant
    /// word breaks adjacency.
    pub fn from_keywords<S: AsRef<str>>(words: &[S], relevant: &[bool]) -> Result<Self> {
        if words.len() != relevant.len() {
            return Err(TextRankError::length_mismatch(
                "relevance flags",
                words.len(),
                relevant.len(),
            ));
        }

        let mut builder = Self::new();
        let mut previous: Option<u32> = None;

        for (word, &is_relevant) in words.iter().zip(relevant) {
            if !is_relevant {
                previous = None;
                continue;
            }
            let node = builder.get_or_create_node(word.as_ref());
            if let Some(prev) = previous {
                builder.increment_edge(prev, node, 1.0);
            }
            previous = Some(node);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            tokens = words.len(),
            nodes = builder.node_count(),
            edges = builder.edge_count(),
            "built keyword graph"
        );

        Ok(builder)
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges (counting each undirected edge once)
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum::<usize>() / 2
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&BuilderNode> {
        self.nodes.get(id as usize)
    }

    /// Get a node ID by label
    pub fn get_node_id(&self, label: &str) -> Option<u32> {
        self.label_to_id.get(label).copied()
    }

    /// Get the label for a node ID
    pub fn get_label(&self, id: u32) -> Option<&str> {
        self.nodes.get(id as usize).map(|n| n.label.as_str())
    }

    /// Weight of the edge between two nodes, if any
    pub fn edge_weight(&self, a: u32, b: u32) -> Option<f64> {
        self.nodes
            .get(a as usize)
            .and_then(|n| n.edges.get(&b).copied())
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &BuilderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::overlap::{JaccardOverlap, NormalizedOverlap, Overlap};
    use crate::types::TermSet;

    fn unit(id: &str, terms: &[&str]) -> SentenceUnit {
        SentenceUnit::new(id, id, terms.iter().copied().collect::<TermSet>())
    }

    #[test]
    fn test_graph_builder_basic() {
        let mut builder = GraphBuilder::new();

        let id_a = builder.get_or_create_node("machine");
        let id_b = builder.get_or_create_node("learning");
        let id_c = builder.get_or_create_node("machine");

        assert_eq!(id_a, id_c);
        assert_ne!(id_a, id_b);
        assert_eq!(builder.node_count(), 2);
        assert!(builder.add_unique_node("machine").is_err());
    }

    #[test]
    fn test_edge_incrementing() {
        let mut builder = GraphBuilder::new();

        let id_a = builder.get_or_create_node("machine");
        let id_b = builder.get_or_create_node("learning");

        builder.increment_edge(id_a, id_b, 1.0);
        builder.increment_edge(id_b, id_a, 1.0);

        assert_eq!(builder.edge_weight(id_a, id_b), Some(2.0));
        assert_eq!(builder.edge_weight(id_b, id_a), Some(2.0));
        assert_eq!(builder.edge_count(), 1);
    }

    #[test]
    fn test_self_loops_and_nonpositive_weights_ignored() {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("a");
        let b = builder.get_or_create_node("b");

        builder.increment_edge(a, a, 1.0);
        builder.increment_edge(a, b, 0.0);
        builder.increment_edge(a, b, -1.0);
        builder.increment_edge(a, b, f64::NAN);

        assert!(builder.get_node(a).unwrap().edges.is_empty());
        assert_eq!(builder.edge_count(), 0);
    }

    #[test]
    fn test_sentence_graph_overlap() {
        let units = vec![
            unit("s1", &["cat", "dog"]),
            unit("s2", &["dog", "bird"]),
            unit("s3", &["fish"]),
        ];
        let builder = GraphBuilder::from_sentences(&units, None, &NormalizedOverlap).unwrap();

        assert_eq!(builder.node_count(), 3);
        assert_eq!(builder.edge_count(), 1);
        assert!(builder.edge_weight(0, 1).unwrap() > 0.0);
        assert!(builder.get_node(2).unwrap().edges.is_empty());
    }

    #[test]
    fn test_sentence_graph_respects_candidates() {
        let units = vec![
            unit("s1", &["a", "b"]),
            unit("s2", &["a", "b"]),
            unit("s3", &["a", "b"]),
        ];
        let candidates = CandidateSet::from_pairs(vec![(0, 2)]);
        let builder =
            GraphBuilder::from_sentences(&units, Some(&candidates), &JaccardOverlap).unwrap();

        assert_eq!(builder.edge_weight(0, 2), Some(1.0));
        assert_eq!(builder.edge_weight(0, 1), None);
        assert_eq!(builder.edge_weight(1, 2), None);
    }

    #[test]
    fn test_sentence_graph_parallel_weighting() {
        // 50 units give 1225 pairs, enough for the parallel path
        let units: Vec<SentenceUnit> = (0..50)
            .map(|i| {
                let terms = [
                    format!("a{}", i % 7),
                    format!("b{}", i % 5),
                    format!("c{}", i % 3),
                ];
                SentenceUnit::new(format!("s{}", i), "", terms.into_iter().collect())
            })
            .collect();
        let all_pairs = CandidateSet::all_pairs(units.len());
        assert!(all_pairs.len() >= PARALLEL_THRESHOLD);

        let builder = GraphBuilder::from_sentences(&units, None, &NormalizedOverlap).unwrap();

        let mut expected_edges = 0;
        for pair in &all_pairs {
            let a = &units[pair.first as usize].terms;
            let b = &units[pair.second as usize].terms;
            let weight = NormalizedOverlap.weight(a, b);
            if weight > 0.0 {
                expected_edges += 1;
                assert_eq!(builder.edge_weight(pair.first, pair.second), Some(weight));
                assert_eq!(builder.edge_weight(pair.second, pair.first), Some(weight));
            } else {
                assert_eq!(builder.edge_weight(pair.first, pair.second), None);
            }
        }
        assert_eq!(builder.edge_count(), expected_edges);
        assert!(expected_edges > 0);
    }

    #[test]
    fn test_sentence_graph_errors() {
        let dup = vec![unit("s1", &["a"]), unit("s1", &["a"])];
        assert!(GraphBuilder::from_sentences(&dup, None, &NormalizedOverlap).is_err());

        let units = vec![unit("s1", &["a"]), unit("s2", &["a"])];
        let out_of_range = CandidateSet::from_pairs(vec![(0, 5)]);
        assert!(
            GraphBuilder::from_sentences(&units, Some(&out_of_range), &NormalizedOverlap)
                .unwrap_err()
                .is_configuration_error()
        );
    }

    #[test]
    fn test_empty_sentence_graph() {
        let builder = GraphBuilder::from_sentences(&[], None, &NormalizedOverlap).unwrap();
        assert!(builder.is_empty());
    }

    #[test]
    fn test_keyword_graph_accumulates() {
        let words = ["machine", "learning", "is", "machine", "learning", "fun"];
        let relevant = [true, true, false, true, true, true];
        let builder = GraphBuilder::from_keywords(&words, &relevant).unwrap();

        let machine = builder.get_node_id("machine").unwrap();
        let learning = builder.get_node_id("learning").unwrap();
        let fun = builder.get_node_id("fun").unwrap();

        assert_eq!(builder.node_count(), 3);
        assert_eq!(builder.get_node_id("is"), None);
        assert_eq!(builder.edge_weight(machine, learning), Some(2.0));
        assert_eq!(builder.edge_weight(learning, fun), Some(1.0));
        assert_eq!(builder.edge_weight(machine, fun), None);
    }

    #[test]
    fn test_keyword_graph_separator_breaks_adjacency() {
        let words = ["deep", "and", "wide"];
        let builder = GraphBuilder::from_keywords(&words, &[true, false, true]).unwrap();
        assert_eq!(builder.node_count(), 2);
        assert_eq!(builder.edge_count(), 0);
    }

    #[test]
    fn test_keyword_graph_length_mismatch() {
        let err = GraphBuilder::from_keywords(&["a", "b"], &[true]).unwrap_err();
        assert_eq!(err, TextRankError::length_mismatch("relevance flags", 2, 1));
    }
}
