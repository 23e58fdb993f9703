//! Compressed Sparse Row (CSR) graph representation
//!
//! CSR is optimized for iteration over neighbors, which is exactly what
//! PageRank needs during power iteration. Neighbor lists are sorted by node
//! ID so every summation visits edges in the same order on every run.

use super::builder::GraphBuilder;
use serde::Serialize;

/// One undirected weighted edge, reported once with `a < b`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedEdge {
    pub a: u32,
    pub b: u32,
    pub weight: f64,
}

/// A graph in Compressed Sparse Row format
#[derive(Debug, Clone)]
pub struct CsrGraph {
    /// Number of nodes
    pub num_nodes: usize,
    /// Row pointers: node i's edges are at indices row_ptr[i]..row_ptr[i+1]
    pub row_ptr: Vec<usize>,
    /// Column indices (target nodes) for each edge
    pub col_idx: Vec<u32>,
    /// Edge weights
    pub weights: Vec<f64>,
    /// Total weight of the edges incident to each node
    pub total_weight: Vec<f64>,
    /// Unit id or word for each node
    pub labels: Vec<String>,
}

impl CsrGraph {
    /// Convert a GraphBuilder into CSR format
    pub fn from_builder(builder: &GraphBuilder) -> Self {
        let num_nodes = builder.node_count();
        let mut row_ptr = Vec::with_capacity(num_nodes + 1);
        let mut col_idx = Vec::new();
        let mut weights = Vec::new();
        let mut total_weight = Vec::with_capacity(num_nodes);
        let mut labels = Vec::with_capacity(num_nodes);

        row_ptr.push(0);

        for (_, node) in builder.nodes() {
            labels.push(node.label.clone());

            // Collect and sort edges for deterministic iteration
            let mut edges: Vec<_> = node.edges.iter().map(|(&k, &v)| (k, v)).collect();
            edges.sort_by_key(|(k, _)| *k);

            total_weight.push(edges.iter().map(|(_, w)| w).sum());

            for (target, weight) in edges {
                col_idx.push(target);
                weights.push(weight);
            }

            row_ptr.push(col_idx.len());
        }

        Self {
            num_nodes,
            row_ptr,
            col_idx,
            weights,
            total_weight,
            labels,
        }
    }

    /// Iterate over neighbors of a node
    pub fn neighbors(&self, node: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.row_ptr[node as usize];
        let end = self.row_ptr[node as usize + 1];
        (start..end).map(move |i| (self.col_idx[i], self.weights[i]))
    }

    /// Number of neighbors of a node
    pub fn degree(&self, node: u32) -> usize {
        self.row_ptr[node as usize + 1] - self.row_ptr[node as usize]
    }

    /// Get the total incident weight of a node
    pub fn node_total_weight(&self, node: u32) -> f64 {
        self.total_weight[node as usize]
    }

    /// Get the label for a node
    pub fn label(&self, node: u32) -> &str {
        &self.labels[node as usize]
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// Number of undirected edges
    pub fn num_edges(&self) -> usize {
        self.col_idx.len() / 2
    }

    /// Weight of the edge between two nodes, if any
    pub fn edge_weight(&self, a: u32, b: u32) -> Option<f64> {
        let start = self.row_ptr[a as usize];
        let end = self.row_ptr[a as usize + 1];
        self.col_idx[start..end]
            .binary_search(&b)
            .ok()
            .map(|i| self.weights[start + i])
    }

    /// Every undirected edge once, ordered by `(a, b)`
    pub fn undirected_edges(&self) -> Vec<WeightedEdge> {
        (0..self.num_nodes as u32)
            .flat_map(|a| {
                self.neighbors(a)
                    .filter(move |&(b, _)| a < b)
                    .map(move |(b, weight)| WeightedEdge { a, b, weight })
            })
            .collect()
    }

    /// Find dangling nodes (nodes with no incident weight)
    pub fn dangling_nodes(&self) -> Vec<u32> {
        (0..self.num_nodes as u32)
            .filter(|&n| self.total_weight[n as usize] <= 0.0)
            .collect()
    }

    /// Get node ID by label (linear search - use sparingly)
    pub fn node_by_label(&self, label: &str) -> Option<u32> {
        self.labels.iter().position(|l| l == label).map(|i| i as u32)
    }
}

impl Default for CsrGraph {
    fn default() -> Self {
        Self {
            num_nodes: 0,
            row_ptr: vec![0],
            col_idx: Vec::new(),
            weights: Vec::new(),
            total_weight: Vec::new(),
            labels: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_graph() -> GraphBuilder {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("a");
        let b = builder.get_or_create_node("b");
        let c = builder.get_or_create_node("c");

        builder.increment_edge(a, b, 1.0);
        builder.increment_edge(b, c, 2.0);
        builder.increment_edge(a, c, 1.5);

        builder
    }

    #[test]
    fn test_csr_conversion() {
        let csr = CsrGraph::from_builder(&build_test_graph());

        assert_eq!(csr.num_nodes, 3);
        assert_eq!(csr.labels, vec!["a", "b", "c"]);
        assert_eq!(csr.num_edges(), 3);
    }

    #[test]
    fn test_neighbors_sorted() {
        let csr = CsrGraph::from_builder(&build_test_graph());

        let neighbors: Vec<_> = csr.neighbors(2).collect();
        assert_eq!(neighbors, vec![(0, 1.5), (1, 2.0)]);
    }

    #[test]
    fn test_degree_and_weight() {
        let csr = CsrGraph::from_builder(&build_test_graph());

        assert_eq!(csr.degree(0), 2);
        assert!((csr.node_total_weight(0) - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_edge_lookup() {
        let csr = CsrGraph::from_builder(&build_test_graph());

        assert_eq!(csr.edge_weight(1, 2), Some(2.0));
        assert_eq!(csr.edge_weight(2, 1), Some(2.0));

        let edges = csr.undirected_edges();
        assert_eq!(
            edges,
            vec![
                WeightedEdge { a: 0, b: 1, weight: 1.0 },
                WeightedEdge { a: 0, b: 2, weight: 1.5 },
                WeightedEdge { a: 1, b: 2, weight: 2.0 },
            ]
        );
    }

    #[test]
    fn test_empty_graph() {
        let csr = CsrGraph::from_builder(&GraphBuilder::new());

        assert!(csr.is_empty());
        assert_eq!(csr.num_edges(), 0);
        assert!(csr.undirected_edges().is_empty());
    }

    #[test]
    fn test_dangling_nodes() {
        let mut builder = GraphBuilder::new();
        let a = builder.get_or_create_node("a");
        let b = builder.get_or_create_node("b");
        builder.get_or_create_node("c");
        builder.increment_edge(a, b, 1.0);

        let csr = CsrGraph::from_builder(&builder);

        assert_eq!(csr.dangling_nodes(), vec![2]);
        assert_eq!(csr.node_by_label("c"), Some(2));
        assert_eq!(csr.node_by_label("z"), None);
    }
}
