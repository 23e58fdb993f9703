//! Standard PageRank algorithm
//!
//! Power iteration on an undirected weighted graph:
//!
//! `score'(v) = (1-d)/N + d * Σ_u score(u) * w(u,v) / total_weight(u)`
//!
//! Dangling nodes spread their mass uniformly over all nodes. Each iteration
//! reads only the previous score vector, so the per-node update runs in
//! parallel on large graphs; every node sums its neighbors in sorted order,
//! which keeps sequential and parallel runs bit-identical.

use super::PageRankResult;
use crate::errors::{Result, TextRankError};
use crate::graph::csr::CsrGraph;
use rayon::prelude::*;

/// Below this many nodes the per-node update runs sequentially
const PARALLEL_THRESHOLD: usize = 4096;

/// Standard PageRank implementation
#[derive(Debug, Clone)]
pub struct StandardPageRank {
    /// Damping factor (typically 0.85)
    pub damping: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Convergence threshold on the L1 delta
    pub threshold: f64,
}

impl Default for StandardPageRank {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 30,
            threshold: 1e-4,
        }
    }
}

impl StandardPageRank {
    /// Create a new StandardPageRank with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Validate the solver settings
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(TextRankError::invalid_config(format!(
                "damping must be between 0 and 1, got {}",
                self.damping
            )));
        }
        if self.max_iterations == 0 {
            return Err(TextRankError::invalid_config("max_iterations must be > 0"));
        }
        if self.threshold.is_nan() || self.threshold < 0.0 {
            return Err(TextRankError::invalid_config("threshold must be >= 0"));
        }
        Ok(())
    }

    /// Run PageRank on a graph
    ///
    /// Invalid settings are a configuration error. Otherwise the result is
    /// returned even if convergence wasn't achieved, with `converged=false`.
    pub fn run(&self, graph: &CsrGraph) -> Result<PageRankResult> {
        self.validate()?;
        Ok(self.solve(graph, graph.num_nodes >= PARALLEL_THRESHOLD))
    }

    fn solve(&self, graph: &CsrGraph, parallel: bool) -> PageRankResult {
        let n = graph.num_nodes;
        if n == 0 {
            return PageRankResult::new(vec![], 0, 0.0, true);
        }

        let initial_score = 1.0 / n as f64;

        // Without edges every node is dangling and the fixed point is uniform
        if graph.num_edges() == 0 {
            return PageRankResult::new(vec![initial_score; n], 0, 0.0, true);
        }

        let mut scores = vec![initial_score; n];
        let mut new_scores = vec![0.0; n];
        let mut outflow = vec![0.0; n];

        let dangling_nodes = graph.dangling_nodes();
        let teleport = (1.0 - self.damping) / n as f64;
        let mut iterations = 0;
        let mut delta = f64::MAX;

        while iterations < self.max_iterations && delta > self.threshold {
            iterations += 1;

            let dangling_mass: f64 = dangling_nodes.iter().map(|&d| scores[d as usize]).sum();
            let base = teleport + self.damping * dangling_mass / n as f64;

            for (node, out) in outflow.iter_mut().enumerate() {
                let total_weight = graph.total_weight[node];
                *out = if total_weight > 0.0 {
                    scores[node] / total_weight
                } else {
                    0.0
                };
            }

            let update = |(node, slot): (usize, &mut f64)| {
                let incoming: f64 = graph
                    .neighbors(node as u32)
                    .map(|(neighbor, weight)| outflow[neighbor as usize] * weight)
                    .sum();
                *slot = base + self.damping * incoming;
            };

            if parallel {
                new_scores.par_iter_mut().enumerate().for_each(update);
            } else {
                new_scores.iter_mut().enumerate().for_each(update);
            }

            // Calculate convergence delta (L1 norm)
            delta = scores
                .iter()
                .zip(new_scores.iter())
                .map(|(old, new)| (old - new).abs())
                .sum();

            std::mem::swap(&mut scores, &mut new_scores);
        }

        // Normalize scores (they should already sum to ~1, but ensure numerical stability)
        let sum: f64 = scores.iter().sum();
        if sum > 0.0 {
            for score in &mut scores {
                *score /= sum;
            }
        }

        let converged = delta <= self.threshold;
        #[cfg(feature = "tracing")]
        if converged {
            tracing::debug!(nodes = n, iterations, delta, "pagerank converged");
        } else {
            tracing::warn!(
                nodes = n,
                iterations,
                delta,
                "pagerank stopped at the iteration cap without converging"
            );
        }

        PageRankResult::new(scores, iterations, delta, converged)
    }
}
