//! Edge weighting strategies for sentence graphs
//!
//! Any `Fn(&TermSet, &TermSet) -> f64` can be used as a strategy. Weights that
//! are not strictly positive and finite never become edges.

use crate::types::TermSet;

/// Computes the weight between two units from their term sets
pub trait Overlap: Sync {
    fn weight(&self, a: &TermSet, b: &TermSet) -> f64;
}

impl<F> Overlap for F
where
    F: Fn(&TermSet, &TermSet) -> f64 + Sync,
{
    fn weight(&self, a: &TermSet, b: &TermSet) -> f64 {
        self(a, b)
    }
}

/// `|A ∩ B| / (ln(|A| + 1) + ln(|B| + 1))`, the TextRank sentence similarity.
///
/// Zero when either set is empty or the sets are disjoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedOverlap;

impl Overlap for NormalizedOverlap {
    fn weight(&self, a: &TermSet, b: &TermSet) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let shared = a.intersection_count(b);
        if shared == 0 {
            return 0.0;
        }
        let norm = (a.len() as f64 + 1.0).ln() + (b.len() as f64 + 1.0).ln();
        shared as f64 / norm
    }
}

/// `|A ∩ B| / |A ∪ B|`
#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardOverlap;

impl Overlap for JaccardOverlap {
    fn weight(&self, a: &TermSet, b: &TermSet) -> f64 {
        let union = a.union_count(b);
        if union == 0 {
            return 0.0;
        }
        a.intersection_count(b) as f64 / union as f64
    }
}
