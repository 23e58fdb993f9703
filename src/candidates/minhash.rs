//! MinHash signatures over term sets
//!
//! Each hash function is a universal hash `(a * x + b) mod p` over the
//! Mersenne prime `p = 2^61 - 1`, applied to a stable 64-bit hash of the term.
//! The coefficients of function `i` depend only on the seed and `i`, so a
//! longer signature always extends a shorter one with the same seed.

use crate::types::TermSet;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Default seed for reproducible signatures
pub const DEFAULT_SEED: u64 = 42;

const MERSENNE_PRIME: u64 = (1 << 61) - 1;

/// A MinHash signature: one minimum per hash function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinHashSignature {
    pub values: Vec<u64>,
}

impl MinHashSignature {
    /// Signature length
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the signature has no positions
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `rows` positions that make up band number `band`
    pub fn band(&self, band: usize, rows: usize) -> &[u64] {
        &self.values[band * rows..(band + 1) * rows]
    }

    /// Estimate Jaccard similarity as the fraction of agreeing positions
    pub fn jaccard(&self, other: &Self) -> f64 {
        if self.values.len() != other.values.len() || self.values.is_empty() {
            return 0.0;
        }
        let matches = self
            .values
            .iter()
            .zip(other.values.iter())
            .filter(|(a, b)| a == b)
            .count();
        matches as f64 / self.values.len() as f64
    }
}

/// Generates MinHash signatures with a fixed family of hash functions
#[derive(Debug, Clone)]
pub struct MinHasher {
    /// (a, b) coefficients, one pair per hash function
    coefficients: Vec<(u64, u64)>,
}

impl MinHasher {
    /// Create a hasher with `num_hashes` functions and the default seed
    pub fn new(num_hashes: usize) -> Self {
        Self::with_seed(num_hashes, DEFAULT_SEED)
    }

    /// Create a hasher with `num_hashes` functions derived from `seed`
    pub fn with_seed(num_hashes: usize, seed: u64) -> Self {
        let coefficients = (0..num_hashes as u64)
            .map(|i| {
                let base = seed ^ i.wrapping_mul(0x9E37_79B9_7F4A_7C15);
                let a = splitmix64(base) % (MERSENNE_PRIME - 1) + 1;
                let b = splitmix64(base ^ 0xD1B5_4A32_D192_ED03) % MERSENNE_PRIME;
                (a, b)
            })
            .collect();
        Self { coefficients }
    }

    /// Number of hash functions (signature length)
    pub fn num_hashes(&self) -> usize {
        self.coefficients.len()
    }

    /// Compute the signature of a term set.
    ///
    /// An empty set yields `u64::MAX` at every position.
    pub fn signature(&self, terms: &TermSet) -> MinHashSignature {
        let mut values = vec![u64::MAX; self.coefficients.len()];
        for term in terms.iter() {
            let x = hash_term(term) % MERSENNE_PRIME;
            for (slot, &(a, b)) in values.iter_mut().zip(self.coefficients.iter()) {
                let h = universal_hash(a, b, x);
                if h < *slot {
                    *slot = h;
                }
            }
        }
        MinHashSignature { values }
    }
}

fn hash_term(term: &str) -> u64 {
    let mut hasher = FxHasher::default();
    term.hash(&mut hasher);
    hasher.finish()
}

fn universal_hash(a: u64, b: u64, x: u64) -> u64 {
    ((a as u128 * x as u128 + b as u128) % MERSENNE_PRIME as u128) as u64
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
