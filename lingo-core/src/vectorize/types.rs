//! Vectorizer types.

use lingo_types::{NGram, VectorizerConfig};
use rustc_hash::FxHashMap;

/// Unfitted TF-IDF extractor over character n-grams.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfidfVectorizer {
    pub(crate) config: VectorizerConfig,
}

/// TF-IDF extractor with a frozen vocabulary.
///
/// Immutable after fitting; `transform` takes `&self` and is safe to call
/// from many threads at once.
#[derive(Debug, Clone)]
pub struct FittedVectorizer {
    pub(crate) config: VectorizerConfig,
    /// N-grams sorted ascending; position = feature index.
    pub(crate) vocabulary: Vec<NGram>,
    pub(crate) index: FxHashMap<NGram, u32>,
    /// Inverse document frequency per feature index.
    pub(crate) idf: Vec<f64>,
    pub(crate) num_documents: usize,
}

/// Sparse TF-IDF vector.
///
/// Entries are `(feature index, weight)` sorted by index with no zero
/// weights. `dim` is the vocabulary size of the extractor that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(u32, f64)>,
}

impl FeatureVector {
    /// Creates a vector from `(index, weight)` pairs.
    ///
    /// Pairs are sorted by index and zero weights dropped. Indices must be
    /// unique and below `dim`.
    pub fn from_sparse(dim: usize, mut entries: Vec<(u32, f64)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_unstable_by_key(|&(i, _)| i);
        debug_assert!(
            entries.windows(2).all(|w| w[0].0 < w[1].0),
            "feature indices must be unique"
        );
        debug_assert!(
            entries.last().map_or(true, |&(i, _)| (i as usize) < dim),
            "feature index out of range"
        );
        Self { dim, entries }
    }

    /// Creates a vector from dense weights.
    pub fn from_dense(weights: &[f64]) -> Self {
        let entries = weights
            .iter()
            .enumerate()
            .filter(|&(_, w)| *w != 0.0)
            .map(|(i, &w)| (i as u32, w))
            .collect();
        Self {
            dim: weights.len(),
            entries,
        }
    }

    /// Creates the all-zero vector.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Dimensionality (vocabulary size).
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries.
    #[inline(always)]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if every weight is zero.
    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of feature `index`.
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&(index as u32), |&(i, _)| i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    /// Non-zero `(index, weight)` pairs in ascending index order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|&(i, w)| (i as usize, w))
    }

    /// Dot product with a dense row of length `dim`.
    #[inline]
    pub fn dot(&self, dense: &[f64]) -> f64 {
        debug_assert_eq!(dense.len(), self.dim);
        self.entries
            .iter()
            .map(|&(i, w)| w * dense[i as usize])
            .sum()
    }

    /// Expands into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(i, w) in &self.entries {
            dense[i as usize] = w;
        }
        dense
    }
}
