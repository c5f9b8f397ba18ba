//! Public API for turning texts into feature vectors.

use smallvec::SmallVec;

use crate::analyzer::ngram::for_each_ngram;
use crate::vectorize::types::{FeatureVector, FittedVectorizer};
use lingo_types::{NGram, VectorizerConfig};

impl FittedVectorizer {
    /// Transforms one normalized text into a TF-IDF vector.
    ///
    /// N-grams absent from the vocabulary are ignored; text with no known
    /// n-gram yields the zero vector.
    pub fn transform_one(&self, text: &str) -> FeatureVector {
        let mut hits: SmallVec<[u32; 256]> = SmallVec::new();
        for_each_ngram(
            self.config.analyzer,
            self.config.ngram_range,
            text,
            |gram| {
                if let Some(&i) = self.index.get(&gram) {
                    hits.push(i);
                }
            },
        );

        if hits.is_empty() {
            return FeatureVector::zeros(self.dim());
        }

        hits.sort_unstable();

        let mut counts: Vec<(u32, u32)> = Vec::with_capacity(hits.len());
        for &i in &hits {
            if let Some((last, n)) = counts.last_mut() {
                if *last == i {
                    *n += 1;
                    continue;
                }
            }
            counts.push((i, 1));
        }

        FeatureVector::from_sparse(self.dim(), self.weigh(&counts))
    }

    /// Transforms each text, preserving order.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Vec<FeatureVector> {
        texts
            .iter()
            .map(|text| self.transform_one(text.as_ref()))
            .collect()
    }

    /// Returns the vocabulary in feature-index order.
    #[inline]
    pub fn vocabulary(&self) -> &[NGram] {
        &self.vocabulary
    }

    /// Returns the idf weight of every feature.
    #[inline]
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Looks up the feature index of an n-gram.
    #[inline]
    pub fn index_of(&self, gram: NGram) -> Option<usize> {
        self.index.get(&gram).map(|&i| i as usize)
    }

    /// Number of features.
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents seen while fitting.
    #[inline(always)]
    pub fn num_documents(&self) -> usize {
        self.num_documents
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }
}
