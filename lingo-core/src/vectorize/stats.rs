//! Statistics and VocabularyStats.

use crate::vectorize::types::FittedVectorizer;
use lingo_types::NGram;

/// A snapshot of vocabulary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyStats {
    /// Number of documents the vocabulary was fitted on.
    pub num_documents: usize,
    /// Number of distinct n-grams.
    pub vocabulary_size: usize,
    /// Number of n-grams of length 1, 2 and 3.
    pub ngrams_by_len: [usize; NGram::MAX_LEN],
}

impl FittedVectorizer {
    /// Returns vocabulary statistics.
    pub fn stats(&self) -> VocabularyStats {
        let mut ngrams_by_len = [0usize; NGram::MAX_LEN];
        for gram in &self.vocabulary {
            let len = gram.len();
            if (1..=NGram::MAX_LEN).contains(&len) {
                ngrams_by_len[len - 1] += 1;
            }
        }
        VocabularyStats {
            num_documents: self.num_documents,
            vocabulary_size: self.vocabulary.len(),
            ngrams_by_len,
        }
    }
}

impl VocabularyStats {
    /// Returns approximate memory usage of the vocabulary in bytes.
    pub fn memory_usage_bytes(&self) -> usize {
        // Sorted key list, idf table, and hash index (key + slot).
        let keys = self.vocabulary_size * std::mem::size_of::<NGram>();
        let idf = self.vocabulary_size * std::mem::size_of::<f64>();
        let index = self.vocabulary_size * (std::mem::size_of::<NGram>() + 4);
        keys + idf + index
    }
}

impl core::fmt::Display for VocabularyStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} docs, {} n-grams ({} unigrams, {} bigrams, {} trigrams)",
            self.num_documents,
            self.vocabulary_size,
            self.ngrams_by_len[0],
            self.ngrams_by_len[1],
            self.ngrams_by_len[2]
        )
    }
}
