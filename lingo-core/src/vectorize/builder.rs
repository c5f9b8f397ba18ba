//! Vocabulary building.

use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::analyzer::ngram::for_each_ngram;
use crate::error::{LingoError, Result};
use crate::vectorize::scoring::idf_weight;
use crate::vectorize::types::{FeatureVector, FittedVectorizer, TfidfVectorizer};
use lingo_types::{NGram, VectorizerConfig};

impl TfidfVectorizer {
    /// Creates an unfitted vectorizer.
    pub const fn new(config: VectorizerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Learns the vocabulary and document frequencies of `texts`.
    ///
    /// Texts are expected to be normalized already. The vocabulary is sorted
    /// by n-gram, so the same corpus always yields the same feature indices
    /// whatever order its n-grams were first seen in.
    ///
    /// # Errors
    ///
    /// Returns `LingoError::EmptyTrainingData` if `texts` is empty and
    /// `LingoError::Config` if the n-gram range is invalid.
    pub fn fit<S: AsRef<str>>(&self, texts: &[S]) -> Result<FittedVectorizer> {
        self.config.ngram_range.validate()?;
        if texts.is_empty() {
            return Err(LingoError::EmptyTrainingData);
        }

        let mut doc_freq: FxHashMap<NGram, u32> = FxHashMap::default();
        let mut seen: FxHashSet<NGram> = FxHashSet::default();

        for text in texts {
            seen.clear();
            for_each_ngram(
                self.config.analyzer,
                self.config.ngram_range,
                text.as_ref(),
                |gram| {
                    seen.insert(gram);
                },
            );
            for &gram in &seen {
                *doc_freq.entry(gram).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(NGram, u32)> = doc_freq.into_iter().collect();
        entries.sort_unstable_by_key(|&(gram, _)| gram);

        let num_documents = texts.len();
        let vocabulary: Vec<NGram> = entries.iter().map(|&(gram, _)| gram).collect();
        let idf: Vec<f64> = entries
            .iter()
            .map(|&(_, df)| idf_weight(num_documents, df as usize, self.config.smooth_idf))
            .collect();

        if vocabulary.is_empty() {
            warn!("no n-grams found in {} training documents", num_documents);
        }
        info!(
            "vocabulary built: {} n-grams from {} documents",
            vocabulary.len(),
            num_documents
        );

        Ok(FittedVectorizer::assemble(
            self.config,
            vocabulary,
            idf,
            num_documents,
        ))
    }

    /// Fits on `texts` and returns their vectors along with the fitted extractor.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> Result<(FittedVectorizer, Vec<FeatureVector>)> {
        let fitted = self.fit(texts)?;
        let vectors = fitted.transform(texts);
        Ok((fitted, vectors))
    }
}

impl FittedVectorizer {
    fn assemble(
        config: VectorizerConfig,
        vocabulary: Vec<NGram>,
        idf: Vec<f64>,
        num_documents: usize,
    ) -> Self {
        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, &gram)| (gram, i as u32))
            .collect();
        Self {
            config,
            vocabulary,
            index,
            idf,
            num_documents,
        }
    }

    /// Rebuilds a fitted vectorizer from stored parts, checking consistency.
    ///
    /// # Errors
    ///
    /// Returns `LingoError::CorruptArtifact` if the vocabulary is unsorted,
    /// has duplicates or n-grams outside the configured range, or if the idf
    /// table does not match it.
    pub(crate) fn from_parts(
        config: VectorizerConfig,
        vocabulary: Vec<NGram>,
        idf: Vec<f64>,
        num_documents: usize,
    ) -> Result<Self> {
        config.ngram_range.validate()?;

        if idf.len() != vocabulary.len() {
            return Err(LingoError::CorruptArtifact(format!(
                "idf table has {} entries for {} n-grams",
                idf.len(),
                vocabulary.len()
            )));
        }
        if let Some(pos) = vocabulary.windows(2).position(|w| w[0] >= w[1]) {
            return Err(LingoError::CorruptArtifact(format!(
                "vocabulary not strictly sorted at entry {}",
                pos + 1
            )));
        }
        if let Some(gram) = vocabulary
            .iter()
            .find(|gram| !config.ngram_range.contains(gram.len()))
        {
            return Err(LingoError::CorruptArtifact(format!(
                "n-gram {:?} outside configured range",
                gram.to_string()
            )));
        }
        if let Some(pos) = idf.iter().position(|w| !w.is_finite() || *w <= 0.0) {
            return Err(LingoError::CorruptArtifact(format!(
                "idf weight at index {} is not a positive number",
                pos
            )));
        }

        debug!("restored vocabulary of {} n-grams", vocabulary.len());
        Ok(Self::assemble(config, vocabulary, idf, num_documents))
    }
}
