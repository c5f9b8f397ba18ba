//! Normalizer, TF-IDF extractor and Naive Bayes chained into one model.
//!
//! [`Pipeline`] owns the fit/predict/save/load lifecycle. Fitting produces a
//! [`FittedPipeline`], the immutable handle inference callers share.
//!
//! # Examples
//!
//! ```
//! use lingo_core::Pipeline;
//! use lingo_types::PipelineConfig;
//!
//! let mut pipeline = Pipeline::new(PipelineConfig::default());
//! pipeline
//!     .fit(
//!         &["hello my friend, how are you?", "bonjour mon ami, comment allez-vous ?"],
//!         &["English", "French"],
//!     )
//!     .unwrap();
//! assert_eq!(pipeline.predict_one("How are you, my friend?").unwrap(), "English");
//! ```

use std::path::Path;

use log::info;

use crate::analyzer::TextNormalizer;
use crate::artifact::ModelArtifact;
use crate::classify::{FittedNaiveBayes, MultinomialNaiveBayes};
use crate::error::{LingoError, Result};
use crate::vectorize::{FittedVectorizer, TfidfVectorizer};
use lingo_types::PipelineConfig;

/// Trainable language identifier.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    fitted: Option<FittedPipeline>,
}

/// Fitted language identifier.
///
/// Immutable; every method takes `&self`. Wrap it in an `Arc` to serve
/// predictions from several threads.
#[derive(Debug, Clone)]
pub struct FittedPipeline {
    pub(crate) config: PipelineConfig,
    pub(crate) normalizer: TextNormalizer,
    pub(crate) vectorizer: FittedVectorizer,
    pub(crate) classifier: FittedNaiveBayes,
    pub(crate) reported_accuracy: Option<f64>,
}

impl Pipeline {
    /// Creates an unfitted pipeline.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Fits every stage on raw texts and their labels.
    ///
    /// Inputs are checked before anything is fitted. A previously fitted model
    /// is replaced only on success.
    ///
    /// # Errors
    ///
    /// Data errors for empty input, mismatched lengths or empty labels;
    /// config errors for out-of-range settings.
    pub fn fit<S, L>(&mut self, texts: &[S], labels: &[L]) -> Result<&FittedPipeline>
    where
        S: AsRef<str>,
        L: AsRef<str>,
    {
        self.config.validate()?;
        if texts.len() != labels.len() {
            return Err(LingoError::LengthMismatch {
                texts: texts.len(),
                labels: labels.len(),
            });
        }
        if texts.is_empty() {
            return Err(LingoError::EmptyTrainingData);
        }
        if let Some(row) = labels.iter().position(|l| l.as_ref().is_empty()) {
            return Err(LingoError::EmptyLabel { row });
        }

        let normalizer = TextNormalizer::new(self.config.normalizer);
        let cleaned: Vec<String> = texts.iter().map(|t| normalizer.normalize(t.as_ref())).collect();

        let (vectorizer, vectors) =
            TfidfVectorizer::new(self.config.vectorizer).fit_transform(&cleaned)?;
        let classifier = MultinomialNaiveBayes::new(self.config.classifier).fit(&vectors, labels)?;

        info!(
            "pipeline fitted on {} texts: {}",
            texts.len(),
            vectorizer.stats()
        );

        Ok(&*self.fitted.insert(FittedPipeline {
            config: self.config,
            normalizer,
            vectorizer,
            classifier,
            reported_accuracy: None,
        }))
    }

    /// Predicts one label per text, preserving order.
    ///
    /// # Errors
    ///
    /// `LingoError::NotFitted` before [`fit`](Self::fit) or [`load`](Self::load).
    pub fn predict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>> {
        self.fitted()?.predict(texts)
    }

    /// Predicts the label of one text.
    pub fn predict_one(&self, text: &str) -> Result<&str> {
        self.fitted()?.predict_one(text)
    }

    /// Writes the fitted model to `path`.
    ///
    /// The artifact is written to a sibling temporary file and renamed into
    /// place, so a failed save never leaves a partial model behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.fitted()?.save(path)
    }

    /// Loads a model written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// I/O errors, malformed JSON, an unsupported format version, or tables
    /// whose dimensions disagree. A failed load never yields an unfitted
    /// pipeline.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let fitted = FittedPipeline::load(path)?;
        Ok(Self {
            config: fitted.config,
            fitted: Some(fitted),
        })
    }

    /// Records the held-out accuracy to store alongside the model.
    pub fn with_reported_accuracy(mut self, accuracy: f64) -> Self {
        if let Some(fitted) = self.fitted.as_mut() {
            fitted.reported_accuracy = Some(accuracy);
        }
        self
    }

    /// Returns the fitted model.
    pub fn fitted(&self) -> Result<&FittedPipeline> {
        self.fitted.as_ref().ok_or(LingoError::NotFitted)
    }

    /// Consumes the pipeline, returning the fitted model.
    pub fn into_fitted(self) -> Result<FittedPipeline> {
        self.fitted.ok_or(LingoError::NotFitted)
    }

    /// Returns `true` once fitted or loaded.
    #[inline]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl FittedPipeline {
    /// Predicts one label per text, preserving order.
    pub fn predict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>> {
        let mut buf = String::new();
        texts
            .iter()
            .map(|text| {
                self.normalizer.normalize_into(text.as_ref(), &mut buf);
                let vector = self.vectorizer.transform_one(&buf);
                self.classifier.predict_one(&vector).map(str::to_owned)
            })
            .collect()
    }

    /// Predicts the label of one text.
    ///
    /// Text that normalizes to nothing gets the class with the highest prior.
    pub fn predict_one(&self, text: &str) -> Result<&str> {
        let cleaned = self.normalizer.normalize(text);
        let vector = self.vectorizer.transform_one(&cleaned);
        self.classifier.predict_one(&vector)
    }

    /// Writes the model to `path` atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        ModelArtifact::from_fitted(self).write(path.as_ref())
    }

    /// Loads a model written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        ModelArtifact::read(path.as_ref())?.into_fitted()
    }

    /// Sorted labels the model can predict.
    #[inline]
    pub fn classes(&self) -> &[String] {
        self.classifier.classes()
    }

    /// Held-out accuracy recorded at training time, if any.
    #[inline]
    pub fn reported_accuracy(&self) -> Option<f64> {
        self.reported_accuracy
    }

    /// Configuration the model was fitted with.
    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalizer stage.
    #[inline]
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Feature extraction stage.
    #[inline]
    pub fn vectorizer(&self) -> &FittedVectorizer {
        &self.vectorizer
    }

    /// Classifier stage.
    #[inline]
    pub fn classifier(&self) -> &FittedNaiveBayes {
        &self.classifier
    }
}
