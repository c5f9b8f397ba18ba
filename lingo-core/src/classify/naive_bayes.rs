//! Multinomial Naive Bayes over TF-IDF features.

use log::{debug, info};

use crate::error::{LingoError, Result};
use crate::vectorize::FeatureVector;
use lingo_types::ClassifierConfig;

/// Unfitted multinomial Naive Bayes classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultinomialNaiveBayes {
    config: ClassifierConfig,
}

/// Fitted multinomial Naive Bayes classifier.
///
/// Immutable after fitting.
#[derive(Debug, Clone)]
pub struct FittedNaiveBayes {
    pub(crate) config: ClassifierConfig,
    /// Sorted distinct labels; position = class index.
    pub(crate) classes: Vec<String>,
    /// Training samples per class.
    pub(crate) class_count: Vec<u64>,
    pub(crate) class_log_prior: Vec<f64>,
    /// `classes.len()` rows of `dim` log-likelihoods.
    pub(crate) feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNaiveBayes {
    /// Creates an unfitted classifier.
    pub const fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Estimates class priors and per-class feature likelihoods.
    ///
    /// Feature likelihoods use additive smoothing:
    /// `P(j | c) = (fc[c][j] + alpha) / Σ_k (fc[c][k] + alpha)` where
    /// `fc[c][j]` sums feature `j` over the samples of class `c`.
    ///
    /// # Errors
    ///
    /// Returns a data error for empty input, mismatched lengths, empty labels
    /// or vectors of differing dimensionality, and a config error for a
    /// non-positive `alpha`.
    pub fn fit<L: AsRef<str>>(
        &self,
        vectors: &[FeatureVector],
        labels: &[L],
    ) -> Result<FittedNaiveBayes> {
        self.config.validate()?;
        if vectors.len() != labels.len() {
            return Err(LingoError::LengthMismatch {
                texts: vectors.len(),
                labels: labels.len(),
            });
        }
        if vectors.is_empty() {
            return Err(LingoError::EmptyTrainingData);
        }
        if let Some(row) = labels.iter().position(|l| l.as_ref().is_empty()) {
            return Err(LingoError::EmptyLabel { row });
        }

        let dim = vectors[0].dim();
        if let Some(bad) = vectors.iter().find(|v| v.dim() != dim) {
            return Err(LingoError::DimensionMismatch {
                expected: dim,
                found: bad.dim(),
            });
        }

        let mut classes: Vec<String> = labels.iter().map(|l| l.as_ref().to_owned()).collect();
        classes.sort_unstable();
        classes.dedup();

        let n_classes = classes.len();
        let mut class_count = vec![0u64; n_classes];
        let mut feature_count = vec![vec![0.0f64; dim]; n_classes];

        for (vector, label) in vectors.iter().zip(labels) {
            // Present by construction.
            let c = classes
                .binary_search_by(|entry| entry.as_str().cmp(label.as_ref()))
                .unwrap_or_default();
            class_count[c] += 1;
            let row = &mut feature_count[c];
            for (j, w) in vector.iter() {
                row[j] += w;
            }
        }

        let alpha = self.config.alpha;
        let feature_log_prob = feature_count
            .iter()
            .map(|row| {
                let total: f64 = row.iter().map(|&fc| fc + alpha).sum();
                let log_total = total.ln();
                row.iter().map(|&fc| (fc + alpha).ln() - log_total).collect()
            })
            .collect();

        let class_log_prior = if self.config.fit_prior {
            let n = (vectors.len() as f64).ln();
            class_count.iter().map(|&c| (c as f64).ln() - n).collect()
        } else {
            vec![-(n_classes as f64).ln(); n_classes]
        };

        info!(
            "naive bayes fitted: {} classes over {} features from {} samples",
            n_classes,
            dim,
            vectors.len()
        );
        debug!("class counts: {:?}", classes.iter().zip(&class_count).collect::<Vec<_>>());

        Ok(FittedNaiveBayes {
            config: self.config,
            classes,
            class_count,
            class_log_prior,
            feature_log_prob,
        })
    }
}

impl FittedNaiveBayes {
    /// Per-class unnormalized log posterior of one vector.
    ///
    /// # Errors
    ///
    /// Returns `LingoError::DimensionMismatch` if the vector was produced by
    /// a different vocabulary.
    pub fn joint_log_likelihood(&self, vector: &FeatureVector) -> Result<Vec<f64>> {
        self.check_dim(vector)?;
        Ok(self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| prior + vector.dot(row))
            .collect())
    }

    /// Predicts the most probable class of one vector.
    ///
    /// The first class in sorted order wins ties, so a zero vector gets the
    /// class with the highest prior.
    pub fn predict_one(&self, vector: &FeatureVector) -> Result<&str> {
        let scores = self.joint_log_likelihood(vector)?;
        let mut best = 0usize;
        for (c, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = c;
            }
        }
        Ok(&self.classes[best])
    }

    /// Predicts one label per vector, preserving order.
    pub fn predict(&self, vectors: &[FeatureVector]) -> Result<Vec<String>> {
        vectors
            .iter()
            .map(|v| self.predict_one(v).map(str::to_owned))
            .collect()
    }

    /// Sorted class labels.
    #[inline]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Training samples per class, aligned with [`classes`](Self::classes).
    #[inline]
    pub fn class_count(&self) -> &[u64] {
        &self.class_count
    }

    /// Log prior per class.
    #[inline]
    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    /// Log likelihood of every feature given every class.
    #[inline]
    pub fn feature_log_prob(&self) -> &[Vec<f64>] {
        &self.feature_log_prob
    }

    /// Number of features the model was fitted on.
    #[inline]
    pub fn dim(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Rebuilds a fitted classifier from stored parts, checking shapes.
    pub(crate) fn from_parts(
        config: ClassifierConfig,
        classes: Vec<String>,
        class_count: Vec<u64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
        dim: usize,
    ) -> Result<Self> {
        let corrupt = |msg: String| Err(LingoError::CorruptArtifact(msg));

        if classes.is_empty() {
            return corrupt("model has no classes".into());
        }
        if classes.windows(2).any(|w| w[0] >= w[1]) || classes.iter().any(String::is_empty) {
            return corrupt("class labels must be non-empty, sorted and unique".into());
        }
        let n = classes.len();
        if class_count.len() != n || class_log_prior.len() != n || feature_log_prob.len() != n {
            return corrupt(format!(
                "class tables disagree: {} labels, {} counts, {} priors, {} likelihood rows",
                n,
                class_count.len(),
                class_log_prior.len(),
                feature_log_prob.len()
            ));
        }
        if let Some(c) = feature_log_prob.iter().position(|row| row.len() != dim) {
            return corrupt(format!(
                "likelihood row for {:?} has {} entries, vocabulary has {}",
                classes[c],
                feature_log_prob[c].len(),
                dim
            ));
        }
        let finite = class_log_prior
            .iter()
            .chain(feature_log_prob.iter().flatten())
            .all(|p| p.is_finite() && *p <= 0.0);
        if !finite {
            return corrupt("log probabilities must be finite and non-positive".into());
        }

        Ok(Self {
            config,
            classes,
            class_count,
            class_log_prior,
            feature_log_prob,
        })
    }

    fn check_dim(&self, vector: &FeatureVector) -> Result<()> {
        if vector.dim() != self.dim() {
            return Err(LingoError::DimensionMismatch {
                expected: self.dim(),
                found: vector.dim(),
            });
        }
        Ok(())
    }
}
