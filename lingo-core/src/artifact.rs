//! On-disk model format.
//!
//! One JSON document holds the fitted configuration and every learned table.
//! Feature index `j` is the position of `vocabulary[j]`, and the rows of
//! `feature_log_prob` follow the order of `classes`.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "config": { ... },
//!   "vocabulary": [" ", " a", "a", ...],
//!   "idf": [1.0, 1.69, ...],
//!   "num_documents": 8000,
//!   "classes": ["English", "French"],
//!   "class_count": [4200, 3800],
//!   "class_log_prior": [-0.64, -0.74],
//!   "feature_log_prob": [[...], [...]],
//!   "reported_accuracy": 0.91
//! }
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analyzer::TextNormalizer;
use crate::classify::FittedNaiveBayes;
use crate::error::{LingoError, Result};
use crate::pipeline::FittedPipeline;
use crate::vectorize::FittedVectorizer;
use lingo_types::{NGram, PipelineConfig};

/// Format version written by this build and the only one it reads.
pub const FORMAT_VERSION: u32 = 1;

/// Serialized form of a [`FittedPipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Schema version, see [`FORMAT_VERSION`].
    pub format_version: u32,
    /// Configuration the model was fitted with.
    pub config: PipelineConfig,
    /// N-grams in feature-index order.
    pub vocabulary: Vec<String>,
    /// Idf weight per feature.
    pub idf: Vec<f64>,
    /// Documents seen by the extractor.
    pub num_documents: usize,
    /// Sorted class labels.
    pub classes: Vec<String>,
    /// Training samples per class.
    pub class_count: Vec<u64>,
    /// Log prior per class.
    pub class_log_prior: Vec<f64>,
    /// One row of feature log likelihoods per class.
    pub feature_log_prob: Vec<Vec<f64>>,
    /// Held-out accuracy measured at training time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_accuracy: Option<f64>,
}

#[derive(Deserialize)]
struct VersionHeader {
    format_version: u32,
}

impl ModelArtifact {
    /// Captures every table of a fitted pipeline.
    pub fn from_fitted(model: &FittedPipeline) -> Self {
        let vectorizer = &model.vectorizer;
        let classifier = &model.classifier;
        Self {
            format_version: FORMAT_VERSION,
            config: model.config,
            vocabulary: vectorizer.vocabulary().iter().map(|g| g.to_string()).collect(),
            idf: vectorizer.idf().to_vec(),
            num_documents: vectorizer.num_documents(),
            classes: classifier.classes().to_vec(),
            class_count: classifier.class_count().to_vec(),
            class_log_prior: classifier.class_log_prior().to_vec(),
            feature_log_prob: classifier.feature_log_prob().to_vec(),
            reported_accuracy: model.reported_accuracy,
        }
    }

    /// Rebuilds the fitted pipeline, checking every table.
    ///
    /// # Errors
    ///
    /// `UnsupportedArtifactVersion` for a foreign version and
    /// `CorruptArtifact` for tables that disagree with each other or with the
    /// stored configuration.
    pub fn into_fitted(self) -> Result<FittedPipeline> {
        if self.format_version != FORMAT_VERSION {
            return Err(LingoError::UnsupportedArtifactVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }
        self.config
            .validate()
            .map_err(|e| LingoError::CorruptArtifact(format!("stored configuration: {e}")))?;
        if let Some(acc) = self.reported_accuracy {
            if !(0.0..=1.0).contains(&acc) {
                return Err(LingoError::CorruptArtifact(format!(
                    "reported accuracy {acc} is outside [0, 1]"
                )));
            }
        }

        let vocabulary = self
            .vocabulary
            .iter()
            .map(|s| {
                NGram::parse(s).ok_or_else(|| {
                    LingoError::CorruptArtifact(format!("invalid vocabulary entry {s:?}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let dim = vocabulary.len();

        let vectorizer = FittedVectorizer::from_parts(
            self.config.vectorizer,
            vocabulary,
            self.idf,
            self.num_documents,
        )?;
        let classifier = FittedNaiveBayes::from_parts(
            self.config.classifier,
            self.classes,
            self.class_count,
            self.class_log_prior,
            self.feature_log_prob,
            dim,
        )?;

        Ok(FittedPipeline {
            config: self.config,
            normalizer: TextNormalizer::new(self.config.normalizer),
            vectorizer,
            classifier,
            reported_accuracy: self.reported_accuracy,
        })
    }

    /// Writes the artifact as JSON.
    ///
    /// Output goes to a temporary file next to `path` that is renamed over
    /// `path` once fully flushed.
    pub fn write(&self, path: &Path) -> Result<()> {
        let tmp = temp_path(path);
        if let Err(e) = self.write_file(&tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            LingoError::io(path, e)
        })?;
        info!(
            "model saved to {} ({} classes, {} features)",
            path.display(),
            self.classes.len(),
            self.vocabulary.len()
        );
        Ok(())
    }

    /// Reads an artifact written by [`write`](Self::write).
    ///
    /// The version is checked before the rest of the document is decoded, so
    /// a file from another format version reports its version rather than a
    /// schema mismatch.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| LingoError::io(path, e))?;
        let header: VersionHeader = serde_json::from_slice(&bytes)?;
        if header.format_version != FORMAT_VERSION {
            return Err(LingoError::UnsupportedArtifactVersion {
                found: header.format_version,
                expected: FORMAT_VERSION,
            });
        }
        let artifact: Self = serde_json::from_slice(&bytes)?;
        debug!(
            "read model from {}: {} bytes, {} classes",
            path.display(),
            bytes.len(),
            artifact.classes.len()
        );
        Ok(artifact)
    }

    fn write_file(&self, tmp: &Path) -> Result<()> {
        let file = File::create(tmp).map_err(|e| LingoError::io(tmp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush().map_err(|e| LingoError::io(tmp, e))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| LingoError::io(tmp, e))
    }
}

pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::pipeline::Pipeline;

    fn fitted() -> FittedPipeline {
        let mut p = Pipeline::default();
        p.fit(
            &["good morning everyone", "buenos dias a todos", "guten morgen alle"],
            &["English", "Spanish", "German"],
        )
        .unwrap();
        p.with_reported_accuracy(0.9).into_fitted().unwrap()
    }

    #[test]
    fn captures_every_table() {
        let model = fitted();
        let artifact = ModelArtifact::from_fitted(&model);
        assert_eq!(artifact.format_version, FORMAT_VERSION);
        assert_eq!(artifact.classes, ["English", "German", "Spanish"]);
        assert_eq!(artifact.vocabulary.len(), model.vectorizer().dim());
        assert_eq!(artifact.feature_log_prob.len(), 3);
        assert_eq!(artifact.reported_accuracy, Some(0.9));
    }

    #[test]
    fn file_roundtrip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let artifact = ModelArtifact::from_fitted(&fitted());
        artifact.write(&path).unwrap();
        assert_eq!(ModelArtifact::read(&path).unwrap(), artifact);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn overwrites_existing_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "stale").unwrap();
        ModelArtifact::from_fitted(&fitted()).write(&path).unwrap();
        assert!(ModelArtifact::read(&path).is_ok());
    }

    #[test]
    fn rejects_other_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, r#"{"format_version": 7, "whatever": true}"#).unwrap();
        let err = ModelArtifact::read(&path).unwrap_err();
        assert!(matches!(
            err,
            LingoError::UnsupportedArtifactVersion {
                found: 7,
                expected: 1
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Artifact);
    }

    #[test]
    fn rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "not json").unwrap();
        let err = ModelArtifact::read(&path).unwrap_err();
        assert!(matches!(err, LingoError::Json(_)));
    }

    #[test]
    fn missing_file_names_path() {
        let err = ModelArtifact::read(Path::new("/nonexistent/model.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }

    #[test]
    fn rejects_truncated_likelihoods() {
        let mut artifact = ModelArtifact::from_fitted(&fitted());
        artifact.feature_log_prob[1].pop();
        let err = artifact.into_fitted().unwrap_err();
        assert!(matches!(err, LingoError::CorruptArtifact(_)));
    }

    #[test]
    fn rejects_bad_vocabulary_entry() {
        let mut artifact = ModelArtifact::from_fitted(&fitted());
        artifact.vocabulary[0] = "four".into();
        let err = artifact.into_fitted().unwrap_err();
        assert!(matches!(err, LingoError::CorruptArtifact(_)));
    }

    #[test]
    fn rejects_mismatched_class_tables() {
        let mut artifact = ModelArtifact::from_fitted(&fitted());
        artifact.class_log_prior.pop();
        assert!(matches!(
            artifact.into_fitted(),
            Err(LingoError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn rejects_invalid_stored_config() {
        let mut artifact = ModelArtifact::from_fitted(&fitted());
        artifact.config.classifier.alpha = 0.0;
        assert!(matches!(
            artifact.into_fitted(),
            Err(LingoError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn restored_model_predicts_identically() {
        let model = fitted();
        let restored = ModelArtifact::from_fitted(&model).into_fitted().unwrap();
        let inputs = ["good day", "buenos", "morgen", ""];
        assert_eq!(model.predict(&inputs).unwrap(), restored.predict(&inputs).unwrap());
        assert_eq!(restored.reported_accuracy(), Some(0.9));
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let tmp = temp_path(Path::new("models/lang.json"));
        assert_eq!(tmp, Path::new("models/lang.json.tmp"));
    }
}
