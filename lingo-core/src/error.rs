//! Error type shared by every stage of the pipeline.

use std::path::PathBuf;

use lingo_types::ConfigError;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = LingoError> = std::result::Result<T, E>;

/// Broad category of a [`LingoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Training data is empty or inconsistent.
    Data,
    /// The API was called in the wrong state.
    Usage,
    /// A configuration value is out of range.
    Config,
    /// A file could not be read or written, or has the wrong columns.
    Io,
    /// A model artifact is unreadable, corrupt, or from another format version.
    Artifact,
}

/// Errors produced by the language identifier.
#[derive(Debug, Error)]
pub enum LingoError {
    /// No texts or labels were supplied.
    #[error("training data is empty")]
    EmptyTrainingData,

    /// Texts and labels differ in length.
    #[error("length mismatch: {texts} texts but {labels} labels")]
    LengthMismatch {
        /// Number of texts.
        texts: usize,
        /// Number of labels.
        labels: usize,
    },

    /// A label is the empty string.
    #[error("label at row {row} is empty")]
    EmptyLabel {
        /// Zero-based row of the offending label.
        row: usize,
    },

    /// A feature vector does not match the classifier's dimensionality.
    #[error("feature dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimensionality the model was fitted with.
        expected: usize,
        /// Dimensionality received.
        found: usize,
    },

    /// `predict` or `save` was called before `fit` or `load`.
    #[error("pipeline is not fitted; call fit() or load() first")]
    NotFitted,

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The corpus cannot be split with the requested ratio.
    #[error("cannot split corpus: {0}")]
    InvalidSplit(String),

    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The corpus file is not valid CSV.
    #[error("malformed corpus: {0}")]
    Csv(#[from] csv::Error),

    /// A required corpus column is absent.
    #[error("corpus is missing required column `{0}`")]
    MissingColumn(&'static str),

    /// The artifact was written by an incompatible format version.
    #[error("unsupported model format version {found} (expected {expected})")]
    UnsupportedArtifactVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// The artifact parsed but its contents are inconsistent.
    #[error("corrupt model artifact: {0}")]
    CorruptArtifact(String),

    /// The artifact or a config file is not valid JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl LingoError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LingoError::EmptyTrainingData
            | LingoError::LengthMismatch { .. }
            | LingoError::EmptyLabel { .. }
            | LingoError::DimensionMismatch { .. } => ErrorKind::Data,
            LingoError::NotFitted => ErrorKind::Usage,
            LingoError::Config(_) | LingoError::InvalidSplit(_) => ErrorKind::Config,
            LingoError::Io { .. } | LingoError::Csv(_) | LingoError::MissingColumn(_) => {
                ErrorKind::Io
            }
            LingoError::UnsupportedArtifactVersion { .. }
            | LingoError::CorruptArtifact(_)
            | LingoError::Json(_) => ErrorKind::Artifact,
        }
    }

    /// Wraps an I/O error with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LingoError::Io {
            path: path.into(),
            source,
        }
    }
}
