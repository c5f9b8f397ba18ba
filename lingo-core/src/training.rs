//! End-to-end training: load, split, fit, evaluate, save.

use core::fmt;
use std::fs;
use std::path::Path;

use log::info;

use crate::corpus::{load_corpus, train_test_split, CorpusRecord};
use crate::error::{LingoError, Result};
use crate::metrics::ClassificationReport;
use crate::pipeline::Pipeline;
use lingo_types::PipelineConfig;

/// Outcome of [`train_and_save`].
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Held-out accuracy.
    pub accuracy: f64,
    /// Held-out per-class scores.
    pub report: ClassificationReport,
    /// Records the model was fitted on.
    pub train_size: usize,
    /// Records held out for evaluation.
    pub test_size: usize,
    /// Number of n-gram features.
    pub vocabulary_size: usize,
    /// Labels the model predicts.
    pub classes: Vec<String>,
}

/// Trains a pipeline on the corpus at `data_path` and writes it to
/// `model_path`.
///
/// The corpus is split with `config.split`; the model is fitted on the
/// training part and scored on the held-out part, and that accuracy is stored
/// in the artifact. The parent directory of `model_path` is created if
/// needed. Nothing is written unless every earlier step succeeds.
pub fn train_and_save(
    data_path: impl AsRef<Path>,
    model_path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<TrainingReport> {
    let model_path = model_path.as_ref();
    config.validate()?;

    let records = load_corpus(data_path)?;
    let (train, test) = train_test_split(records, &config.split)?;
    info!("split corpus: {} train, {} test", train.len(), test.len());

    let (train_texts, train_labels) = columns(&train);
    let (test_texts, test_labels) = columns(&test);

    let mut pipeline = Pipeline::new(*config);
    pipeline.fit(&train_texts, &train_labels)?;
    let predicted = pipeline.predict(&test_texts)?;

    let report = ClassificationReport::new(&test_labels, &predicted)?;
    let accuracy = report.accuracy;
    info!("held-out accuracy: {:.4}", accuracy);

    let pipeline = pipeline.with_reported_accuracy(accuracy);
    if let Some(parent) = model_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LingoError::io(parent, e))?;
    }
    pipeline.save(model_path)?;

    let fitted = pipeline.fitted()?;
    Ok(TrainingReport {
        accuracy,
        report,
        train_size: train.len(),
        test_size: test.len(),
        vocabulary_size: fitted.vectorizer().dim(),
        classes: fitted.classes().to_vec(),
    })
}

fn columns(records: &[CorpusRecord]) -> (Vec<&str>, Vec<&str>) {
    records
        .iter()
        .map(|r| (r.text.as_str(), r.language.as_str()))
        .unzip()
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Trained on {} samples, evaluated on {} ({} classes, {} n-gram features)",
            self.train_size,
            self.test_size,
            self.classes.len(),
            self.vocabulary_size
        )?;
        writeln!(f, "Model Accuracy on Test Data: {:.4}", self.accuracy)?;
        writeln!(f)?;
        write!(f, "{}", self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn corpus() -> String {
        let mut csv = String::from("Text,Language\n");
        for line in [
            "the house is big",
            "my dog likes to run",
            "we are going home now",
            "what time is it",
            "she reads a book",
        ] {
            csv.push_str(&format!("{line},English\n"));
        }
        for line in [
            "la maison est grande",
            "mon chien aime courir",
            "nous rentrons maintenant",
            "quelle heure est il",
            "elle lit un livre",
        ] {
            csv.push_str(&format!("{line},French\n"));
        }
        csv
    }

    #[test]
    fn trains_evaluates_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("clean.csv");
        fs::write(&data, corpus()).unwrap();
        let model = dir.path().join("models").join("lang.json");

        let report = train_and_save(&data, &model, &PipelineConfig::default()).unwrap();
        assert_eq!(report.train_size, 8);
        assert_eq!(report.test_size, 2);
        assert_eq!(report.classes, ["English", "French"]);
        assert!((0.0..=1.0).contains(&report.accuracy));
        assert!(model.exists());

        let loaded = Pipeline::load(&model).unwrap();
        assert_eq!(loaded.fitted().unwrap().reported_accuracy(), Some(report.accuracy));
        assert!(report.to_string().contains("Model Accuracy on Test Data"));
    }

    #[test]
    fn missing_corpus_leaves_no_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("lang.json");
        let err = train_and_save(dir.path().join("absent.csv"), &model, &PipelineConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!model.exists());
    }

    #[test]
    fn tiny_corpus_cannot_split() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("clean.csv");
        fs::write(&data, "Text,Language\nhello,English\n").unwrap();
        let model = dir.path().join("lang.json");
        let err = train_and_save(&data, &model, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, LingoError::InvalidSplit(_)));
        assert!(!model.exists());
    }
}
