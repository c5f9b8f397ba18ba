//! Pipeline configuration files.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{LingoError, Result};
use lingo_types::PipelineConfig;

/// Loads a [`PipelineConfig`] from a JSON file, or the defaults when `path`
/// is `None`.
///
/// Missing keys take their default values, so `{}` is a valid file and
/// `{"classifier": {"alpha": 0.5}}` changes only the smoothing.
///
/// # Errors
///
/// `Io` if the file cannot be read, `Json` if it does not parse, `Config` if
/// a value is out of range.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| LingoError::io(path, e))?;
    let config: PipelineConfig = serde_json::from_str(&text)?;
    config.validate()?;
    info!("loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use lingo_types::{Analyzer, ScriptPolicy};

    fn write(body: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), body).unwrap();
        file
    }

    #[test]
    fn defaults_without_path() {
        assert_eq!(load_config(None).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        let file = write("{}");
        assert_eq!(load_config(Some(file.path())).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn partial_overrides() {
        let file = write(
            r#"{
                "normalizer": {"script": "unicode"},
                "vectorizer": {"analyzer": "char_word_bounded", "ngram_range": {"min": 2, "max": 3}},
                "classifier": {"alpha": 0.5},
                "split": {"seed": 7}
            }"#,
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.normalizer.script, ScriptPolicy::Unicode);
        assert_eq!(config.vectorizer.analyzer, Analyzer::CharWordBounded);
        assert_eq!(config.vectorizer.ngram_range.min, 2);
        assert!(config.vectorizer.smooth_idf);
        assert_eq!(config.classifier.alpha, 0.5);
        assert!(config.classifier.fit_prior);
        assert_eq!(config.split.seed, 7);
        assert_eq!(config.split.test_ratio, 0.2);
    }

    #[test]
    fn out_of_range_values_rejected() {
        let file = write(r#"{"split": {"test_ratio": 0.0}}"#);
        let err = load_config(Some(file.path())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn malformed_file_rejected() {
        let file = write("{ not json");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(LingoError::Json(_))
        ));
    }

    #[test]
    fn missing_file_rejected() {
        let err = load_config(Some(Path::new("/no/such/lingo.json"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
