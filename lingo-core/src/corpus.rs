//! Labeled corpus I/O and the evaluation split.
//!
//! Corpora are CSV files with a header row. Training needs a `Text` and a
//! `Language` column; any other column is carried through cleaning and
//! ignored by training.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use csv::StringRecord;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::analyzer::TextNormalizer;
use crate::artifact::temp_path;
use crate::error::{LingoError, Result};
use lingo_types::SplitConfig;

/// Column holding the sample text.
pub const TEXT_COLUMN: &str = "Text";
/// Column holding the language label.
pub const LANGUAGE_COLUMN: &str = "Language";

/// One labeled sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    /// Sample text.
    pub text: String,
    /// Language label.
    pub language: String,
}

/// Row counts from [`clean_corpus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanSummary {
    /// Data rows read, header excluded.
    pub rows_read: usize,
    /// Rows dropped for a missing value.
    pub rows_dropped: usize,
    /// Rows written.
    pub rows_written: usize,
}

impl core::fmt::Display for CleanSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} rows read, {} dropped, {} written",
            self.rows_read, self.rows_dropped, self.rows_written
        )
    }
}

/// Loads `(Text, Language)` pairs from a CSV corpus.
///
/// Rows whose text or label is empty are dropped.
///
/// # Errors
///
/// `Io` if the file cannot be opened, `MissingColumn` if either column is
/// absent, `Csv` for malformed rows.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<CorpusRecord>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let headers = reader.headers()?.clone();
    let text_col = column(&headers, TEXT_COLUMN)?;
    let lang_col = column(&headers, LANGUAGE_COLUMN)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in reader.records() {
        let row = row?;
        let text = row.get(text_col).unwrap_or_default();
        let language = row.get(lang_col).unwrap_or_default().trim();
        if text.is_empty() || language.is_empty() {
            dropped += 1;
            continue;
        }
        records.push(CorpusRecord {
            text: text.to_owned(),
            language: language.to_owned(),
        });
    }

    if dropped > 0 {
        warn!("{}: dropped {} rows with a missing text or label", path.display(), dropped);
    }
    info!("loaded {} labeled rows from {}", records.len(), path.display());
    Ok(records)
}

/// Normalizes the `Text` column of a CSV corpus into a new file.
///
/// Rows with an empty value in any column are dropped. Every other column is
/// written back unchanged, in the original order and under the original
/// header.
///
/// The output is written to a sibling temporary file and renamed into place,
/// so a malformed row leaves no output behind.
///
/// # Errors
///
/// `Io` if either file cannot be opened or renamed, `MissingColumn` if the
/// `Text` column is absent, `Csv` for malformed rows.
pub fn clean_corpus(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    normalizer: &TextNormalizer,
) -> Result<CleanSummary> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let mut reader = open_reader(input)?;
    let headers = reader.headers()?.clone();
    let text_col = column(&headers, TEXT_COLUMN)?;

    let tmp = temp_path(output);
    let summary = match write_cleaned(&mut reader, &headers, text_col, &tmp, normalizer) {
        Ok(summary) => summary,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
    };
    fs::rename(&tmp, output).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        LingoError::io(output, e)
    })?;

    info!(
        "cleaned {} into {}: {}",
        input.display(),
        output.display(),
        summary
    );
    Ok(summary)
}

fn write_cleaned(
    reader: &mut csv::Reader<BufReader<File>>,
    headers: &StringRecord,
    text_col: usize,
    tmp: &Path,
    normalizer: &TextNormalizer,
) -> Result<CleanSummary> {
    let file = File::create(tmp).map_err(|e| LingoError::io(tmp, e))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    writer.write_record(headers)?;

    let mut summary = CleanSummary::default();
    let mut cleaned = String::new();
    let mut out = StringRecord::new();
    for row in reader.records() {
        let row = row?;
        summary.rows_read += 1;
        if row.iter().any(str::is_empty) {
            summary.rows_dropped += 1;
            continue;
        }

        out.clear();
        for (i, field) in row.iter().enumerate() {
            if i == text_col {
                normalizer.normalize_into(field, &mut cleaned);
                out.push_field(&cleaned);
            } else {
                out.push_field(field);
            }
        }
        writer.write_record(&out)?;
        summary.rows_written += 1;
    }
    writer.flush().map_err(|e| LingoError::io(tmp, e))?;
    Ok(summary)
}

/// Shuffles `records` with a seeded generator and splits off a test set.
///
/// The test set takes `ceil(len × test_ratio)` records; the rest train. The
/// same seed and input always give the same split.
///
/// # Errors
///
/// `Config` for a ratio outside `(0, 1)` and `InvalidSplit` when either side
/// would be empty.
pub fn train_test_split<T>(mut records: Vec<T>, config: &SplitConfig) -> Result<(Vec<T>, Vec<T>)> {
    config.validate()?;
    let n = records.len();
    let n_test = (n as f64 * config.test_ratio).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(LingoError::InvalidSplit(format!(
            "{} records with test ratio {} leave {} for training and {} for testing",
            n,
            config.test_ratio,
            n.saturating_sub(n_test),
            n_test
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    records.shuffle(&mut rng);
    let train = records.split_off(n_test);
    Ok((train, records))
}

fn open_reader(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| LingoError::io(path, e))?;
    Ok(csv::Reader::from_reader(BufReader::new(file)))
}

fn column(headers: &StringRecord, name: &'static str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        .ok_or(LingoError::MissingColumn(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_text_and_language() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "corpus.csv",
            "Text,Language\nhello world,English\n\"bonjour, le monde\",French\n",
        );
        let records = load_corpus(&path).unwrap();
        assert_eq!(
            records,
            [
                CorpusRecord {
                    text: "hello world".into(),
                    language: "English".into()
                },
                CorpusRecord {
                    text: "bonjour, le monde".into(),
                    language: "French".into()
                },
            ]
        );
    }

    #[test]
    fn column_order_and_extras_do_not_matter() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "c.csv", "id,Language,Text\n1,Dutch,hallo wereld\n");
        let records = load_corpus(&path).unwrap();
        assert_eq!(records[0].language, "Dutch");
        assert_eq!(records[0].text, "hallo wereld");
    }

    #[test]
    fn drops_rows_with_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "c.csv", "Text,Language\n,English\nhola,\nciao,Italian\n");
        let records = load_corpus(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].language, "Italian");
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "c.csv", "Sentence,Language\nhello,English\n");
        let err = load_corpus(&path).unwrap_err();
        assert!(matches!(err, LingoError::MissingColumn("Text")));
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_corpus("/no/such/corpus.csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/no/such/corpus.csv"));
    }

    #[test]
    fn cleaning_normalizes_text_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            &dir,
            "raw.csv",
            "Text,Language\n\"Bonjour123!! le Monde\",French\nHello  World!,English\n,Spanish\n",
        );
        let output = dir.path().join("clean.csv");
        let summary = clean_corpus(&input, &output, &TextNormalizer::default()).unwrap();
        assert_eq!(
            summary,
            CleanSummary {
                rows_read: 3,
                rows_dropped: 1,
                rows_written: 2
            }
        );
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "Text,Language\nbonjour le monde,French\nhello world,English\n"
        );
    }

    #[test]
    fn cleaning_output_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "raw.csv", "Language,Text\nGerman,Guten Tag!\n");
        let output = dir.path().join("clean.csv");
        clean_corpus(&input, &output, &TextNormalizer::default()).unwrap();
        let records = load_corpus(&output).unwrap();
        assert_eq!(records[0].text, "guten tag");
    }

    #[test]
    fn malformed_row_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "raw.csv", "Text,Language\nhello,English\nbad,row,extra\n");
        let output = dir.path().join("clean.csv");
        let err = clean_corpus(&input, &output, &TextNormalizer::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!output.exists());
        assert!(!temp_path(&output).exists());
    }

    #[test]
    fn malformed_row_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "raw.csv", "Text,Language\nhello,English\nbad,row,extra\n");
        let output = write(&dir, "clean.csv", "Text,Language\nold,English\n");
        assert!(clean_corpus(&input, &output, &TextNormalizer::default()).is_err());
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "Text,Language\nold,English\n"
        );
    }

    #[test]
    fn split_sizes_round_test_up() {
        let config = SplitConfig::default();
        let (train, test) = train_test_split((0..11).collect::<Vec<_>>(), &config).unwrap();
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn split_is_a_partition() {
        let (train, test) = train_test_split((0..50).collect::<Vec<i32>>(), &SplitConfig::default()).unwrap();
        let mut all: Vec<i32> = train.into_iter().chain(test).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn split_is_seeded() {
        let config = SplitConfig::default();
        let a = train_test_split((0..100).collect::<Vec<_>>(), &config).unwrap();
        let b = train_test_split((0..100).collect::<Vec<_>>(), &config).unwrap();
        assert_eq!(a, b);

        let other = SplitConfig {
            seed: 7,
            ..config
        };
        let c = train_test_split((0..100).collect::<Vec<_>>(), &other).unwrap();
        assert_ne!(a.1, c.1);
    }

    #[test]
    fn split_rejects_degenerate_sizes() {
        let config = SplitConfig::default();
        assert!(matches!(
            train_test_split(vec![1], &config),
            Err(LingoError::InvalidSplit(_))
        ));
        assert!(matches!(
            train_test_split(Vec::<i32>::new(), &config),
            Err(LingoError::InvalidSplit(_))
        ));
        let bad = SplitConfig {
            test_ratio: 1.5,
            ..config
        };
        assert!(matches!(
            train_test_split(vec![1, 2, 3], &bad),
            Err(LingoError::Config(_))
        ));
    }
}
