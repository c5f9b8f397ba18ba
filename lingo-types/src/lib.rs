//! Core types and configuration for the Lingo language identifier.
//!
//! This crate provides the plain types shared across the Lingo workspace:
//!
//! - **Packed n-gram keys**: [`NGram`] fits up to three characters in a `u64`
//! - **Configuration**: serde-friendly structs for every pipeline stage
//! - **Validation**: [`ConfigError`] for out-of-range settings

#![warn(missing_docs)]

use core::fmt;

use serde::{Deserialize, Serialize};

/// A character n-gram of 1 to 3 characters packed into a 64-bit integer.
///
/// Characters are packed as three 21-bit slots, first character in the most
/// significant slot. Each slot holds `char + 1`; an empty slot is 0. This
/// representation:
/// - Works as a hash map key without allocation
/// - Orders exactly like the string form compared by code point, so sorting
///   packed keys sorts a vocabulary alphabetically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NGram(pub u64);

const SLOT_BITS: u32 = 21;
const SLOT_MASK: u64 = (1 << SLOT_BITS) - 1;

impl NGram {
    /// Maximum number of characters in an n-gram.
    pub const MAX_LEN: usize = 3;

    /// Creates an n-gram from a slice of 1 to 3 characters.
    ///
    /// Characters past [`NGram::MAX_LEN`] are ignored.
    #[inline(always)]
    pub fn from_chars(chars: &[char]) -> Self {
        debug_assert!(
            !chars.is_empty() && chars.len() <= Self::MAX_LEN,
            "n-gram requires 1 to 3 characters"
        );
        let mut packed = 0u64;
        for (slot, &c) in chars.iter().take(Self::MAX_LEN).enumerate() {
            let shift = SLOT_BITS * (Self::MAX_LEN - 1 - slot) as u32;
            packed |= (c as u64 + 1) << shift;
        }
        Self(packed)
    }

    /// Parses an n-gram from its string form.
    ///
    /// Returns `None` unless the string holds 1 to 3 characters.
    pub fn parse(s: &str) -> Option<Self> {
        let mut buf = ['\0'; Self::MAX_LEN];
        let mut len = 0;
        for c in s.chars() {
            if len == Self::MAX_LEN {
                return None;
            }
            buf[len] = c;
            len += 1;
        }
        if len == 0 {
            return None;
        }
        Some(Self::from_chars(&buf[..len]))
    }

    /// Returns the characters of this n-gram in order.
    pub fn chars(self) -> impl Iterator<Item = char> {
        (0..Self::MAX_LEN).filter_map(move |slot| {
            let shift = SLOT_BITS * (Self::MAX_LEN - 1 - slot) as u32;
            let value = (self.0 >> shift) & SLOT_MASK;
            if value == 0 {
                None
            } else {
                char::from_u32((value - 1) as u32)
            }
        })
    }

    /// Returns the number of characters (1 to 3).
    #[inline]
    pub fn len(self) -> usize {
        self.chars().count()
    }

    /// Returns `true` for the all-empty key, which no extractor produces.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the underlying packed value.
    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NGram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Errors raised by configuration validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// N-gram bounds must satisfy `1 <= min <= max <= 3`.
    InvalidNgramRange {
        /// Requested lower bound.
        min: usize,
        /// Requested upper bound.
        max: usize,
    },
    /// Additive smoothing must be strictly positive and finite.
    InvalidAlpha {
        /// The rejected smoothing value.
        alpha: f64,
    },
    /// The held-out fraction must lie strictly between 0 and 1.
    InvalidTestRatio {
        /// The rejected ratio.
        ratio: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNgramRange { min, max } => {
                write!(
                    f,
                    "invalid n-gram range {}..={} (expected 1 <= min <= max <= {})",
                    min,
                    max,
                    NGram::MAX_LEN
                )
            }
            ConfigError::InvalidAlpha { alpha } => {
                write!(f, "smoothing alpha must be positive and finite, got {}", alpha)
            }
            ConfigError::InvalidTestRatio { ratio } => {
                write!(f, "test ratio must be in (0, 1), got {}", ratio)
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Inclusive range of n-gram lengths to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramRange {
    /// Shortest n-gram length.
    pub min: usize,
    /// Longest n-gram length.
    pub max: usize,
}

impl Default for NgramRange {
    fn default() -> Self {
        Self { min: 1, max: 3 }
    }
}

impl NgramRange {
    /// Creates a validated range.
    pub fn new(min: usize, max: usize) -> Result<Self, ConfigError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Checks `1 <= min <= max <= 3`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min == 0 || self.min > self.max || self.max > NGram::MAX_LEN {
            return Err(ConfigError::InvalidNgramRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Returns `true` if `n` is within the range.
    #[inline(always)]
    pub const fn contains(&self, n: usize) -> bool {
        n >= self.min && n <= self.max
    }

    /// Iterates the lengths in ascending order.
    #[inline]
    pub fn lengths(&self) -> core::ops::RangeInclusive<usize> {
        self.min..=self.max
    }
}

/// How character n-grams are cut from normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analyzer {
    /// Windows slide over the whole text, crossing spaces.
    #[default]
    Char,
    /// Windows stay inside space-padded words.
    CharWordBounded,
}

/// Which letters survive normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPolicy {
    /// Only `a`-`z` survive. Accented and non-Latin letters are dropped, so
    /// languages written in other scripts normalize to empty text.
    #[default]
    Latin,
    /// Alphabetic characters of every script survive.
    Unicode,
}

/// Row normalization applied to TF-IDF vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    /// Scale each row to unit Euclidean length.
    #[default]
    L2,
    /// Leave raw tf-idf weights.
    None,
}

/// Text normalizer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Letters kept after lowercasing.
    #[serde(default)]
    pub script: ScriptPolicy,
}

impl NormalizerConfig {
    /// Keeps letters of every script.
    pub const fn unicode() -> Self {
        Self {
            script: ScriptPolicy::Unicode,
        }
    }
}

/// TF-IDF feature extractor options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// N-gram cutting strategy.
    #[serde(default)]
    pub analyzer: Analyzer,
    /// N-gram lengths.
    #[serde(default)]
    pub ngram_range: NgramRange,
    /// Add one to document frequencies, as if an extra document held every n-gram.
    #[serde(default = "default_true")]
    pub smooth_idf: bool,
    /// Replace raw counts with `1 + ln(count)`.
    #[serde(default)]
    pub sublinear_tf: bool,
    /// Row normalization.
    #[serde(default)]
    pub norm: Norm,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            analyzer: Analyzer::Char,
            ngram_range: NgramRange::default(),
            smooth_idf: true,
            sublinear_tf: false,
            norm: Norm::L2,
        }
    }
}

/// Multinomial Naive Bayes options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Additive (Laplace/Lidstone) smoothing.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Learn class priors from label frequencies; uniform priors otherwise.
    #[serde(default = "default_true")]
    pub fit_prior: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            fit_prior: true,
        }
    }
}

impl ClassifierConfig {
    /// Checks that `alpha` is positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(ConfigError::InvalidAlpha { alpha: self.alpha });
        }
        Ok(())
    }
}

/// Train/test split options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of records held out for evaluation.
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,
    /// Shuffle seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: default_test_ratio(),
            seed: default_seed(),
        }
    }
}

impl SplitConfig {
    /// Checks `0 < test_ratio < 1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(ConfigError::InvalidTestRatio {
                ratio: self.test_ratio,
            });
        }
        Ok(())
    }
}

/// Complete pipeline configuration.
///
/// Every field falls back to its default when missing from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Normalizer stage.
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    /// Feature extraction stage.
    #[serde(default)]
    pub vectorizer: VectorizerConfig,
    /// Classifier stage.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Evaluation split used by training.
    #[serde(default)]
    pub split: SplitConfig,
}

impl PipelineConfig {
    /// Validates every stage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vectorizer.ngram_range.validate()?;
        self.classifier.validate()?;
        self.split.validate()
    }
}

fn default_true() -> bool {
    true
}

fn default_alpha() -> f64 {
    1.0
}

fn default_test_ratio() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}
