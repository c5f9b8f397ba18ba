//! TF-IDF feature extraction over character n-grams.
//!
//! Fitting enumerates the n-grams of every training text, counts in how many
//! documents each occurs, and freezes a sorted vocabulary with one idf weight
//! per n-gram. Transforming counts the known n-grams of a text, weighs them
//! by tf × idf and scales the row to unit length.
//!
//! Memory Layout:
//! - The vocabulary is a sorted `Vec<NGram>`; position is the feature index
//! - A hash index maps n-gram to feature index for transform lookups
//! - Feature vectors are sparse `(index, weight)` lists sorted by index
//!
//! Threading:
//! - [`FittedVectorizer`] is immutable after `fit`. `transform` allocates its
//!   own scratch space, so one instance can serve many threads.

mod api;
mod builder;
mod scoring;
mod stats;
mod types;

pub use stats::VocabularyStats;
pub use types::{FeatureVector, FittedVectorizer, TfidfVectorizer};
