//! Language identification with character n-grams.
//!
//! Raw text is normalized ([`analyzer`]), cut into 1- to 3-character
//! n-grams weighted by TF-IDF ([`vectorize`]) and scored by a multinomial
//! Naive Bayes model ([`classify`]). [`Pipeline`] chains the three stages and
//! persists them as one versioned JSON [`artifact`].
//!
//! Training from a CSV corpus, with a seeded held-out evaluation, is a single
//! call to [`training::train_and_save`].

pub mod analyzer;
pub mod artifact;
pub mod classify;
pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod training;
pub mod vectorize;

pub use error::{ErrorKind, LingoError, Result};
pub use pipeline::{FittedPipeline, Pipeline};
