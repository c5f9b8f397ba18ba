//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Cleans and normalizes raw text
//! - **Tokenizer**: Splits normalized text into words
//! - **N-gram**: Extracts 1- to 3-character sequences as features

pub mod ngram;
pub mod normalizer;
pub mod tokenizer;

pub use ngram::{NgramExtractor, SlidingWindowExtractor, WordBoundedExtractor};
pub use normalizer::{normalize, TextNormalizer};
pub use tokenizer::Tokenizer;
