//! Probabilistic classifiers over feature vectors.
//!
//! [`MultinomialNaiveBayes`] learns one log prior per class and one log
//! likelihood per (class, feature) pair. Scoring a vector is a sparse dot
//! product per class, so prediction costs `O(classes × nnz)`.

mod naive_bayes;

pub use naive_bayes::{FittedNaiveBayes, MultinomialNaiveBayes};
