//! Inference contracts for the two model bundles.
//!
//! Each sub-object of a bundle sits behind one of these traits so that any
//! implementation honoring the contract can be dropped in.

pub mod embedding;
pub mod lexical;
pub mod loader;

use thiserror::Error;

pub use embedding::{EmbeddingBundle, HashingEncoder, LogisticRegression, StandardScaler};
pub use lexical::{LexicalBundle, MultinomialNaiveBayes, TermVectorizer};
pub use loader::ModelSet;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("feature index {index} out of range for {len} features")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("model produced a non-finite score")]
    NonFinite,
    #[error("{0}")]
    Backend(String),
}

/// `(column, weight)` pairs, sorted by column, zero weights omitted.
pub type SparseVector = Vec<(usize, f32)>;

pub trait SentenceEncoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>, InferenceError>;
}

pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError>;
}

/// Binary classifier over dense features.
pub trait BinaryClassifier: Send + Sync {
    /// Probability of the positive (spam) class.
    fn predict_proba(&self, features: &[f32]) -> Result<f64, InferenceError>;

    fn predict(&self, features: &[f32]) -> Result<bool, InferenceError> {
        Ok(self.predict_proba(features)? > 0.5)
    }
}

pub trait TextVectorizer: Send + Sync {
    fn transform(&self, text: &str) -> Result<SparseVector, InferenceError>;
}

/// Binary classifier over sparse term features.
pub trait SparseClassifier: Send + Sync {
    /// Probability of the positive (spam) class.
    fn predict_proba(&self, features: &[(usize, f32)]) -> Result<f64, InferenceError>;

    fn predict(&self, features: &[(usize, f32)]) -> Result<bool, InferenceError> {
        Ok(self.predict_proba(features)? > 0.5)
    }
}

pub(crate) fn l2_normalize(values: &mut [f32]) {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in values.iter_mut() {
            *value /= norm;
        }
    }
}

pub(crate) fn ensure_finite(score: f64) -> Result<f64, InferenceError> {
    if score.is_finite() {
        Ok(score)
    } else {
        Err(InferenceError::NonFinite)
    }
}
