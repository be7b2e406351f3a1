//! Sentence-embedding bundle: hashed encoder, standard scaler, logistic regression.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;
use xxhash_rust::xxh3::xxh3_64;

use super::{
    BinaryClassifier, FeatureScaler, InferenceError, SentenceEncoder, ensure_finite, l2_normalize,
};

fn default_true() -> bool {
    true
}

/// Bag-of-words sentence encoder using signed feature hashing.
///
/// Each Unicode word lands in `xxh3(word) % dim` with a sign taken from the
/// top hash bit; the result is L2-normalized. Empty text encodes to zeros.
#[derive(Debug, Clone, Deserialize)]
pub struct HashingEncoder {
    dim: usize,
    #[serde(default = "default_true")]
    lowercase: bool,
}

impl HashingEncoder {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            lowercase: true,
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl SentenceEncoder for HashingEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>, InferenceError> {
        if self.dim == 0 {
            return Err(InferenceError::Backend(
                "encoder has zero output dimensions".into(),
            ));
        }
        let mut embedding = vec![0.0f32; self.dim];
        for word in text.unicode_words() {
            let hash = if self.lowercase {
                xxh3_64(word.to_lowercase().as_bytes())
            } else {
                xxh3_64(word.as_bytes())
            };
            #[allow(clippy::cast_possible_truncation)]
            let slot = (hash % self.dim as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            embedding[slot] += sign;
        }
        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl StandardScaler {
    #[must_use]
    pub fn new(mean: Vec<f32>, scale: Vec<f32>) -> Self {
        Self { mean, scale }
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError> {
        if features.len() != self.mean.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| {
                // zero variance columns are only centered
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (value - mean) / scale
            })
            .collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    coef: Vec<f32>,
    intercept: f32,
}

impl LogisticRegression {
    #[must_use]
    pub fn new(coef: Vec<f32>, intercept: f32) -> Self {
        Self { coef, intercept }
    }
}

impl BinaryClassifier for LogisticRegression {
    fn predict_proba(&self, features: &[f32]) -> Result<f64, InferenceError> {
        if features.len() != self.coef.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.coef.len(),
                actual: features.len(),
            });
        }
        let decision = features
            .iter()
            .zip(&self.coef)
            .map(|(x, w)| f64::from(*x) * f64::from(*w))
            .sum::<f64>()
            + f64::from(self.intercept);
        let decision = ensure_finite(decision)?;
        Ok(1.0 / (1.0 + (-decision).exp()))
    }
}

/// The serialized embedding bundle.
#[derive(Debug, Deserialize)]
pub struct EmbeddingBundle {
    pub embedding_model: HashingEncoder,
    pub scaler: StandardScaler,
    pub clf: LogisticRegression,
}

impl EmbeddingBundle {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read embedding bundle {:?}", path.as_ref()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let bundle: Self =
            serde_json::from_str(raw).context("failed to parse embedding bundle json")?;
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<()> {
        let dim = self.embedding_model.dim;
        anyhow::ensure!(dim > 0, "embedding dimension must be positive");
        anyhow::ensure!(
            self.scaler.mean.len() == dim,
            "scaler mean length {} does not match embedding dimension {dim}",
            self.scaler.mean.len()
        );
        anyhow::ensure!(
            self.scaler.scale.len() == dim,
            "scaler scale length {} does not match embedding dimension {dim}",
            self.scaler.scale.len()
        );
        anyhow::ensure!(
            self.clf.coef.len() == dim,
            "classifier coefficient length {} does not match embedding dimension {dim}",
            self.clf.coef.len()
        );
        Ok(())
    }
}
