use std::sync::Arc;

use crate::domain::Verdict;
use crate::model::{
    BinaryClassifier, FeatureScaler, InferenceError, SentenceEncoder, SparseClassifier,
    TextVectorizer,
};

/// A single classifier's answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub is_spam: bool,
    /// Probability of the spam class.
    pub probability: f64,
}

impl Prediction {
    #[must_use]
    pub fn verdict(self) -> Verdict {
        if self.is_spam {
            Verdict::Spam
        } else {
            Verdict::NotSpam
        }
    }
}

/// Encode, scale, then classify.
#[derive(Clone)]
pub struct EmbeddingStage {
    encoder: Arc<dyn SentenceEncoder>,
    scaler: Arc<dyn FeatureScaler>,
    classifier: Arc<dyn BinaryClassifier>,
}

impl EmbeddingStage {
    #[must_use]
    pub fn new(
        encoder: Arc<dyn SentenceEncoder>,
        scaler: Arc<dyn FeatureScaler>,
        classifier: Arc<dyn BinaryClassifier>,
    ) -> Self {
        Self {
            encoder,
            scaler,
            classifier,
        }
    }

    pub fn predict(&self, text: &str) -> Result<Prediction, InferenceError> {
        let embedding = self.encoder.encode(text)?;
        let scaled = self.scaler.transform(&embedding)?;
        let is_spam = self.classifier.predict(&scaled)?;
        let probability = self.classifier.predict_proba(&scaled)?;
        Ok(Prediction {
            is_spam,
            probability,
        })
    }
}

/// Vectorize into sparse term weights, then classify.
#[derive(Clone)]
pub struct LexicalStage {
    vectorizer: Arc<dyn TextVectorizer>,
    classifier: Arc<dyn SparseClassifier>,
}

impl LexicalStage {
    #[must_use]
    pub fn new(vectorizer: Arc<dyn TextVectorizer>, classifier: Arc<dyn SparseClassifier>) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    pub fn predict(&self, text: &str) -> Result<Prediction, InferenceError> {
        let features = self.vectorizer.transform(text)?;
        let is_spam = self.classifier.predict(&features)?;
        let probability = self.classifier.predict_proba(&features)?;
        Ok(Prediction {
            is_spam,
            probability,
        })
    }
}
