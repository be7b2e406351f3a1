//! Shared test support utilities
//!
//! Provides `MockStore` implementing both `KeywordSource` and `HistoryStore`,
//! plus stub models whose output is fixed up front.

use crate::domain::{EmailRecord, NewEmailRecord, SpamKeyword};
use crate::error::StoreError;
use crate::model::{
    BinaryClassifier, HashingEncoder, InferenceError, SparseClassifier, StandardScaler,
    TermVectorizer,
};
use crate::pipeline::{EmbeddingStage, LexicalStage};
use crate::port::{HistoryStore, KeywordSource};
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory store that captures appended records.
pub struct MockStore {
    keywords: Mutex<Vec<SpamKeyword>>,
    records: Mutex<Vec<EmailRecord>>,
    should_fail: AtomicBool,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            keywords: Mutex::new(Vec::new()),
            records: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn with_keywords(words: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut keywords = store.keywords.lock().unwrap();
            for (idx, word) in words.iter().enumerate() {
                keywords.push(SpamKeyword {
                    id: idx as i64 + 1,
                    word: (*word).to_string(),
                });
            }
        }
        store
    }

    /// Make every keyword and history call fail.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<EmailRecord> {
        self.records.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock store failure".to_string()));
        }
        Ok(())
    }
}

impl KeywordSource for MockStore {
    fn all_keywords(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SpamKeyword>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            self.check()?;
            Ok(self.keywords.lock().unwrap().clone())
        })
    }
}

impl HistoryStore for MockStore {
    fn append(
        &self,
        record: NewEmailRecord,
    ) -> Pin<Box<dyn Future<Output = Result<i64, StoreError>> + Send + '_>> {
        Box::pin(async move {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let id = records.len() as i64 + 1;
            records.push(EmailRecord {
                id,
                email_text: record.email_text,
                result: record.result,
                confidence: record.confidence,
                created_at: Utc::now().naive_utc(),
            });
            Ok(id)
        })
    }

    fn all_records(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EmailRecord>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            self.check()?;
            Ok(self.records())
        })
    }
}

/// Classifier that ignores its input.
pub struct StubClassifier {
    outcome: Result<f64, String>,
}

impl StubClassifier {
    pub fn probability(probability: f64) -> Self {
        Self {
            outcome: Ok(probability),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
        }
    }

    fn answer(&self) -> Result<f64, InferenceError> {
        self.outcome.clone().map_err(InferenceError::Backend)
    }
}

impl BinaryClassifier for StubClassifier {
    fn predict_proba(&self, _features: &[f32]) -> Result<f64, InferenceError> {
        self.answer()
    }
}

impl SparseClassifier for StubClassifier {
    fn predict_proba(&self, _features: &[(usize, f32)]) -> Result<f64, InferenceError> {
        self.answer()
    }
}

/// Embedding stage whose final answer comes from `classifier`.
pub fn fixed_embedding_stage(classifier: StubClassifier) -> EmbeddingStage {
    EmbeddingStage::new(
        Arc::new(HashingEncoder::new(4)),
        Arc::new(StandardScaler::new(vec![0.0; 4], vec![1.0; 4])),
        Arc::new(classifier),
    )
}

/// Lexical stage whose final answer comes from `classifier`.
pub fn fixed_lexical_stage(classifier: StubClassifier) -> LexicalStage {
    let vocabulary: HashMap<String, usize> = [("free".to_string(), 0)].into();
    LexicalStage::new(
        Arc::new(TermVectorizer::new(vocabulary, vec![])),
        Arc::new(classifier),
    )
}
