//! Three-stage spam classification.
//!
//! Stages run in a fixed order and each may override the previous outcome:
//!
//! 1. the embedding classifier sets the label and confidence, or an error
//!    label if it fails;
//! 2. the lexical classifier replaces label and confidence only when it
//!    predicts spam;
//! 3. a keyword hit replaces the label and keeps whatever confidence the
//!    earlier stages left.
//!
//! No stage failure escapes `classify`.

pub mod keywords;
pub mod stages;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Classification, Confidence, Decision, Source, Verdict};
use crate::model::{InferenceError, ModelSet};
use crate::port::KeywordSource;

pub use keywords::{KeywordCheckError, contains_keyword};
pub use stages::{EmbeddingStage, LexicalStage, Prediction};

pub struct ClassificationPipeline {
    embedding: EmbeddingStage,
    lexical: LexicalStage,
    keywords: Arc<dyn KeywordSource>,
}

impl ClassificationPipeline {
    #[must_use]
    pub fn new(
        embedding: EmbeddingStage,
        lexical: LexicalStage,
        keywords: Arc<dyn KeywordSource>,
    ) -> Self {
        Self {
            embedding,
            lexical,
            keywords,
        }
    }

    #[must_use]
    pub fn from_models(models: ModelSet, keywords: Arc<dyn KeywordSource>) -> Self {
        Self::new(models.embedding, models.lexical, keywords)
    }

    pub async fn classify(&self, text: &str) -> Classification {
        let embedding = self.embedding.predict(text);

        let lexical = self.lexical.predict(text);
        if let Err(e) = &lexical {
            warn!(error = %e, "Naive Bayes prediction failed");
        }

        let keyword_matched = match self.keyword_match(text).await {
            Ok(matched) => matched,
            Err(e) => {
                debug!(error = %e, "Keyword check skipped");
                false
            }
        };

        combine(embedding, lexical, keyword_matched)
    }

    async fn keyword_match(&self, text: &str) -> Result<bool, KeywordCheckError> {
        let keywords = self.keywords.all_keywords().await?;
        Ok(contains_keyword(text, &keywords)?)
    }
}

/// Fold the three stage outcomes into the final classification.
#[must_use]
pub fn combine(
    embedding: Result<Prediction, InferenceError>,
    lexical: Result<Prediction, InferenceError>,
    keyword_matched: bool,
) -> Classification {
    let mut outcome = match embedding {
        Ok(prediction) => Classification {
            decision: Decision::Label {
                verdict: prediction.verdict(),
                source: Source::Embedding,
            },
            confidence: Some(Confidence::new(prediction.probability)),
        },
        Err(e) => Classification {
            decision: Decision::EmbeddingFailed {
                reason: e.to_string(),
            },
            confidence: None,
        },
    };

    match lexical {
        Ok(prediction) if prediction.is_spam => {
            outcome = Classification {
                decision: Decision::Label {
                    verdict: Verdict::Spam,
                    source: Source::Lexical,
                },
                confidence: Some(Confidence::new(prediction.probability)),
            };
        }
        _ => {}
    }

    if keyword_matched {
        outcome.decision = Decision::Label {
            verdict: Verdict::Spam,
            source: Source::Keyword,
        };
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        MockStore, StubClassifier, fixed_embedding_stage, fixed_lexical_stage,
    };
    use tracing_test::traced_test;

    fn ham(probability: f64) -> Result<Prediction, InferenceError> {
        Ok(Prediction {
            is_spam: false,
            probability,
        })
    }

    fn spam(probability: f64) -> Result<Prediction, InferenceError> {
        Ok(Prediction {
            is_spam: true,
            probability,
        })
    }

    fn failed() -> Result<Prediction, InferenceError> {
        Err(InferenceError::Backend("model exploded".into()))
    }

    #[test]
    fn embedding_result_stands_when_nothing_overrides() {
        let outcome = combine(ham(0.123), failed(), false);
        assert_eq!(outcome.display_text(), "✅ Not Spam (Embedding LR)");
        assert_eq!(outcome.confidence_text().as_deref(), Some("12.3%"));
    }

    #[test]
    fn embedding_spam_is_reported_with_its_probability() {
        let outcome = combine(spam(0.91), ham(0.2), false);
        assert_eq!(outcome.display_text(), "🚨 Spam detected! (Embedding LR)");
        assert_eq!(outcome.confidence_text().as_deref(), Some("91.0%"));
    }

    #[test]
    fn lexical_spam_overrides_label_and_confidence() {
        let outcome = combine(ham(0.1), spam(0.876), false);
        assert_eq!(outcome.display_text(), "🚨 Spam detected! (Naive Bayes)");
        assert_eq!(outcome.confidence_text().as_deref(), Some("87.6%"));
    }

    #[test]
    fn lexical_negative_never_downgrades_spam() {
        let outcome = combine(spam(0.7), ham(0.01), false);
        assert_eq!(outcome.source(), Some(Source::Embedding));
        assert!(outcome.is_spam());
    }

    #[test]
    fn lexical_spam_replaces_embedding_error() {
        let outcome = combine(failed(), spam(0.6), false);
        assert_eq!(outcome.display_text(), "🚨 Spam detected! (Naive Bayes)");
        assert_eq!(outcome.confidence_text().as_deref(), Some("60.0%"));
    }

    #[test]
    fn embedding_error_surfaces_when_not_overridden() {
        let outcome = combine(failed(), ham(0.3), false);
        assert_eq!(outcome.display_text(), "⚠️ ML Error: model exploded");
        assert_eq!(outcome.confidence, None);
    }

    #[test]
    fn keyword_overrides_label_but_keeps_confidence() {
        let outcome = combine(ham(0.05), ham(0.02), true);
        assert_eq!(outcome.display_text(), "🚨 Spam detected! (Keyword match)");
        assert_eq!(outcome.confidence_text().as_deref(), Some("5.0%"));
    }

    #[test]
    fn keyword_overrides_even_after_both_stages_fail() {
        let outcome = combine(failed(), failed(), true);
        assert_eq!(outcome.source(), Some(Source::Keyword));
        assert_eq!(outcome.confidence, None);
    }

    #[tokio::test]
    async fn classify_applies_stored_keywords() {
        let store = Arc::new(MockStore::with_keywords(&["lottery"]));
        let pipeline = ClassificationPipeline::new(
            fixed_embedding_stage(StubClassifier::probability(0.1)),
            fixed_lexical_stage(StubClassifier::probability(0.2)),
            store,
        );

        let outcome = pipeline.classify("You won the Lottery!!!").await;
        assert_eq!(outcome.source(), Some(Source::Keyword));
        assert_eq!(outcome.confidence_text().as_deref(), Some("10.0%"));

        let outcome = pipeline.classify("Lunch at noon?").await;
        assert_eq!(outcome.display_text(), "✅ Not Spam (Embedding LR)");
    }

    #[tokio::test]
    #[traced_test]
    async fn classify_logs_and_ignores_lexical_failure() {
        let pipeline = ClassificationPipeline::new(
            fixed_embedding_stage(StubClassifier::probability(0.25)),
            fixed_lexical_stage(StubClassifier::failing("vocabulary missing")),
            Arc::new(MockStore::new()),
        );

        let outcome = pipeline.classify("quarterly report attached").await;
        assert_eq!(outcome.display_text(), "✅ Not Spam (Embedding LR)");
        assert_eq!(outcome.confidence_text().as_deref(), Some("25.0%"));
        assert!(logs_contain("Naive Bayes prediction failed"));
    }

    #[tokio::test]
    async fn classify_survives_keyword_store_outage() {
        let store = Arc::new(MockStore::with_keywords(&["winner"]));
        store.set_should_fail(true);
        let pipeline = ClassificationPipeline::new(
            fixed_embedding_stage(StubClassifier::probability(0.4)),
            fixed_lexical_stage(StubClassifier::probability(0.3)),
            store,
        );

        let outcome = pipeline.classify("winner winner").await;
        assert_eq!(outcome.source(), Some(Source::Embedding));
    }

    #[tokio::test]
    async fn classify_reports_embedding_failure_text() {
        let pipeline = ClassificationPipeline::new(
            fixed_embedding_stage(StubClassifier::failing("encoder offline")),
            fixed_lexical_stage(StubClassifier::probability(0.1)),
            Arc::new(MockStore::new()),
        );

        let outcome = pipeline.classify("").await;
        assert_eq!(outcome.display_text(), "⚠️ ML Error: encoder offline");
    }
}
