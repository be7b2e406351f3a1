//! Final outcome of the classification pipeline.
//!
//! The outcome is kept structured until it reaches a page or a database row;
//! `display_text` and `confidence_text` are the only places labels are built.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Spam,
    NotSpam,
}

/// Which stage produced the label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Embedding,
    Lexical,
    Keyword,
}

impl Source {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Source::Embedding => "Embedding LR",
            Source::Lexical => "Naive Bayes",
            Source::Keyword => "Keyword match",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    Label { verdict: Verdict, source: Source },
    /// The embedding stage failed and nothing later overrode it.
    EmbeddingFailed { reason: String },
}

/// Positive-class probability in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Confidence(f64);

impl Confidence {
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self(probability.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn probability(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub decision: Decision,
    pub confidence: Option<Confidence>,
}

impl Classification {
    #[must_use]
    pub fn is_spam(&self) -> bool {
        matches!(
            self.decision,
            Decision::Label {
                verdict: Verdict::Spam,
                ..
            }
        )
    }

    #[must_use]
    pub fn source(&self) -> Option<Source> {
        match self.decision {
            Decision::Label { source, .. } => Some(source),
            Decision::EmbeddingFailed { .. } => None,
        }
    }

    #[must_use]
    pub fn display_text(&self) -> String {
        match &self.decision {
            Decision::Label {
                verdict: Verdict::Spam,
                source,
            } => format!("🚨 Spam detected! ({})", source.tag()),
            Decision::Label {
                verdict: Verdict::NotSpam,
                source,
            } => format!("✅ Not Spam ({})", source.tag()),
            Decision::EmbeddingFailed { reason } => format!("⚠️ ML Error: {reason}"),
        }
    }

    #[must_use]
    pub fn confidence_text(&self) -> Option<String> {
        self.confidence.map(|c| c.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_formats_one_decimal_percentage() {
        assert_eq!(Confidence::new(0.9734).to_string(), "97.3%");
        assert_eq!(Confidence::new(0.0).to_string(), "0.0%");
        assert_eq!(Confidence::new(1.0).to_string(), "100.0%");
    }

    #[test]
    fn confidence_keeps_double_precision() {
        let p = 0.123_456_789_012_3;
        assert_eq!(Confidence::new(p).probability(), p);
        assert_eq!(Confidence::new(0.876_549_999_999).to_string(), "87.7%");
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(Confidence::new(1.7).probability(), 1.0);
        assert_eq!(Confidence::new(-0.2).probability(), 0.0);
    }

    #[test]
    fn display_text_names_the_source() {
        let spam = Classification {
            decision: Decision::Label {
                verdict: Verdict::Spam,
                source: Source::Lexical,
            },
            confidence: Some(Confidence::new(0.8)),
        };
        assert_eq!(spam.display_text(), "🚨 Spam detected! (Naive Bayes)");
        assert!(spam.is_spam());

        let ham = Classification {
            decision: Decision::Label {
                verdict: Verdict::NotSpam,
                source: Source::Embedding,
            },
            confidence: Some(Confidence::new(0.1)),
        };
        assert_eq!(ham.display_text(), "✅ Not Spam (Embedding LR)");
        assert!(!ham.is_spam());
        assert_eq!(ham.confidence_text().as_deref(), Some("10.0%"));
    }

    #[test]
    fn failed_embedding_surfaces_reason() {
        let failed = Classification {
            decision: Decision::EmbeddingFailed {
                reason: "dimension mismatch".into(),
            },
            confidence: None,
        };
        assert_eq!(failed.display_text(), "⚠️ ML Error: dimension mismatch");
        assert_eq!(failed.source(), None);
        assert_eq!(failed.confidence_text(), None);
    }
}
