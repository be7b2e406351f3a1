use chrono::NaiveDateTime;

use super::Classification;

/// A word or phrase that marks text as spam on a case-insensitive substring match.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct SpamKeyword {
    pub id: i64,
    pub word: String,
}

/// One stored classification request.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct EmailRecord {
    pub id: i64,
    pub email_text: String,
    pub result: String,
    pub confidence: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Row to append; `id` and `created_at` are assigned by storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEmailRecord {
    pub email_text: String,
    pub result: String,
    pub confidence: Option<String>,
}

impl NewEmailRecord {
    #[must_use]
    pub fn from_classification(email_text: &str, classification: &Classification) -> Self {
        Self {
            email_text: email_text.to_string(),
            result: classification.display_text(),
            confidence: classification.confidence_text(),
        }
    }
}
