use crate::adapter::sqlite::schema::SCHEMA;
use crate::domain::{EmailRecord, NewEmailRecord, SpamKeyword};
use crate::error::StoreError;
use crate::port::{HistoryStore, KeywordSource};
use sqlx::Executor;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed keyword list and classification history.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create both tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        self.pool.execute(SCHEMA).await?;
        info!("Database schema ready");
        Ok(())
    }

    /// Add a keyword; an existing identical word is left as is.
    pub async fn insert_keyword(&self, word: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT OR IGNORE INTO spam_keyword (word) VALUES (?)")
            .bind(word)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl KeywordSource for SqliteStore {
    fn all_keywords(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SpamKeyword>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let keywords = sqlx::query_as::<_, SpamKeyword>(
                "SELECT id, word FROM spam_keyword ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(keywords)
        })
    }
}

impl HistoryStore for SqliteStore {
    fn append(
        &self,
        record: NewEmailRecord,
    ) -> Pin<Box<dyn Future<Output = Result<i64, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let done = sqlx::query(
                "INSERT INTO email_record (email_text, result, confidence) VALUES (?, ?, ?)",
            )
            .bind(&record.email_text)
            .bind(&record.result)
            .bind(&record.confidence)
            .execute(&self.pool)
            .await?;
            Ok(done.last_insert_rowid())
        })
    }

    fn all_records(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EmailRecord>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let records = sqlx::query_as::<_, EmailRecord>(
                r"
                SELECT id, email_text, result, confidence, created_at
                FROM email_record
                ORDER BY id
                ",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(records)
        })
    }
}
