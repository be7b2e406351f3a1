use crate::adapter::sqlite::SqliteStore;
use crate::config::Settings;
use crate::error::AppError;
use crate::model::ModelSet;
use crate::pipeline::ClassificationPipeline;
use crate::port::{HistoryStore, KeywordSource};
use std::sync::Arc;

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ClassificationPipeline>,
    pub history: Arc<dyn HistoryStore>,
}

impl AppState {
    #[must_use]
    pub fn new(pipeline: Arc<ClassificationPipeline>, history: Arc<dyn HistoryStore>) -> Self {
        Self { pipeline, history }
    }

    /// Open the database, ensure its schema, and load both model bundles.
    pub async fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let store = Arc::new(
            SqliteStore::connect(&settings.database_url, settings.db_max_connections).await?,
        );
        store.migrate().await?;

        let models = ModelSet::load(&settings.embedding_model_path, &settings.lexical_model_path)?;

        let keywords: Arc<dyn KeywordSource> = store.clone();
        let history: Arc<dyn HistoryStore> = store;
        let pipeline = Arc::new(ClassificationPipeline::from_models(models, keywords));

        Ok(Self::new(pipeline, history))
    }
}
