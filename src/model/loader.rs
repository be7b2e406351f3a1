use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::embedding::EmbeddingBundle;
use super::lexical::LexicalBundle;
use crate::error::AppError;
use crate::pipeline::{EmbeddingStage, LexicalStage};

/// Both classifier stages, loaded once at startup and shared read-only.
pub struct ModelSet {
    pub embedding: EmbeddingStage,
    pub lexical: LexicalStage,
}

impl ModelSet {
    /// Load both bundles. Any failure here is fatal to startup.
    pub fn load(embedding_path: &Path, lexical_path: &Path) -> Result<Self, AppError> {
        let embedding =
            EmbeddingBundle::from_path(embedding_path).map_err(|source| AppError::Model {
                path: embedding_path.display().to_string(),
                source,
            })?;
        info!(
            path = %embedding_path.display(),
            dim = embedding.embedding_model.dim(),
            "Loaded embedding bundle"
        );

        let lexical = LexicalBundle::from_path(lexical_path).map_err(|source| AppError::Model {
            path: lexical_path.display().to_string(),
            source,
        })?;
        info!(
            path = %lexical_path.display(),
            features = lexical.vectorizer.n_features(),
            "Loaded lexical bundle"
        );

        Ok(Self {
            embedding: EmbeddingStage::new(
                Arc::new(embedding.embedding_model),
                Arc::new(embedding.scaler),
                Arc::new(embedding.clf),
            ),
            lexical: LexicalStage::new(Arc::new(lexical.vectorizer), Arc::new(lexical.nb_clf)),
        })
    }
}
