use thiserror::Error;

use crate::config::ConfigError;

/// Startup and server failures. Everything here is fatal to the process.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load model bundle {path}: {source:#}")]
    Model {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to prepare database: {0}")]
    Database(#[from] StoreError),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Keyword and history storage failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
