use std::env;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://spam.db";
const DEFAULT_HTTP_PORT: u16 = 5000;
const DEFAULT_EMBEDDING_MODEL: &str = "models/sentence_embedding_spam_model.json";
const DEFAULT_LEXICAL_MODEL: &str = "models/tfidf_nb_spam_model.json";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub http_port: u16,
    /// Sentence-embedding bundle (encoder + scaler + logistic classifier)
    pub embedding_model_path: PathBuf,
    /// Term-frequency bundle (vectorizer + Naive Bayes)
    pub lexical_model_path: PathBuf,
    pub db_max_connections: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("failed to read {name} from {path}: {source}")]
    Unreadable {
        name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_non_empty("SPAM_DATABASE_URL", &self.database_url)?;
        validate_port("HTTP_PORT", self.http_port)?;
        validate_non_empty(
            "SPAM_EMBEDDING_MODEL",
            &self.embedding_model_path.to_string_lossy(),
        )?;
        validate_non_empty(
            "SPAM_LEXICAL_MODEL",
            &self.lexical_model_path.to_string_lossy(),
        )?;
        if self.db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: "SPAM_DB_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// `lookup` returns `None` for unset variables. `SPAM_DATABASE_URL` honours
    /// the `_FILE` suffix (Docker Secrets) through the same lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup_or_file(&lookup, "SPAM_DATABASE_URL")?
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let http_port = parse_or("HTTP_PORT", lookup("HTTP_PORT"), DEFAULT_HTTP_PORT)?;
        let embedding_model_path = lookup("SPAM_EMBEDDING_MODEL")
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string())
            .into();
        let lexical_model_path = lookup("SPAM_LEXICAL_MODEL")
            .unwrap_or_else(|| DEFAULT_LEXICAL_MODEL.to_string())
            .into();
        let db_max_connections = parse_or(
            "SPAM_DB_MAX_CONNECTIONS",
            lookup("SPAM_DB_MAX_CONNECTIONS"),
            DEFAULT_DB_MAX_CONNECTIONS,
        )?;

        let settings = Settings {
            database_url,
            http_port,
            embedding_model_path,
            lexical_model_path,
            db_max_connections,
        };
        settings.validate()?;
        Ok(settings)
    }
}

fn validate_non_empty(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            name,
            reason: "cannot be empty".into(),
        });
    }
    Ok(())
}

fn validate_port(name: &'static str, port: u16) -> Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "Port cannot be 0".into(),
        });
    }
    Ok(())
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            reason: format!("{value:?}: {e}"),
        }),
        None => Ok(default),
    }
}

/// `NAME_FILE` wins over `NAME` when both are set.
fn lookup_or_file<F>(lookup: &F, name: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file_env = format!("{name}_FILE");
    if let Some(path) = lookup(&file_env) {
        return fs::read_to_string(&path)
            .map(|content| Some(content.trim().to_string()))
            .map_err(|source| ConfigError::Unreadable {
                name: file_env,
                path,
                source,
            });
    }
    Ok(lookup(name))
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    Settings::from_lookup(|name| env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings.database_url, "sqlite://spam.db");
        assert_eq!(settings.http_port, 5000);
        assert_eq!(
            settings.embedding_model_path,
            PathBuf::from("models/sentence_embedding_spam_model.json")
        );
        assert_eq!(
            settings.lexical_model_path,
            PathBuf::from("models/tfidf_nb_spam_model.json")
        );
        assert_eq!(settings.db_max_connections, 4);
    }

    #[test]
    fn test_overrides_are_applied() {
        let settings = settings_from(&[
            ("SPAM_DATABASE_URL", "sqlite::memory:"),
            ("HTTP_PORT", "8080"),
            ("SPAM_EMBEDDING_MODEL", "/srv/emb.json"),
            ("SPAM_LEXICAL_MODEL", "/srv/nb.json"),
            ("SPAM_DB_MAX_CONNECTIONS", "1"),
        ])
        .unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.http_port, 8080);
        assert_eq!(settings.embedding_model_path, PathBuf::from("/srv/emb.json"));
        assert_eq!(settings.lexical_model_path, PathBuf::from("/srv/nb.json"));
        assert_eq!(settings.db_max_connections, 1);
    }

    #[test]
    fn test_unparsable_port_fails() {
        let err = settings_from(&[("HTTP_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("HTTP_PORT"));
    }

    #[test]
    fn test_zero_port_fails() {
        let err = settings_from(&[("HTTP_PORT", "0")]).unwrap_err();
        assert!(err.to_string().contains("Port cannot be 0"));
    }

    #[test]
    fn test_empty_database_url_fails() {
        let err = settings_from(&[("SPAM_DATABASE_URL", "  ")]).unwrap_err();
        assert!(err.to_string().contains("SPAM_DATABASE_URL"));
    }

    #[test]
    fn test_zero_connections_fails() {
        assert!(settings_from(&[("SPAM_DB_MAX_CONNECTIONS", "0")]).is_err());
    }

    #[test]
    fn test_database_url_read_from_secret_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sqlite:///data/secret.db").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let settings = settings_from(&[
            ("SPAM_DATABASE_URL", "sqlite://ignored.db"),
            ("SPAM_DATABASE_URL_FILE", &path),
        ])
        .unwrap();
        assert_eq!(settings.database_url, "sqlite:///data/secret.db");
    }

    #[test]
    fn test_missing_secret_file_fails() {
        let err = settings_from(&[("SPAM_DATABASE_URL_FILE", "/nonexistent/secret")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }
}
