use thiserror::Error;

use crate::config::ConfigError;
use crate::database::document_store::DocumentError;
use crate::database::kv_store::KvError;
use crate::database::orm::OrmError;
use crate::database::sql_basics::ProductError;
use crate::database::table_store::TableError;
use crate::web::templates::TemplateError;

/// Crate-wide error for the demo binaries and anything that crosses topics.
///
/// Individual units keep their own narrow error enums; this one only wraps
/// them so a binary can use `?` across several of them.
#[derive(Error, Debug)]
pub enum CourseError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ConfigError>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Orm(#[from] OrmError),

    #[error(transparent)]
    KeyValue(#[from] KvError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

pub type Result<T> = std::result::Result<T, CourseError>;

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_all_errors() {
        let err = CourseError::Validation(vec![
            ConfigError::invalid_value("server.port", "0", "must be positive"),
            ConfigError::missing_field("middleware", "api_key"),
        ]);
        let message = err.to_string();
        assert!(message.starts_with("invalid configuration: "));
        assert!(message.contains("server.port"));
        assert!(message.contains("api_key"));
    }

    #[test]
    fn test_io_error_converts() {
        fn open_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.toml")?)
        }
        assert!(matches!(open_missing(), Err(CourseError::Io(_))));
    }
}
