//! Adapter-level error type.
//!
//! Store failures are carried as `sea_orm::DbErr` and surface unchanged through
//! `AdapterError::Db`; the adapter only originates `NotFound` (from `update`)
//! and the configuration/model errors raised while resolving models.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for adapter operations.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Record not found in {model}")]
    NotFound { model: String },
    #[error("Unknown model: {model}")]
    UnknownModel { model: String },
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Invalid schema: {message}")]
    Schema { message: String },
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl AdapterError {
    pub fn not_found(model: impl Into<String>) -> Self {
        Self::NotFound {
            model: model.into(),
        }
    }

    pub fn unknown_model(model: impl Into<String>) -> Self {
        Self::UnknownModel {
            model: model.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the one failure the adapter raises itself during `update`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_model() {
        let err = AdapterError::not_found("session");
        assert_eq!(err.to_string(), "Record not found in session");
        assert!(err.is_not_found());
    }

    #[test]
    fn db_errors_pass_through_unchanged() {
        let db = sea_orm::DbErr::Custom("constraint violated".into());
        let expected = db.to_string();
        let err = AdapterError::from(db);
        assert_eq!(err.to_string(), expected);
        assert!(!err.is_not_found());
    }

    #[test]
    fn io_error_reports_path() {
        let err = AdapterError::io(
            "/tmp/entities/user.rs",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to write /tmp/entities/user.rs: denied");
    }
}
