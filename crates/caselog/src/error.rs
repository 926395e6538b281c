//! Error types for caselog.
//!
//! Lookups that find nothing are not errors: the store reports them as
//! `None` or `false`. Everything in here is a genuine failure.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for caselog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to initialize or upgrade the schema.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A record with this id is already stored.
    #[error("record {id} already exists")]
    DuplicateRecord {
        /// The conflicting record id.
        id: Uuid,
    },

    /// A stored row could not be turned back into a record.
    #[error("corrupt value in column '{column}': {message}")]
    CorruptRecord {
        /// Column holding the bad value.
        column: &'static str,
        /// Description of the bad value.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Worker Errors ===
    /// The request was cancelled before the worker ran it.
    #[error("store request cancelled")]
    Cancelled,

    /// The store worker has shut down.
    #[error("store worker has stopped")]
    WorkerStopped,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for caselog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a corrupt-record error for the given column.
    #[must_use]
    pub fn corrupt(column: &'static str, message: impl Into<String>) -> Self {
        Self::CorruptRecord {
            column,
            message: message.into(),
        }
    }

    /// Check if this error is a duplicate-id insert.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateRecord { .. })
    }

    /// Check if this error came from a cancelled worker request.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_record_display() {
        let id = Uuid::nil();
        let err = Error::DuplicateRecord { id };
        assert_eq!(
            err.to_string(),
            "record 00000000-0000-0000-0000-000000000000 already exists"
        );
        assert!(err.is_duplicate());
        assert!(!Error::Cancelled.is_duplicate());
    }

    #[test]
    fn test_corrupt_record_display() {
        let err = Error::corrupt("uuid", "not a uuid");
        let msg = err.to_string();
        assert!(msg.contains("uuid"));
        assert!(msg.contains("not a uuid"));
    }

    #[test]
    fn test_worker_errors() {
        assert_eq!(Error::Cancelled.to_string(), "store request cancelled");
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::WorkerStopped.is_cancelled());
        assert_eq!(Error::WorkerStopped.to_string(), "store worker has stopped");
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "seed.count too large".to_string(),
        };
        assert!(err.to_string().contains("seed.count"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
