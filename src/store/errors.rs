//! # Store Errors
//!
//! Only two things can go wrong inside the store: the requested id is not
//! there, or writing the persistence file failed. A malformed file on load is
//! not an error; see `persistence::load_students`.

use std::io;

use thiserror::Error;
use uuid::Uuid;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record carries the requested id
    #[error("Student not found")]
    NotFound(Uuid),

    /// Filesystem failure while persisting
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Collection could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_is_fixed() {
        let err = StoreError::NotFound(Uuid::new_v4());
        assert_eq!(err.to_string(), "Student not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = StoreError::io(
            "students.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("students.json"));
        assert!(!err.is_not_found());
    }
}
