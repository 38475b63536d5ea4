//! Error types for buildtrack-storage
//!
//! All storage backends report failures through [`StorageError`].

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error reading the storage document
    #[error("Failed to read storage file {path}: {source}")]
    Read {
        /// Path to the storage document
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Storage document is not valid JSON or has the wrong shape
    #[error("Failed to parse storage file {path}: {message}")]
    Parse {
        /// Path to the storage document
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Failed to write the storage document
    #[error("Failed to write storage file {path}: {message}")]
    Write {
        /// Path to the storage document
        path: PathBuf,
        /// Description of the failing step
        message: String,
    },

    /// Rename of the temp file failed; the temp file is left as a safety copy
    #[error("Failed to write storage atomically: {path} - Safety copy at: {temp_path}")]
    WriteAtomic {
        /// Path to the storage document
        path: PathBuf,
        /// Path to the temporary safety copy
        temp_path: PathBuf,
    },

    /// Backend refused the operation (used by in-memory test doubles)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_display_mentions_safety_copy() {
        let err = StorageError::WriteAtomic {
            path: PathBuf::from("/data/buildtrack/local_storage.json"),
            temp_path: PathBuf::from("/data/buildtrack/local_storage.json.tmp.20260203-143022"),
        };
        let display = err.to_string();
        assert!(display.contains("local_storage.json"));
        assert!(display.contains("tmp.20260203-143022"));
        assert!(display.contains("Safety copy"));
    }

    #[test]
    fn test_read_error_chains_source() {
        let err = StorageError::Read {
            path: PathBuf::from("/nope"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/nope"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = StorageError::Parse {
            path: PathBuf::from("store.json"),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("line 1 column 1"));
    }
}
