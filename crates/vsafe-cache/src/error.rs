//! Cache error types.
//!
//! Every error aborts the current load or store. Format errors are never
//! recovered by recomputing: rebuilding a cache means rescanning the raw export,
//! so a stale or damaged cache is reported and left for the operator to delete.

use std::path::PathBuf;
use thiserror::Error;

/// Cache operation error.
#[derive(Debug, Error)]
pub enum CacheError {
    /// File I/O error.
    #[error("failed to {operation} cache file {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error on an in-memory or caller-supplied stream.
    #[error("cache stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// Version tag differs from the one this build writes.
    #[error("cache format version mismatch in {record}: expected {expected}, found {found}")]
    VersionMismatch {
        record: &'static str,
        expected: u8,
        found: u8,
    },

    /// Data ended in the middle of a record.
    #[error("cache data is truncated inside {record}")]
    Truncated { record: &'static str },

    /// Bytes remain after the last record.
    #[error("unexpected trailing bytes after cache data")]
    TrailingBytes,

    /// A field holds a value its type cannot take.
    #[error("invalid {field} value {value} in {record}")]
    InvalidValue {
        record: &'static str,
        field: &'static str,
        value: i64,
    },

    /// A subject key is not valid UTF-8.
    #[error("subject key in {record} is not valid UTF-8")]
    InvalidKey { record: &'static str },

    /// The same subject key appears twice.
    #[error("duplicate subject key in cache")]
    DuplicateKey,

    /// A collection is too large for its 4-byte count.
    #[error("collection of {len} items does not fit the cache format")]
    LengthOverflow { len: usize },

    /// Temp file couldn't be renamed over the cache path.
    #[error("failed to move completed cache into place at {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

impl CacheError {
    /// Create an Io error.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// True when the cache contents are unreadable, as opposed to the file
    /// system failing.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::VersionMismatch { .. }
                | Self::Truncated { .. }
                | Self::TrailingBytes
                | Self::InvalidValue { .. }
                | Self::InvalidKey { .. }
                | Self::DuplicateKey
        )
    }

    /// True for failures of the underlying file or stream.
    pub fn is_stream_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Stream(_) | Self::AtomicWriteFailed { .. }
        )
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        if self.is_format_error() {
            return Some(
                "Delete the cache file to rebuild it from the source data (this rescans the full export)."
                    .into(),
            );
        }
        match self {
            Self::Io { operation, .. } if *operation == "read" || *operation == "open" => {
                Some("Check that the cache file is readable.".into())
            }
            Self::Io { .. } | Self::AtomicWriteFailed { .. } => {
                Some("Check free disk space and write permission for the cache directory.".into())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::VersionMismatch {
            record: "visit tally",
            expected: 1,
            found: 7,
        };
        assert_eq!(
            err.to_string(),
            "cache format version mismatch in visit tally: expected 1, found 7"
        );
    }

    #[test]
    fn test_error_classes() {
        let err = CacheError::Truncated { record: "cache" };
        assert!(err.is_format_error());
        assert!(!err.is_stream_error());
        assert!(err.suggestion().unwrap().contains("Delete the cache file"));

        let err: CacheError = std::io::Error::other("boom").into();
        assert!(err.is_stream_error());
        assert!(!err.is_format_error());
        assert!(err.suggestion().is_none());
    }
}
