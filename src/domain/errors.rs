//! Domain error types
//!
//! This module defines the error hierarchy for formstore. All errors are
//! domain-specific and don't expose third-party SDK types. `NotFound` is
//! an expected, non-exceptional signal used to detect absence during
//! existence checks and must stay distinguishable from every other
//! failure; interpreting any other error as absence would invite
//! duplicate writes.

use thiserror::Error;

/// Main formstore error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend-related errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Whether this error is the expected "not found" absence signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Backend(e) if e.is_not_found())
    }

    /// Whether this error reports a caller-initiated abort
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StoreError::Backend(e) if e.is_cancelled())
    }
}

/// Backend-specific errors
///
/// Errors that occur when talking to the partitioned document service.
/// These errors don't expose the Azure SDK's types.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport/connectivity failure; retryable by the caller with backoff
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The requested database, container or document does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid provisioning configuration (e.g. non-positive throughput)
    #[error("Provisioning error: {0}")]
    Provisioning(String),

    /// Caller-supplied partition key disagrees with the record discriminator
    #[error("Partition key mismatch: expected '{expected}', got '{actual}'")]
    PartitionKeyMismatch {
        /// The partition key path the store requires
        expected: String,
        /// The path the caller supplied
        actual: String,
    },

    /// A document with the same id already exists in the partition
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller-initiated abort of an in-flight operation
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Deadline expired before the operation completed
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Failed to query documents
    #[error("Failed to query documents: {0}")]
    QueryFailed(String),

    /// Failed to write a document
    #[error("Failed to write document: {0}")]
    WriteFailed(String),

    /// Malformed stored payload on read
    #[error("Failed to deserialize stored document: {0}")]
    Deserialization(String),
}

impl BackendError {
    /// Whether this error is the expected "not found" absence signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }

    /// Whether this error reports a caller-initiated abort
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BackendError::Cancelled(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Configuration(format!("TOML parse error: {err}"))
    }
}
