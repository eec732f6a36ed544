//! Backend abstraction traits
//!
//! This module defines the trait that storage backends must implement to
//! work with the record store. The trait speaks the persisted document
//! shape; adapters own the mapping to their native SDK types.

use crate::adapters::backend::document::FormDocument;
use crate::domain::{RecordId, RecordType, Result};
use async_trait::async_trait;

/// Provisioning parameters for the logical container
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    /// Container name
    pub name: String,

    /// Partition key path (must address the record type discriminator)
    pub partition_key_path: String,

    /// Provisioned throughput hint in request units per second
    ///
    /// Validated at store open and honoured by backends with a
    /// provisioning knob. The Cosmos DB adapter currently creates the
    /// container at the account's default offer and does not transmit
    /// this value.
    pub throughput: i32,
}

/// Outcome of a successful document creation
#[derive(Debug, Clone)]
pub struct CreatedDocument {
    /// Id of the created document
    pub id: String,

    /// Backend resource consumption for the write (request charge)
    pub cost_units: f64,
}

/// One page of a type-filtered query
///
/// `continuation` is an opaque backend token; `None` means the result set
/// is exhausted. Page cursors are stateful, so pages must be fetched
/// strictly in sequence.
#[derive(Debug, Clone, Default)]
pub struct DocumentPage {
    /// Documents in this page, in backend order
    pub documents: Vec<FormDocument>,

    /// Token for the next page, if any
    pub continuation: Option<String>,
}

/// Storage backend trait for order-form documents
///
/// Implementations must be safe to share across concurrent operations;
/// the store holds a single process-wide handle behind an `Arc`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Ensure the database exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or accessed.
    async fn ensure_database(&self) -> Result<()>;

    /// Ensure the container exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be created.
    async fn ensure_container(&self, spec: &ContainerSpec) -> Result<()>;

    /// Read a document by `(record_type, id)`
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when the document does not exist.
    /// Every other failure keeps its own category so callers can tell
    /// genuine absence apart from a failed existence check.
    async fn read_document(
        &self,
        record_type: &RecordType,
        id: &RecordId,
    ) -> Result<FormDocument>;

    /// Create a document that must not already exist
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Conflict` if a document with the same id
    /// already exists in the partition.
    async fn create_document(&self, document: &FormDocument) -> Result<CreatedDocument>;

    /// Fetch one page of documents whose discriminator matches
    ///
    /// Pass the continuation token from the previous page to advance;
    /// `None` starts from the beginning. An unknown type yields an empty
    /// page, not an error.
    async fn query_page(
        &self,
        record_type: &RecordType,
        continuation: Option<String>,
    ) -> Result<DocumentPage>;

    /// Delete the entire database
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when the database does not exist;
    /// callers that want delete-if-present semantics tolerate that case.
    async fn delete_database(&self) -> Result<()>;

    /// Get the database name
    fn database_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_spec_fields() {
        let spec = ContainerSpec {
            name: "Items".to_string(),
            partition_key_path: "/Type".to_string(),
            throughput: 400,
        };

        assert_eq!(spec.name, "Items");
        assert_eq!(spec.partition_key_path, "/Type");
        assert_eq!(spec.throughput, 400);
    }

    #[test]
    fn test_document_page_default_is_exhausted() {
        let page = DocumentPage::default();
        assert!(page.documents.is_empty());
        assert!(page.continuation.is_none());
    }
}
