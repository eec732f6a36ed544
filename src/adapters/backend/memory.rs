//! In-memory backend implementation
//!
//! A process-local `Backend` over a mutex-guarded map, keyed by
//! `(record_type, id)`. Used for dry runs (exercising the full store
//! path without a Cosmos DB account) and by the integration tests.
//! Semantics mirror the remote service: reads of absent documents signal
//! `NotFound`, duplicate creates signal `Conflict`, and queries page
//! through results with continuation tokens.

use crate::adapters::backend::document::FormDocument;
use crate::adapters::backend::traits::{Backend, ContainerSpec, CreatedDocument, DocumentPage};
use crate::domain::{BackendError, RecordId, RecordType, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Synthetic request charge reported for each write
const WRITE_COST_UNITS: f64 = 7.0;

#[derive(Debug, Default)]
struct State {
    database_exists: bool,
    container: Option<ContainerSpec>,
    documents: BTreeMap<(String, String), FormDocument>,
}

/// In-memory implementation of the Backend trait
pub struct InMemoryBackend {
    database_name: String,
    page_size: usize,
    state: Mutex<State>,
}

impl InMemoryBackend {
    /// Create a new in-memory backend with the default page size
    pub fn new(database_name: impl Into<String>) -> Self {
        Self::with_page_size(database_name, 100)
    }

    /// Create a new in-memory backend with an explicit query page size
    ///
    /// Small page sizes force multi-page query results, which is how the
    /// tests exercise sequential pagination.
    pub fn with_page_size(database_name: impl Into<String>, page_size: usize) -> Self {
        Self {
            database_name: database_name.into(),
            page_size: page_size.max(1),
            state: Mutex::new(State::default()),
        }
    }

    /// Number of stored documents with the given discriminator
    pub fn count_by_type(&self, record_type: &RecordType) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .documents
            .keys()
            .filter(|(stored_type, _)| stored_type == record_type.as_str())
            .count()
    }

    /// Total number of stored documents
    pub fn document_count(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.documents.len()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn ensure_database(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.database_exists {
            tracing::info!(database = %self.database_name, "Creating in-memory database");
            state.database_exists = true;
        }
        Ok(())
    }

    async fn ensure_container(&self, spec: &ContainerSpec) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.database_exists {
            return Err(BackendError::NotFound(format!(
                "Database '{}' does not exist",
                self.database_name
            ))
            .into());
        }
        if state.container.is_none() {
            tracing::info!(container = %spec.name, "Creating in-memory container");
            state.container = Some(spec.clone());
        }
        Ok(())
    }

    async fn read_document(
        &self,
        record_type: &RecordType,
        id: &RecordId,
    ) -> Result<FormDocument> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (record_type.as_str().to_string(), id.to_string());
        state.documents.get(&key).cloned().ok_or_else(|| {
            BackendError::NotFound(format!(
                "Document {id} not found in partition '{record_type}'"
            ))
            .into()
        })
    }

    async fn create_document(&self, document: &FormDocument) -> Result<CreatedDocument> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.container.is_none() {
            return Err(BackendError::NotFound("Container does not exist".to_string()).into());
        }

        let key = (document.record_type.clone(), document.id.clone());
        if state.documents.contains_key(&key) {
            return Err(BackendError::Conflict(format!(
                "Document {} already exists in partition '{}'",
                document.id, document.record_type
            ))
            .into());
        }

        state.documents.insert(key, document.clone());
        Ok(CreatedDocument {
            id: document.id.clone(),
            cost_units: WRITE_COST_UNITS,
        })
    }

    async fn query_page(
        &self,
        record_type: &RecordType,
        continuation: Option<String>,
    ) -> Result<DocumentPage> {
        let offset = match continuation {
            Some(token) => token.parse::<usize>().map_err(|_| {
                BackendError::QueryFailed(format!("Invalid continuation token '{token}'"))
            })?,
            None => 0,
        };

        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let matching: Vec<&FormDocument> = state
            .documents
            .iter()
            .filter(|((stored_type, _), _)| stored_type == record_type.as_str())
            .map(|(_, document)| document)
            .collect();

        let documents: Vec<FormDocument> = matching
            .iter()
            .skip(offset)
            .take(self.page_size)
            .map(|document| (*document).clone())
            .collect();

        let next = offset + documents.len();
        let continuation = if next < matching.len() {
            Some(next.to_string())
        } else {
            None
        };

        Ok(DocumentPage {
            documents,
            continuation,
        })
    }

    async fn delete_database(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.database_exists {
            return Err(BackendError::NotFound(format!(
                "Database '{}' does not exist",
                self.database_name
            ))
            .into());
        }

        tracing::info!(database = %self.database_name, "Deleting in-memory database");
        state.database_exists = false;
        state.container = None;
        state.documents.clear();
        Ok(())
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderFormRecord;

    fn spec() -> ContainerSpec {
        ContainerSpec {
            name: "Items".to_string(),
            partition_key_path: "/Type".to_string(),
            throughput: 400,
        }
    }

    fn document(profile: &str) -> FormDocument {
        let record = OrderFormRecord::builder()
            .profile(profile)
            .source("RCLS")
            .build()
            .unwrap();
        FormDocument::from_domain(&record)
    }

    #[tokio::test]
    async fn test_read_absent_is_not_found() {
        let backend = InMemoryBackend::new("TestOrderForms");
        backend.ensure_database().await.unwrap();
        backend.ensure_container(&spec()).await.unwrap();

        let record_type = RecordType::new("TestOrderForm").unwrap();
        let err = backend
            .read_document(&record_type, &RecordId::generate())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let backend = InMemoryBackend::new("TestOrderForms");
        backend.ensure_database().await.unwrap();
        backend.ensure_container(&spec()).await.unwrap();

        let doc = document("Iron");
        let created = backend.create_document(&doc).await.unwrap();
        assert_eq!(created.id, doc.id);
        assert!(created.cost_units > 0.0);

        let err = backend.create_document(&doc).await.unwrap_err();
        assert!(matches!(
            err,
            crate::domain::StoreError::Backend(BackendError::Conflict(_))
        ));
        assert_eq!(backend.document_count(), 1);
    }

    #[tokio::test]
    async fn test_query_pages_sequentially() {
        let backend = InMemoryBackend::with_page_size("TestOrderForms", 2);
        backend.ensure_database().await.unwrap();
        backend.ensure_container(&spec()).await.unwrap();

        for i in 0..5 {
            backend
                .create_document(&document(&format!("Profile{i}")))
                .await
                .unwrap();
        }

        let record_type = RecordType::new("TestOrderForm").unwrap();
        let mut seen = 0;
        let mut continuation = None;
        let mut pages = 0;
        loop {
            let page = backend
                .query_page(&record_type, continuation)
                .await
                .unwrap();
            seen += page.documents.len();
            pages += 1;
            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        assert_eq!(seen, 5);
        assert_eq!(pages, 3);
    }

    #[tokio::test]
    async fn test_delete_database_twice() {
        let backend = InMemoryBackend::new("TestOrderForms");
        backend.ensure_database().await.unwrap();

        backend.delete_database().await.unwrap();
        let err = backend.delete_database().await.unwrap_err();
        assert!(err.is_not_found());
    }
}
