//! Cosmos DB backend adapter
//!
//! Implements the [`Backend`] trait on top of [`CosmosDbClient`]. Type
//! queries are served as a single page: the client drains the SDK's item
//! stream for the partition, so no continuation token is ever handed out.

use crate::adapters::backend::document::FormDocument;
use crate::adapters::backend::traits::{Backend, ContainerSpec, CreatedDocument, DocumentPage};
use crate::adapters::cosmosdb::client::CosmosDbClient;
use crate::config::CosmosDbConfig;
use crate::domain::{RecordId, RecordType, Result};
use async_trait::async_trait;

/// Backend implementation backed by Azure Cosmos DB
pub struct CosmosBackend {
    client: CosmosDbClient,
}

impl CosmosBackend {
    /// Create a new Cosmos DB backend from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new(config: CosmosDbConfig) -> Result<Self> {
        let client = CosmosDbClient::new(config)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Backend for CosmosBackend {
    async fn ensure_database(&self) -> Result<()> {
        self.client.ensure_database_exists().await
    }

    async fn ensure_container(&self, spec: &ContainerSpec) -> Result<()> {
        self.client.ensure_container_exists(spec).await
    }

    async fn read_document(
        &self,
        record_type: &RecordType,
        id: &RecordId,
    ) -> Result<FormDocument> {
        self.client.read_form(record_type, id).await
    }

    async fn create_document(&self, document: &FormDocument) -> Result<CreatedDocument> {
        self.client.create_form(document).await
    }

    async fn query_page(
        &self,
        record_type: &RecordType,
        continuation: Option<String>,
    ) -> Result<DocumentPage> {
        // The client drains the partition in one pass, so a continuation
        // token never refers to a further page.
        debug_assert!(continuation.is_none());

        let documents = self.client.query_forms(record_type).await?;
        Ok(DocumentPage {
            documents,
            continuation: None,
        })
    }

    async fn delete_database(&self) -> Result<()> {
        self.client.delete_database().await
    }

    fn database_name(&self) -> &str {
        self.client.database_name()
    }
}
