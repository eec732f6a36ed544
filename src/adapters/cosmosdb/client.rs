//! Cosmos DB client implementation
//!
//! This module provides the client for interacting with Azure Cosmos DB.
//! SDK errors are classified into the domain taxonomy here, so nothing
//! above this layer sees Azure types: 404s become the `NotFound` absence
//! signal, 409s become `Conflict`, and everything else keeps its own
//! category.

use crate::adapters::backend::document::FormDocument;
use crate::adapters::backend::traits::{ContainerSpec, CreatedDocument};
use crate::config::CosmosDbConfig;
use crate::domain::{BackendError, RecordId, RecordType, Result, StoreError};
use azure_core::credentials::Secret;
use azure_core::http::headers::HeaderName;
use azure_data_cosmos::clients::{ContainerClient, DatabaseClient};
use azure_data_cosmos::models::{
    ContainerProperties, IndexingPolicy, PartitionKeyDefinition, PartitionKeyKind,
};
use azure_data_cosmos::{CosmosClient, CosmosClientOptions, PartitionKey};
use futures::stream::StreamExt;
use std::borrow::Cow;

/// Response header carrying the request charge for an operation
fn request_charge_header() -> HeaderName {
    HeaderName::from_static("x-ms-request-charge")
}

/// Cosmos DB client for formstore
///
/// Provides methods for connecting to Azure Cosmos DB, managing the
/// database and container, and performing document operations.
pub struct CosmosDbClient {
    /// Cosmos DB client
    client: CosmosClient,

    /// Database client
    database: DatabaseClient,

    /// Configuration
    config: CosmosDbConfig,
}

impl CosmosDbClient {
    /// Create a new Cosmos DB client
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: CosmosDbConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        // Convert our SecretString to Azure's Secret type
        let key_str: String = config.key.expose_secret().clone().into();
        let key = Secret::new(key_str);
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(&config.endpoint, key, options).map_err(|e| {
            StoreError::Backend(BackendError::Unavailable(format!(
                "Failed to create Cosmos client: {e}"
            )))
        })?;

        let database = client.database_client(&config.database_name);

        Ok(Self {
            client,
            database,
            config,
        })
    }

    /// Ensure the database exists, creating it if necessary
    pub async fn ensure_database_exists(&self) -> Result<()> {
        // Try to read the database first
        match self.database.read(None).await {
            Ok(_) => {
                tracing::info!(database = %self.config.database_name, "Database already exists");
                Ok(())
            }
            Err(_) => {
                tracing::info!(database = %self.config.database_name, "Creating database");

                self.client
                    .create_database(&self.config.database_name, None)
                    .await
                    .map_err(|e| {
                        StoreError::Backend(BackendError::Provisioning(format!(
                            "Failed to create database {}: {e}",
                            self.config.database_name
                        )))
                    })?;

                tracing::info!(database = %self.config.database_name, "Database created");
                Ok(())
            }
        }
    }

    /// Ensure the container exists, creating it if necessary
    ///
    /// The container is created at the account's default throughput offer;
    /// `spec.throughput` is logged but not transmitted.
    pub async fn ensure_container_exists(&self, spec: &ContainerSpec) -> Result<()> {
        let container = self.database.container_client(&spec.name);

        // Try to read the container first
        match container.read(None).await {
            Ok(_) => {
                tracing::info!(container = %spec.name, "Container already exists");
                Ok(())
            }
            Err(_) => {
                tracing::info!(
                    container = %spec.name,
                    partition_key = %spec.partition_key_path,
                    throughput = spec.throughput,
                    "Creating container"
                );

                let partition_key_def = PartitionKeyDefinition {
                    paths: vec![spec.partition_key_path.clone()],
                    kind: PartitionKeyKind::Hash,
                    version: None,
                };

                let properties = ContainerProperties {
                    id: Cow::Owned(spec.name.clone()),
                    partition_key: partition_key_def,
                    indexing_policy: Some(IndexingPolicy::default()),
                    ..Default::default()
                };

                self.database
                    .create_container(properties, None)
                    .await
                    .map_err(|e| {
                        StoreError::Backend(BackendError::Provisioning(format!(
                            "Failed to create container {}: {e}",
                            spec.name
                        )))
                    })?;

                tracing::info!(container = %spec.name, "Container created");
                Ok(())
            }
        }
    }

    /// Read a form document by `(record_type, id)`
    ///
    /// A 404 from the service is the expected absence signal and maps to
    /// `NotFound`; any other failure keeps its own category so callers
    /// never mistake a failed existence check for absence.
    pub async fn read_form(
        &self,
        record_type: &RecordType,
        id: &RecordId,
    ) -> Result<FormDocument> {
        let container = self.container_client();
        let partition_key = PartitionKey::from(record_type.as_str().to_string());
        let id_str = id.to_string();

        match container
            .read_item::<FormDocument>(partition_key, &id_str, None)
            .await
        {
            Ok(response) => response.into_body().map_err(|e| {
                StoreError::Backend(BackendError::Deserialization(format!(
                    "Failed to deserialize document {id_str}: {e}"
                )))
            }),
            Err(e) if is_not_found(&e) => Err(StoreError::Backend(BackendError::NotFound(
                format!("Document {id_str} not found in partition '{record_type}'"),
            ))),
            Err(e) => Err(StoreError::Backend(BackendError::QueryFailed(format!(
                "Failed to read document {id_str}: {e}"
            )))),
        }
    }

    /// Create a form document that must not already exist
    ///
    /// The service enforces uniqueness atomically; a 409 maps to
    /// `Conflict` so the store can resolve concurrent creators.
    pub async fn create_form(&self, document: &FormDocument) -> Result<CreatedDocument> {
        let container = self.container_client();
        let partition_key = PartitionKey::from(document.record_type.clone());

        match container
            .create_item(partition_key, document.clone(), None)
            .await
        {
            Ok(response) => {
                let cost_units = response
                    .headers()
                    .get_optional_str(&request_charge_header())
                    .and_then(|charge| charge.parse::<f64>().ok())
                    .unwrap_or(0.0);

                Ok(CreatedDocument {
                    id: document.id.clone(),
                    cost_units,
                })
            }
            Err(e) if is_conflict(&e) => Err(StoreError::Backend(BackendError::Conflict(
                format!(
                    "Document {} already exists in partition '{}'",
                    document.id, document.record_type
                ),
            ))),
            Err(e) => Err(StoreError::Backend(BackendError::WriteFailed(format!(
                "Failed to create document {}: {e}",
                document.id
            )))),
        }
    }

    /// Fetch all form documents whose discriminator matches
    ///
    /// The type value is escaped before being placed in the query text so
    /// a value containing quotes cannot alter the query semantics.
    pub async fn query_forms(&self, record_type: &RecordType) -> Result<Vec<FormDocument>> {
        let container = self.container_client();
        let partition_key = PartitionKey::from(record_type.as_str().to_string());

        let query = format!(
            "SELECT * FROM c WHERE c.Type = '{}'",
            escape_query_literal(record_type.as_str())
        );

        tracing::debug!(partition_key = %record_type, query = %query, "Running type query");

        let mut query_response = container
            .query_items::<FormDocument>(query, partition_key, None)
            .map_err(|e| {
                StoreError::Backend(BackendError::QueryFailed(format!(
                    "Failed to create query for type '{record_type}': {e}"
                )))
            })?;

        let mut documents = Vec::new();
        while let Some(item) = query_response.next().await {
            match item {
                Ok(document) => documents.push(document),
                Err(e) => {
                    return Err(StoreError::Backend(BackendError::QueryFailed(format!(
                        "Failed to fetch documents for type '{record_type}': {e}"
                    ))));
                }
            }
        }

        Ok(documents)
    }

    /// Delete the database
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the database does not exist.
    pub async fn delete_database(&self) -> Result<()> {
        match self.database.delete(None).await {
            Ok(_) => {
                tracing::info!(database = %self.config.database_name, "Database deleted");
                Ok(())
            }
            Err(e) if is_not_found(&e) => Err(StoreError::Backend(BackendError::NotFound(
                format!("Database '{}' does not exist", self.config.database_name),
            ))),
            Err(e) => Err(StoreError::Backend(BackendError::Unavailable(format!(
                "Failed to delete database {}: {e}",
                self.config.database_name
            )))),
        }
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        &self.config.database_name
    }

    /// Get the container client
    fn container_client(&self) -> ContainerClient {
        self.database
            .container_client(&self.config.container_name)
    }
}

/// Whether an SDK error is a 404 (not found)
fn is_not_found(e: &azure_core::Error) -> bool {
    let message = e.to_string();
    message.contains("404") || message.contains("NotFound")
}

/// Whether an SDK error is a 409 (conflict)
fn is_conflict(e: &azure_core::Error) -> bool {
    let message = e.to_string();
    message.contains("409") || message.contains("Conflict")
}

/// Escape a string literal for use inside single quotes in query text
///
/// Single quotes are doubled, the SQL-style escape Cosmos DB expects.
pub(crate) fn escape_query_literal(value: &str) -> String {
    value.replace('\'', "''")
}
