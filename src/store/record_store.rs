//! Record store core
//!
//! This module implements the typed record store: idempotent provisioning,
//! create-if-absent upserts, type-filtered paged queries, and teardown.
//! The store mediates between in-memory [`OrderFormRecord`] values and a
//! [`Backend`]; it never prints, never reads input, and never mutates the
//! records passed to it.

use crate::adapters::backend::document::FormDocument;
use crate::adapters::backend::traits::{Backend, ContainerSpec};
use crate::domain::{BackendError, OrderFormRecord, RecordId, RecordType, Result, StoreError};
use futures::Stream;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// The partition key path every container must use
///
/// The partition key is always the record's own type discriminator, so
/// same-type records co-locate.
pub const PARTITION_KEY_PATH: &str = "/Type";

/// Outcome of a create-if-absent upsert
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertResult {
    /// The record was absent and has been written
    Created {
        /// Id of the written record
        id: RecordId,
        /// Backend resource consumption for the write
        cost_units: f64,
    },

    /// A record with this id already exists; nothing was written
    AlreadyExists {
        /// Id of the existing record
        id: RecordId,
    },
}

impl UpsertResult {
    /// Id of the record the upsert resolved to
    pub fn id(&self) -> &RecordId {
        match self {
            UpsertResult::Created { id, .. } | UpsertResult::AlreadyExists { id } => id,
        }
    }
}

/// Store provisioning and runtime options
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Container name
    pub container_name: String,

    /// Partition key path; must be [`PARTITION_KEY_PATH`]
    pub partition_key_path: String,

    /// Provisioned throughput hint
    pub throughput: i32,

    /// Deadline applied to each backend call
    pub request_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            container_name: "Items".to_string(),
            partition_key_path: PARTITION_KEY_PATH.to_string(),
            throughput: 400,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Typed record store over a partitioned document backend
///
/// Construct with [`RecordStore::open`], which validates the options and
/// provisions the namespace before handing back a ready-to-use handle;
/// there is no window where a partially constructed store is observable.
///
/// The handle is cheap to share: backend access goes through an `Arc`,
/// and all operations take `&self`.
pub struct RecordStore {
    backend: Arc<dyn Backend>,
    options: StoreOptions,
    shutdown: Option<watch::Receiver<bool>>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("options", &self.options)
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Open the store, provisioning the database and container idempotently
    ///
    /// # Errors
    ///
    /// - `PartitionKeyMismatch` if the configured partition key path does
    ///   not address the type discriminator field
    /// - `Provisioning` for invalid configuration such as non-positive
    ///   throughput
    /// - `Unavailable`/`Timeout` if the backend cannot be reached
    pub async fn open(backend: Arc<dyn Backend>, options: StoreOptions) -> Result<Self> {
        let store = Self::attach(backend, options)?;

        store
            .with_timeout("ensure_database", store.backend.ensure_database())
            .await?;

        let spec = ContainerSpec {
            name: store.options.container_name.clone(),
            partition_key_path: store.options.partition_key_path.clone(),
            throughput: store.options.throughput,
        };
        store
            .with_timeout("ensure_container", store.backend.ensure_container(&spec))
            .await?;

        tracing::info!(
            database = store.backend.database_name(),
            container = %store.options.container_name,
            "Record store ready"
        );

        Ok(store)
    }

    /// Attach to a store handle without provisioning anything
    ///
    /// Validates the options but touches no backend state. Useful when the
    /// namespace is known to exist already, or when the only intent is
    /// [`teardown`](Self::teardown).
    ///
    /// # Errors
    ///
    /// Same option validation errors as [`open`](Self::open).
    pub fn attach(backend: Arc<dyn Backend>, options: StoreOptions) -> Result<Self> {
        if options.partition_key_path != PARTITION_KEY_PATH {
            return Err(BackendError::PartitionKeyMismatch {
                expected: PARTITION_KEY_PATH.to_string(),
                actual: options.partition_key_path.clone(),
            }
            .into());
        }

        if options.throughput <= 0 {
            return Err(BackendError::Provisioning(format!(
                "Throughput must be positive, got {}",
                options.throughput
            ))
            .into());
        }

        Ok(Self {
            backend,
            options,
            shutdown: None,
        })
    }

    /// Attach a shutdown signal that aborts in-flight backend calls
    ///
    /// When the channel observes `true`, every pending and future store
    /// operation fails with `Cancelled` instead of running to completion.
    /// A dropped sender leaves the store uncancellable, not cancelled.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Write the record if no record with its `(record_type, id)` exists
    ///
    /// The existence check reads first; only a `NotFound` signal is taken
    /// as absence. Any other read failure propagates so a transient error
    /// is never mistaken for "safe to create". Two concurrent callers can
    /// both observe absence; the backend's atomic insert rejects the loser
    /// with a conflict, which is folded into `AlreadyExists` so exactly
    /// one copy survives either way.
    ///
    /// # Errors
    ///
    /// Propagates every backend failure other than the documented absence
    /// and conflict signals, with the operation, record id and partition
    /// key in the log context.
    pub async fn upsert_if_absent(&self, record: &OrderFormRecord) -> Result<UpsertResult> {
        let record_type = record.record_type();
        let id = record.id();

        tracing::debug!(
            record_id = %id,
            partition_key = %record_type,
            "Checking whether record exists"
        );

        match self
            .with_timeout("read_document", self.backend.read_document(record_type, id))
            .await
        {
            Ok(_) => {
                tracing::info!(
                    record_id = %id,
                    partition_key = %record_type,
                    "Record already exists, leaving unchanged"
                );
                Ok(UpsertResult::AlreadyExists { id: *id })
            }
            Err(e) if e.is_not_found() => {
                let document = FormDocument::from_domain(record);
                match self
                    .with_timeout("create_document", self.backend.create_document(&document))
                    .await
                {
                    Ok(created) => {
                        tracing::info!(
                            record_id = %id,
                            partition_key = %record_type,
                            cost_units = created.cost_units,
                            "Record created"
                        );
                        Ok(UpsertResult::Created {
                            id: *id,
                            cost_units: created.cost_units,
                        })
                    }
                    Err(StoreError::Backend(BackendError::Conflict(_))) => {
                        // Lost the race to a concurrent creator; their copy stands.
                        tracing::info!(
                            record_id = %id,
                            partition_key = %record_type,
                            "Record created concurrently, leaving unchanged"
                        );
                        Ok(UpsertResult::AlreadyExists { id: *id })
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => {
                tracing::warn!(
                    record_id = %id,
                    partition_key = %record_type,
                    error = %e,
                    "Existence check failed, refusing to create"
                );
                Err(e)
            }
        }
    }

    /// Stream all records whose discriminator matches
    ///
    /// The stream is lazy and finite: pages are fetched strictly in
    /// sequence as items are consumed, in whatever order the backend
    /// returns them. A type with no records yields an empty stream.
    /// Calling this again produces a fresh, restarted stream.
    pub fn query_by_type(
        &self,
        record_type: RecordType,
    ) -> impl Stream<Item = Result<OrderFormRecord>> + Send + 'static {
        let backend = Arc::clone(&self.backend);
        let request_timeout = self.options.request_timeout;
        let shutdown = self.shutdown.clone();

        futures::stream::try_unfold(QueryCursor::default(), move |mut cursor| {
            let backend = Arc::clone(&backend);
            let record_type = record_type.clone();
            let shutdown = shutdown.clone();
            async move {
                loop {
                    if let Some(document) = cursor.buffered.pop_front() {
                        return Ok(Some((document.into_domain()?, cursor)));
                    }
                    if cursor.exhausted {
                        return Ok(None);
                    }

                    let page = guarded(
                        "query_page",
                        request_timeout,
                        shutdown.clone(),
                        backend.query_page(&record_type, cursor.continuation.take()),
                    )
                    .await?;

                    cursor.exhausted = page.continuation.is_none();
                    cursor.continuation = page.continuation;
                    cursor.buffered = page.documents.into();
                }
            }
        })
    }

    /// Delete the entire database and release the store handle
    ///
    /// Idempotent at the store level: a `NotFound` from the backend means
    /// there was nothing to delete and is not an error. This is the one
    /// place the store tolerates `NotFound` silently.
    pub async fn teardown(self) -> Result<()> {
        match self
            .with_timeout("delete_database", self.backend.delete_database())
            .await
        {
            Ok(()) => {
                tracing::info!(
                    database = self.backend.database_name(),
                    "Database deleted"
                );
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    database = self.backend.database_name(),
                    "Nothing to tear down"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        self.backend.database_name()
    }

    /// Get the container name
    pub fn container_name(&self) -> &str {
        &self.options.container_name
    }

    /// Run a backend call under the configured deadline and shutdown signal
    async fn with_timeout<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        guarded(
            operation,
            self.options.request_timeout,
            self.shutdown.clone(),
            call,
        )
        .await
    }
}

/// Race a backend call against its deadline and the shutdown signal
///
/// The call is dropped, not merely abandoned, on either outcome, so a
/// cancelled or timed-out operation holds no backend resources.
async fn guarded<T>(
    operation: &str,
    request_timeout: Duration,
    shutdown: Option<watch::Receiver<bool>>,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        result = tokio::time::timeout(request_timeout, call) => match result {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(format!(
                "{operation} did not complete within {request_timeout:?}"
            ))
            .into()),
        },
        () = shutdown_requested(shutdown) => Err(BackendError::Cancelled(format!(
            "{operation} aborted by shutdown signal"
        ))
        .into()),
    }
}

/// Resolves once a shutdown is signalled; pends forever when no signal is
/// attached or the sender is gone
async fn shutdown_requested(shutdown: Option<watch::Receiver<bool>>) {
    match shutdown {
        Some(mut receiver) => {
            if receiver.wait_for(|stop| *stop).await.is_err() {
                // Sender dropped without signalling: shutdown can no
                // longer be requested on this channel.
                std::future::pending::<()>().await;
            }
        }
        None => std::future::pending::<()>().await,
    }
}

/// Paging state for a type query
#[derive(Debug, Default)]
struct QueryCursor {
    buffered: VecDeque<FormDocument>,
    continuation: Option<String>,
    exhausted: bool,
}
