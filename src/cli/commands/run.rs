//! Run command implementation
//!
//! This module implements the `run` command: provision the store, seed a
//! pair of sample order forms idempotently, query them back by type, and
//! optionally tear the database down afterwards.

use crate::adapters::backend::memory::InMemoryBackend;
use crate::adapters::backend::traits::Backend;
use crate::adapters::cosmosdb::CosmosBackend;
use crate::config::load_config;
use crate::domain::record::{CustomContent, OrderFormRecord, RecordKind};
use crate::domain::RecordType;
use crate::store::{RecordStore, StoreOptions, UpsertResult};
use chrono::{Months, Utc};
use clap::Args;
use futures::StreamExt;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - use an in-memory store instead of Cosmos DB
    #[arg(long)]
    pub dry_run: bool,

    /// Delete the database after the run without asking
    #[arg(long)]
    pub teardown: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply dry-run flag from CLI
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - records stay in memory");
            println!("🔍 DRY RUN MODE - Using an in-memory store, nothing touches Cosmos DB");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !config.application.dry_run {
            println!("Run Configuration:");
            println!("  Endpoint: {}", config.cosmosdb.endpoint);
            println!("  Database: {}", config.cosmosdb.database_name);
            println!("  Container: {}", config.cosmosdb.container_name);
            println!("  Partition Key: {}", config.cosmosdb.partition_key);
            println!("  Throughput: {}", config.cosmosdb.throughput);
            println!();

            if !super::confirm("Proceed with run?")? {
                println!("Run cancelled.");
                return Ok(0);
            }
        }

        // Build the backend
        let backend: Arc<dyn Backend> = if config.application.dry_run {
            Arc::new(InMemoryBackend::new(&config.cosmosdb.database_name))
        } else {
            match CosmosBackend::new(config.cosmosdb.clone()) {
                Ok(b) => Arc::new(b),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create Cosmos DB backend");
                    eprintln!("Failed to connect to Cosmos DB: {e}");
                    return Ok(4); // Connection error exit code
                }
            }
        };

        let options = StoreOptions {
            container_name: config.cosmosdb.container_name.clone(),
            partition_key_path: config.cosmosdb.partition_key.clone(),
            throughput: config.cosmosdb.throughput,
            request_timeout: Duration::from_secs(config.cosmosdb.request_timeout_seconds),
        };

        // Provision database and container idempotently
        println!("🚀 Provisioning store...");
        let store = match RecordStore::open(backend, options).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open record store");
                eprintln!("Failed to open record store: {e}");
                return Ok(4); // Connection error exit code
            }
        };
        // In-flight store calls abort with Cancelled once a signal lands
        let store = store.with_shutdown(shutdown_signal.clone());
        println!(
            "✅ Store ready: database '{}', container '{}'",
            store.database_name(),
            store.container_name()
        );
        println!();

        if interrupted(&shutdown_signal) {
            return Ok(interrupted_exit());
        }

        // Seed sample records
        let records = match sample_records() {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build sample records");
                eprintln!("Failed to build sample records: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let mut created = 0usize;
        let mut skipped = 0usize;

        for record in &records {
            if interrupted(&shutdown_signal) {
                return Ok(interrupted_exit());
            }

            match store.upsert_if_absent(record).await {
                Ok(UpsertResult::Created { id, cost_units }) => {
                    created += 1;
                    println!(
                        "Created item in database with id: {id}. Operation consumed {cost_units} cost units."
                    );
                }
                Ok(UpsertResult::AlreadyExists { id }) => {
                    skipped += 1;
                    println!("Item in database with id: {id} already exists.");
                }
                Err(e) if e.is_cancelled() => {
                    tracing::info!(record_id = %record.id(), error = %e, "Upsert aborted");
                    return Ok(interrupted_exit());
                }
                Err(e) => {
                    tracing::error!(record_id = %record.id(), error = %e, "Upsert failed");
                    eprintln!("Failed to store record {}: {e}", record.id());
                    return Ok(5); // Fatal error exit code
                }
            }
        }
        println!();

        // Query each seeded type back
        let mut fetched = 0usize;
        for record_type in seeded_types(&records) {
            if interrupted(&shutdown_signal) {
                return Ok(interrupted_exit());
            }

            println!("Records of type '{record_type}':");
            let mut stream = pin!(store.query_by_type(record_type.clone()));
            let mut count = 0usize;

            while let Some(item) = stream.next().await {
                match item {
                    Ok(record) => {
                        count += 1;
                        print_record(&record);
                    }
                    Err(e) if e.is_cancelled() => {
                        tracing::info!(record_type = %record_type, error = %e, "Query aborted");
                        return Ok(interrupted_exit());
                    }
                    Err(e) => {
                        tracing::error!(record_type = %record_type, error = %e, "Query failed");
                        eprintln!("Failed to query records of type '{record_type}': {e}");
                        return Ok(5); // Fatal error exit code
                    }
                }
            }

            println!("  ({count} record(s))");
            println!();
            fetched += count;
        }

        // Summary
        println!("📊 Run Summary:");
        println!("  Created: {created}");
        println!("  Already Present: {skipped}");
        println!("  Fetched by Query: {fetched}");
        println!();

        // Optional teardown
        let delete_database = if self.teardown {
            true
        } else if self.yes || config.application.dry_run {
            false
        } else {
            super::confirm(&format!(
                "Delete database '{}' and all its records?",
                store.database_name()
            ))?
        };

        if delete_database {
            let database_name = store.database_name().to_string();
            if let Err(e) = store.teardown().await {
                tracing::error!(error = %e, "Teardown failed");
                eprintln!("Failed to delete database '{database_name}': {e}");
                return Ok(5); // Fatal error exit code
            }
            println!("✅ Database '{database_name}' deleted.");
        }

        println!("✅ Run completed successfully!");
        Ok(0)
    }
}

/// Whether a shutdown has been requested
fn interrupted(shutdown_signal: &watch::Receiver<bool>) -> bool {
    *shutdown_signal.borrow()
}

/// Report the interruption and hand back the SIGINT exit code
fn interrupted_exit() -> i32 {
    tracing::info!("Run interrupted by shutdown signal");
    println!();
    println!("⚠️  Run interrupted. Completed writes are durable; re-run to continue.");
    130
}

/// Build the two sample order forms the demo run seeds
fn sample_records() -> Result<Vec<OrderFormRecord>, String> {
    let base = OrderFormRecord::builder()
        .profile("Iron")
        .source("RCLS")
        .build()?;

    let date_of_birth = Utc::now()
        .checked_sub_months(Months::new(7 * 12 + 1))
        .ok_or("Date of birth out of range")?;
    let health = OrderFormRecord::builder()
        .profile("EM")
        .source("Randox Health")
        .health("1234", date_of_birth, "Unknown")
        .metadata("PID", CustomContent::String("PID1234".to_string()))
        .build()?;

    Ok(vec![base, health])
}

/// Distinct record types of the seeded records, in seed order
fn seeded_types(records: &[OrderFormRecord]) -> Vec<RecordType> {
    let mut types: Vec<RecordType> = Vec::new();
    for record in records {
        if !types.contains(record.record_type()) {
            types.push(record.record_type().clone());
        }
    }
    types
}

/// Print a single record in the listing format
fn print_record(record: &OrderFormRecord) {
    match record.kind() {
        RecordKind::Base => {
            println!(
                "  - {} | profile {} | source {}",
                record.id(),
                record.profile(),
                record.source()
            );
        }
        RecordKind::Health { patient_id, .. } => {
            println!(
                "  - {} | profile {} | source {} | patient {}",
                record.id(),
                record.profile(),
                record.source(),
                patient_id
            );
        }
    }
}
