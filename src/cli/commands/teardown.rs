//! Teardown command implementation
//!
//! This module implements the `teardown` command for deleting the
//! database and every record in it. The operation is idempotent: tearing
//! down a database that does not exist succeeds quietly.

use crate::adapters::cosmosdb::CosmosBackend;
use crate::config::load_config;
use crate::store::{RecordStore, StoreOptions};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the teardown command
#[derive(Args, Debug)]
pub struct TeardownArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl TeardownArgs {
    /// Execute the teardown command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting teardown command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if !self.yes {
            println!(
                "This deletes database '{}' on {} and every record in it.",
                config.cosmosdb.database_name, config.cosmosdb.endpoint
            );
            println!();

            if !super::confirm("Delete the database?")? {
                println!("Teardown cancelled.");
                return Ok(0);
            }
        }

        let backend = match CosmosBackend::new(config.cosmosdb.clone()) {
            Ok(b) => Arc::new(b),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create Cosmos DB backend");
                eprintln!("Failed to connect to Cosmos DB: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let options = StoreOptions {
            container_name: config.cosmosdb.container_name.clone(),
            partition_key_path: config.cosmosdb.partition_key.clone(),
            throughput: config.cosmosdb.throughput,
            request_timeout: Duration::from_secs(config.cosmosdb.request_timeout_seconds),
        };

        // Attach without provisioning; deleting must not create first
        let store = match RecordStore::attach(backend, options) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Invalid store options");
                eprintln!("Invalid store options: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let database_name = store.database_name().to_string();
        match store.teardown().await {
            Ok(()) => {
                println!("✅ Database '{database_name}' deleted.");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Teardown failed");
                eprintln!("Failed to delete database '{database_name}': {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}
