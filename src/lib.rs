// Formstore - Typed Order-Form Record Store for Azure Cosmos DB
// Copyright (c) 2025 Formstore Contributors
// Licensed under the MIT License

//! # Formstore - Typed Order-Form Record Store
//!
//! Formstore is a small, strongly typed record store for laboratory test
//! order forms, backed by Azure Cosmos DB. Records carry a stable identity,
//! a type discriminator that doubles as the partition key, and an
//! open-ended metadata bag; writes are idempotent create-if-absent upserts.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Modelling** order-form records as a closed sum type with a base and
//!   a health variant
//! - **Provisioning** the database and container idempotently on store open
//! - **Upserting** records with create-if-absent semantics that survive
//!   concurrent writers
//! - **Querying** records by type as a lazy, paged stream
//! - **Tearing down** the database idempotently
//!
//! ## Architecture
//!
//! Formstore follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`store`] - Store semantics (provisioning, upsert, query, teardown)
//! - [`adapters`] - Storage backends (Cosmos DB, in-memory)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formstore::adapters::backend::memory::InMemoryBackend;
//! use formstore::domain::OrderFormRecord;
//! use formstore::store::{RecordStore, StoreOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));
//!     let store = RecordStore::open(backend, StoreOptions::default()).await?;
//!
//!     let record = OrderFormRecord::builder()
//!         .profile("Iron")
//!         .source("RCLS")
//!         .build()?;
//!
//!     let outcome = store.upsert_if_absent(&record).await?;
//!     println!("Stored record {}", outcome.id());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Formstore uses the [`domain::StoreError`] type for all errors:
//!
//! ```rust,no_run
//! use formstore::domain::StoreError;
//!
//! fn example() -> Result<(), StoreError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = formstore::config::load_config("formstore.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Formstore uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Opening store");
//! warn!(record_type = "TestOrderForm", "No records found");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod store;
