//! Azure Cosmos DB adapter
//!
//! Provides the Cosmos DB implementation of the [`Backend`] trait,
//! split into a client (SDK calls and error classification) and a thin
//! adapter (trait wiring).
//!
//! [`Backend`]: crate::adapters::backend::Backend

pub mod adapter;
pub mod client;

pub use adapter::CosmosBackend;
pub use client::CosmosDbClient;
