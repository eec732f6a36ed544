//! Storage adapters
//!
//! Each adapter implements the [`Backend`] trait against a concrete
//! document store. The in-memory backend serves dry runs and tests; the
//! Cosmos DB backend is the production path.
//!
//! [`Backend`]: backend::Backend

pub mod backend;
pub mod cosmosdb;
