//! Record store core
//!
//! The store layer owns create-if-absent upsert semantics, type-scoped
//! retrieval, and namespace lifecycle over an abstract backend.

pub mod record_store;

pub use record_store::{RecordStore, StoreOptions, UpsertResult, PARTITION_KEY_PATH};
