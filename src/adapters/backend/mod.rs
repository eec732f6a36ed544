//! Backend abstraction
//!
//! This module provides the storage backend trait, the persisted document
//! shape, and the in-memory implementation used for dry runs and tests.

pub mod document;
pub mod memory;
pub mod traits;

pub use document::FormDocument;
pub use memory::InMemoryBackend;
pub use traits::{Backend, ContainerSpec, CreatedDocument, DocumentPage};
