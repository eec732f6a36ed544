//! Domain models and types for formstore.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RecordId`], [`RecordType`])
//! - **Domain models** ([`OrderFormRecord`], [`RecordKind`], [`CustomContent`])
//! - **Error types** ([`StoreError`], [`BackendError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Formstore uses the newtype pattern for identifiers to prevent mixing
//! different ID types:
//!
//! ```rust
//! use formstore::domain::{RecordId, RecordType};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let id = RecordId::generate();
//! let record_type = RecordType::new("TestOrderForm")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: RecordId = record_type;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, StoreError>`]:
//!
//! ```rust
//! use formstore::domain::{Result, StoreError};
//!
//! fn example() -> Result<()> {
//!     Err(StoreError::Configuration("missing endpoint".to_string()))
//! }
//! ```
//!
//! # Builder Pattern
//!
//! Records are constructed through a builder so the id is assigned exactly
//! once and invalid half-built records are unrepresentable:
//!
//! ```rust
//! use formstore::domain::OrderFormRecord;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let record = OrderFormRecord::builder()
//!     .profile("Iron")
//!     .source("RCLS")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{BackendError, StoreError};
pub use ids::{RecordId, RecordType};
pub use record::{CustomContent, OrderFormRecord, OrderFormRecordBuilder, RecordKind};
pub use result::Result;
