//! Configuration management for formstore.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Formstore uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`FORMSTORE_*` prefix)
//! - Default values for optional settings
//! - Type-safe configuration structs
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! dry_run = false
//!
//! [cosmosdb]
//! endpoint = "https://your-account.documents.azure.com:443/"
//! key = "${FORMSTORE_COSMOS_KEY}"
//! database_name = "TestOrderForms"
//! container_name = "Items"
//! throughput = 400
//!
//! [logging]
//! local_enabled = false
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use formstore::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("formstore.toml")?;
//! println!("Database: {}", config.cosmosdb.database_name);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{ApplicationConfig, CosmosDbConfig, FormstoreConfig, LoggingConfig};
pub use secret::{secret_string, SecretString, SecretValue};
