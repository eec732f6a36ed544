//! Configuration schema types
//!
//! This module defines the configuration structure for formstore, mapping
//! one-to-one onto the TOML file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main formstore configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormstoreConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Azure Cosmos DB connection and provisioning settings
    pub cosmosdb: CosmosDbConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FormstoreConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.cosmosdb.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (use the in-memory backend instead of Cosmos DB)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Azure Cosmos DB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmosDbConfig {
    /// Account endpoint URL
    pub endpoint: String,

    /// Account key
    /// Stored securely in memory and automatically zeroized on drop
    pub key: SecretString,

    /// Database name
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Container name
    #[serde(default = "default_container_name")]
    pub container_name: String,

    /// Partition key path; must address the record type discriminator
    #[serde(default = "default_partition_key")]
    pub partition_key: String,

    /// Provisioned throughput for the container
    #[serde(default = "default_throughput")]
    pub throughput: i32,

    /// Per-request deadline in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl CosmosDbConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("cosmosdb.endpoint is not a valid URL: {e}"))?;
        if endpoint.scheme() != "https" && endpoint.scheme() != "http" {
            return Err("cosmosdb.endpoint must use http:// or https://".to_string());
        }

        if self.key.expose_secret().is_empty() {
            return Err("cosmosdb.key cannot be empty".to_string());
        }

        if self.database_name.is_empty() {
            return Err("cosmosdb.database_name cannot be empty".to_string());
        }

        if self.container_name.is_empty() {
            return Err("cosmosdb.container_name cannot be empty".to_string());
        }

        if !self.partition_key.starts_with('/') {
            return Err(format!(
                "cosmosdb.partition_key must be a path starting with '/', got '{}'",
                self.partition_key
            ));
        }

        if self.throughput <= 0 {
            return Err(format!(
                "cosmosdb.throughput must be positive, got {}",
                self.throughput
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err("cosmosdb.request_timeout_seconds must be positive".to_string());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to write JSON logs to a local file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy ("daily" or "hourly")
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_name() -> String {
    "TestOrderForms".to_string()
}

fn default_container_name() -> String {
    "Items".to_string()
}

fn default_partition_key() -> String {
    "/Type".to_string()
}

fn default_throughput() -> i32 {
    400
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
