//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "formstore.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing formstore configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Generate configuration content
        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        // Write to file
        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set FORMSTORE_COSMOS_KEY to your Cosmos DB account key");
                println!("  3. Validate configuration: formstore validate-config");
                println!("  4. Seed and query sample records: formstore run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Formstore Configuration File
# Typed order-form record store over Azure Cosmos DB

[application]
log_level = "info"
dry_run = false

[cosmosdb]
endpoint = "https://your-account.documents.azure.com:443/"
key = "${FORMSTORE_COSMOS_KEY}"
database_name = "TestOrderForms"
container_name = "Items"
partition_key = "/Type"
throughput = 400
request_timeout_seconds = 30

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Formstore Configuration File
# Typed order-form record store over Azure Cosmos DB
#
# This file contains all configuration options with examples and
# explanations.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode: keep all records in an in-memory store instead of
# Cosmos DB. Useful for trying the tool without an Azure account.
dry_run = false

# ============================================================================
# Azure Cosmos DB Configuration
# ============================================================================
[cosmosdb]
# Cosmos DB account endpoint URL
endpoint = "https://your-account.documents.azure.com:443/"

# Cosmos DB primary key (use environment variable)
key = "${FORMSTORE_COSMOS_KEY}"

# Database name
database_name = "TestOrderForms"

# Container name
container_name = "Items"

# Partition key path. Records partition by their type discriminator,
# so this must stay /Type.
partition_key = "/Type"

# Provisioned container throughput in RU/s
throughput = 400

# Per-request deadline in seconds
request_timeout_seconds = 30

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Directory for local log files
local_path = "logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "formstore.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "formstore.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config() {
        let config = InitArgs::generate_minimal_config();
        assert!(config.contains("[application]"));
        assert!(config.contains("[cosmosdb]"));
        assert!(config.contains("partition_key = \"/Type\""));
    }

    #[test]
    fn test_generate_config_with_examples() {
        let config = InitArgs::generate_config_with_examples();
        assert!(config.contains("# Formstore Configuration File"));
        assert!(config.contains("database_name"));
        assert!(config.contains("throughput"));
    }

    #[test]
    fn test_generated_configs_parse() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let value: toml::Value = toml::from_str(&content).unwrap();
            assert!(value.get("cosmosdb").is_some());
        }
    }
}
