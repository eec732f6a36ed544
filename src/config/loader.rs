//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::FormstoreConfig;
use crate::config::secret_string;
use crate::domain::errors::StoreError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into FormstoreConfig
/// 4. Applies environment variable overrides (FORMSTORE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use formstore::config::loader::load_config;
///
/// let config = load_config("formstore.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FormstoreConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        StoreError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: FormstoreConfig = toml::from_str(&contents)
        .map_err(|e| StoreError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        StoreError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(StoreError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the FORMSTORE_* prefix
///
/// Environment variables follow the pattern: FORMSTORE_<SECTION>_<KEY>
/// For example: FORMSTORE_COSMOSDB_ENDPOINT, FORMSTORE_APPLICATION_LOG_LEVEL
fn apply_env_overrides(config: &mut FormstoreConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("FORMSTORE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("FORMSTORE_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Cosmos DB overrides
    if let Ok(val) = std::env::var("FORMSTORE_COSMOSDB_ENDPOINT") {
        config.cosmosdb.endpoint = val;
    }
    if let Ok(val) = std::env::var("FORMSTORE_COSMOSDB_KEY") {
        config.cosmosdb.key = secret_string(val);
    }
    if let Ok(val) = std::env::var("FORMSTORE_COSMOSDB_DATABASE_NAME") {
        config.cosmosdb.database_name = val;
    }
    if let Ok(val) = std::env::var("FORMSTORE_COSMOSDB_CONTAINER_NAME") {
        config.cosmosdb.container_name = val;
    }
    if let Ok(val) = std::env::var("FORMSTORE_COSMOSDB_THROUGHPUT") {
        if let Ok(throughput) = val.parse() {
            config.cosmosdb.throughput = throughput;
        }
    }
    if let Ok(val) = std::env::var("FORMSTORE_COSMOSDB_REQUEST_TIMEOUT_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.cosmosdb.request_timeout_seconds = seconds;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("FORMSTORE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("FORMSTORE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
