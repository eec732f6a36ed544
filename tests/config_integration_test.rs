//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use formstore::config::load_config;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("FORMSTORE_APPLICATION_LOG_LEVEL");
    std::env::remove_var("FORMSTORE_APPLICATION_DRY_RUN");
    std::env::remove_var("FORMSTORE_COSMOSDB_DATABASE_NAME");
    std::env::remove_var("FORMSTORE_COSMOSDB_THROUGHPUT");
    std::env::remove_var("TEST_FORMSTORE_COSMOS_KEY");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[application]
log_level = "debug"
dry_run = true

[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"
key = "test-key-12345"
database_name = "TestOrderForms"
container_name = "Items"
partition_key = "/Type"
throughput = 400
request_timeout_seconds = 10

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "hourly"
"#;

    let file = write_config(toml_content);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(
        config.cosmosdb.endpoint,
        "https://test.documents.azure.com:443/"
    );
    assert_eq!(config.cosmosdb.key.expose_secret(), "test-key-12345");
    assert_eq!(config.cosmosdb.database_name, "TestOrderForms");
    assert_eq!(config.cosmosdb.container_name, "Items");
    assert_eq!(config.cosmosdb.partition_key, "/Type");
    assert_eq!(config.cosmosdb.throughput, 400);
    assert_eq!(config.cosmosdb.request_timeout_seconds, 10);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_gets_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"
key = "test-key"
"#;

    let file = write_config(toml_content);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.cosmosdb.database_name, "TestOrderForms");
    assert_eq!(config.cosmosdb.container_name, "Items");
    assert_eq!(config.cosmosdb.partition_key, "/Type");
    assert_eq!(config.cosmosdb.throughput, 400);
    assert_eq!(config.cosmosdb.request_timeout_seconds, 30);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_FORMSTORE_COSMOS_KEY", "secret-from-env");

    let toml_content = r#"
[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"
key = "${TEST_FORMSTORE_COSMOS_KEY}"
"#;

    let file = write_config(toml_content);
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.cosmosdb.key.expose_secret(), "secret-from-env");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"
key = "${TEST_FORMSTORE_COSMOS_KEY}"
"#;

    let file = write_config(toml_content);
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_env_overrides_take_precedence() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("FORMSTORE_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("FORMSTORE_COSMOSDB_DATABASE_NAME", "OverriddenForms");
    std::env::set_var("FORMSTORE_COSMOSDB_THROUGHPUT", "1000");

    let toml_content = r#"
[application]
log_level = "info"

[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"
key = "test-key"
database_name = "TestOrderForms"
throughput = 400
"#;

    let file = write_config(toml_content);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.cosmosdb.database_name, "OverriddenForms");
    assert_eq!(config.cosmosdb.throughput, 1000);

    cleanup_env_vars();
}

#[test]
fn test_invalid_partition_key_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[cosmosdb]
endpoint = "https://test.documents.azure.com:443/"
key = "test-key"
partition_key = "Type"
"#;

    let file = write_config(toml_content);
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("partition_key"));
}

#[test]
fn test_invalid_endpoint_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[cosmosdb]
endpoint = "not a url"
key = "test-key"
"#;

    let file = write_config(toml_content);
    assert!(load_config(file.path()).is_err());
}
