//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for formstore using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Formstore - typed order-form record store over Azure Cosmos DB
#[derive(Parser, Debug)]
#[command(name = "formstore")]
#[command(version, about, long_about = None)]
#[command(author = "Formstore Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "formstore.toml", env = "FORMSTORE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FORMSTORE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the store, seed sample order forms, and query them back
    Run(commands::run::RunArgs),

    /// Delete the database and all records in it
    Teardown(commands::teardown::TeardownArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["formstore", "run"]);
        assert_eq!(cli.config, "formstore.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["formstore", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["formstore", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_teardown() {
        let cli = Cli::parse_from(["formstore", "teardown", "--yes"]);
        match cli.command {
            Commands::Teardown(args) => assert!(args.yes),
            _ => panic!("expected teardown command"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["formstore", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["formstore", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from(["formstore", "run", "--dry-run", "--yes", "--teardown"]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.dry_run);
                assert!(args.yes);
                assert!(args.teardown);
            }
            _ => panic!("expected run command"),
        }
    }
}
