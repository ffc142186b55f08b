//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::config::ConfigArgs;
use super::commands::generate::GenerateArgs;

/// Command-line arguments
#[derive(Parser)]
#[command(name = "leadgen")]
#[command(about = "Leadgen - bounded incremental lead generation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .leadgen/
    #[arg(short, long, global = true, env = "LEADGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a generation session until the target is reached or a limit fires
    Generate(GenerateArgs),

    /// Inspect the effective configuration
    Config(ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::generate::LeadKind;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "leadgen",
            "generate",
            "--kind",
            "profile",
            "--target",
            "25",
            "--criteria",
            r#"{"platform":"instagram"}"#,
            "--time-budget",
            "120",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate command");
        };
        assert_eq!(args.kind, LeadKind::Profile);
        assert_eq!(args.target, 25);
        assert_eq!(args.time_budget, Some(120));
        assert_eq!(args.max_attempts, None);
    }

    #[test]
    fn test_generate_defaults_to_organization() {
        let cli = Cli::try_parse_from(["leadgen", "generate", "--target", "5"]).unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate command");
        };
        assert_eq!(args.kind, LeadKind::Organization);
        assert_eq!(args.criteria, "{}");
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["leadgen", "config", "show", "-c", "custom.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert!(matches!(cli.command, Commands::Config(_)));
    }
}
