//! Implementation of the `leadgen config` commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

/// Arguments for `leadgen config`
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// `leadgen config` subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration after merging files and environment
    Show,
}

/// Effective configuration, printed as YAML or JSON
#[derive(Debug, serde::Serialize)]
pub struct ConfigOutput {
    /// Merged and validated configuration
    #[serde(flatten)]
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config)
            .unwrap_or_else(|err| format!("Failed to render configuration: {err}"))
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run a `leadgen config` subcommand
pub fn execute(args: ConfigArgs, config: Config, json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            output(&ConfigOutput { config }, json_mode);
        }
    }
    Ok(())
}
