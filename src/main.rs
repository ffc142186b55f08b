//! Leadgen CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use leadgen::cli::{Cli, Commands};
use leadgen::domain::models::Config;
use leadgen::infrastructure::{ConfigLoader, LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => leadgen::cli::handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging)
        .map_err(anyhow::Error::from)
        .and_then(|log_config| LoggerImpl::init(&log_config))
        .context("Failed to initialize logging")
    {
        Ok(logger) => logger,
        Err(err) => leadgen::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Generate(args) => {
            leadgen::cli::commands::generate::execute(args, config, cli.json).await
        }
        Commands::Config(args) => leadgen::cli::commands::config::execute(args, config, cli.json),
    };

    if let Err(err) = result {
        leadgen::cli::handle_error(err, cli.json);
    }
}
