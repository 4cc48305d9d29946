//! Ledframe CLI Binary
//!
//! Command-line interface for the Ledframe animation cache.

use anyhow::Context;
use clap::Parser;
use ledframe::cli::{exit_code, map_error, Cli, CommandOutput, RunContext, StoreOptions};
use ledframe::config::ConfigLoader;
use ledframe::logging::{init_logging, LoggingConfig};
use std::io::IsTerminal;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Ledframe CLI starting");

    let store = StoreOptions {
        path: cli.store.clone(),
        ephemeral: cli.ephemeral,
    };
    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone(), store) {
        Ok(ctx) => {
            info!("CLI context initialized");
            ctx.with_color(std::io::stdout().is_terminal())
        }
        Err(e) => {
            error!("Error initializing animation cache: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(exit_code(&e));
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            if let Err(e) = write_output(&output) {
                eprintln!("{:#}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(exit_code(&e));
        }
    }
}

fn write_output(output: &CommandOutput) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    output
        .write_to(&mut stdout.lock())
        .context("Failed to write command output")
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }

    config
}
