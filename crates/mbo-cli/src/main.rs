//! MBO CLI - Main entry point

use clap::Parser;
use mbo_cli::Cli;
use mbo_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // The DEBUG environment variable flips verbose on as well
    let verbose = cli.verbose || std::env::var_os("DEBUG").is_some();

    let log_config = LogConfig::builder()
        .level(if verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        })
        .log_file_prefix("mbo".to_string())
        .build();

    // Layer environment overrides on top (set variables take precedence,
    // the flag-derived values survive otherwise)
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // Initialize logging (ignore errors as the CLI should work without logging)
    let _ = init_logging(&log_config);

    // Execute the upload pipeline
    if let Err(e) = mbo_cli::commands::upload::run(&cli).await {
        error!(error = %e, "Upload failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
