//! Autosubs - Automated Video Subtitling
//!
//! Entry point: parses the command line, sets up logging and configuration,
//! then runs the workflow over the given file or directory.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::Path;
use tracing::{error, info, warn, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autosubs::cli::Args;
use autosubs::config::Config;
use autosubs::workflow::Workflow;

const DEFAULT_CONFIG_FILE: &str = "autosubs.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;
    info!("Starting Autosubs - Automated Video Subtitling");

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };

    if let Some(model) = args.model {
        config.transcriber.model = model;
    }
    info!("Using {} model", config.transcriber.model);

    let workflow = Workflow::new(config).await?;
    let report = workflow.run(&args.input, &args.output).await?;

    for output in &report.processed {
        println!("Success! Output file: {}", output.display());
    }
    for skipped in &report.skipped {
        warn!("Skipped: {} ({})", skipped.path.display(), skipped.error);
    }
    for failure in &report.failed {
        error!("Failed: {} ({})", failure.path.display(), failure.error);
    }

    if !report.is_success() {
        bail!("{} of {} videos failed", report.failed.len(), report.failed.len() + report.processed.len());
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".autosubs").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "autosubs.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
