//! Email-Sweep main entry point
//!
//! This is the command-line interface for the Email-Sweep harvester.

use clap::Parser;
use email_sweep::browser::ChromiumBrowser;
use email_sweep::config::{load_config_or_default, Config};
use email_sweep::crawler::run_harvest;
use email_sweep::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Email-Sweep: a click-everything email harvester
///
/// Email-Sweep opens a site in a real browser, clicks every visible element
/// on every page it can reach on the same domain, and prints the email
/// addresses it finds along the way.
#[derive(Parser, Debug)]
#[command(name = "email-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A click-everything email harvester", long_about = None)]
struct Cli {
    /// URL to start from; the scheme is optional
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(cfg) => {
            if let Some(path) = &cli.config {
                tracing::info!("Configuration loaded from: {}", path.display());
            }
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    handle_harvest(&cli.start_url, &config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("email_sweep=info,warn"),
            1 => EnvFilter::new("email_sweep=debug,info"),
            2 => EnvFilter::new("email_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the harvest and prints the addresses found
async fn handle_harvest(start_url: &str, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let browser = ChromiumBrowser::new(
        config.browser.clone(),
        config.harvest.clickable_selector.as_str(),
    );

    let report = match run_harvest(browser, start_url, config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report)?;
    Ok(())
}
