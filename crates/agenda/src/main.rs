//! agenda: contacts manager
//!
//! Main entry point for the interactive contacts client.
//!
//! Usage:
//!   agenda           - Start the interactive contact list
//!   agenda --help    - Show help
//!   agenda --version - Show version

mod cli;

use std::sync::Arc;

use agenda_contacts::{ContactsApi, ContactsClient};
use agenda_core::{Config, ContactSynchronizer, FormController, ListPresenter};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Interactive contact list
    Interactive,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("agenda {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Interactive => {}
    }

    // Logs go to stderr so they stay apart from the REPL output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting agenda...");
    tracing::info!("API: {}", config.api.base_url);

    let client = ContactsClient::new(&config.api)
        .map_err(|e| anyhow::anyhow!("Failed to create contacts client: {}", e))?;
    let api: Arc<dyn ContactsApi> = Arc::new(client);

    let presenter = Arc::new(ListPresenter::new(Arc::clone(&api)));
    let synchronizer = Arc::new(ContactSynchronizer::new(
        Arc::clone(&api),
        Arc::clone(&presenter),
    ));
    let form = FormController::new(api, synchronizer);

    let observer = spawn_list_observer(&presenter);

    let result = cli::run_cli(cli::App { presenter, form }).await;

    observer.abort();
    result
}

/// Log every list snapshot published by the presenter
fn spawn_list_observer(presenter: &ListPresenter) -> tokio::task::JoinHandle<()> {
    let mut snapshots = presenter.subscribe();
    tokio::spawn(async move {
        loop {
            match snapshots.recv().await {
                Ok(snapshot) => {
                    tracing::debug!("Contact list updated: {} contacts", snapshot.len())
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("List observer skipped {} snapshots", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Interactive
}

/// Print help message
fn print_help() {
    println!("agenda - contacts manager");
    println!();
    println!("Usage:");
    println!("  agenda            Start the interactive contact list");
    println!("  agenda --help     Show this help message");
    println!("  agenda --version  Show version");
    println!();
    println!("Configuration:");
    println!("  ./agenda.toml     [api] base_url, timeout_secs");
    println!();
    println!("Environment Variables:");
    println!("  AGENDA_API_URL           Contacts API base URL (default: http://localhost:8000/api)");
    println!("  AGENDA_API_TIMEOUT_SECS  Request timeout in seconds (default: transport default)");
    println!("  RUST_LOG                 Log filter (default: info)");
}
