//! CRM client - a command-line front end for the customer and orders gateway.
//!
//! Sign in once with `crm login`; the token is kept in the configured session
//! store and attached to every later command.

mod app;
mod command;
mod render;

use std::io;
use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use command::Command;
use crm_core::Config;

/// Log file written in the data directory
const LOG_FILE: &str = "crm.log";

/// Initialize the tracing subscriber for logging.
/// Returns the file writer guard, which must stay alive until exit.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok());
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    let log_dir = config.data_dir().ok();
    let _log_guard = init_tracing(log_dir.as_deref());
    if log_dir.is_none() {
        warn!("No data directory available, file logging disabled");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    info!(?command, base_url = %config.base_url, "CRM client starting");

    let app = App::new(&config)?;
    app.run(command).await
}
