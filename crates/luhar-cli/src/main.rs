mod cli;
mod commands;
mod interactive;
mod paint;

use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use luhar_core::config::AppConfig;
use luhar_core::storage::Storage;
use luhar_runtime::Runtime;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {e}");
            AppConfig::default()
        }
    };
    let _log_guard = init_tracing(&config);

    let storage = match AppConfig::ensure_db_path().and_then(|path| Storage::open(&path)) {
        Ok(storage) => storage,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open database");
            eprintln!("Failed to open database: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut runtime = Runtime::from_parts(config, storage);

    match commands::run(cli, &mut runtime).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, plus a daily file under the data dir when enabled.
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(config: &AppConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("luhar=info"));

    let (file_layer, guard) = if config.logging.file {
        let appender = tracing_appender::rolling::daily(AppConfig::log_dir(), "luhar.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (
            Some(fmt::layer().with_ansi(false).with_writer(writer)),
            Some(guard),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}
