// Fluxboard - terminal dashboard for project/CRM administration
//
// Two modes share one binary:
// - Dashboard TUI (default): login, fetch the aggregate + activity logs,
//   render board/report/logs views, enforce inactivity logout.
// - `report` subcommand: one-shot pull from the workspace database service,
//   rendered to a static HTML file.
//
// Architecture:
// - api: HTTP client with a typed failure taxonomy
// - session: persisted bearer token (the "am I logged in" bit)
// - idle: inactivity state machine polled from the TUI tick
// - grouping: pure snapshot-to-presentation derivation
// - tui: root controller, event loop, views
// - report: workspace client, joins, HTML assembly

mod api;
mod cli;
mod config;
mod events;
mod grouping;
mod idle;
mod logging;
mod models;
mod report;
mod session;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, LogRotation};
use logging::{CaptureLayer, ClientLogBuffer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Config::ensure_config_exists();
    let config = Config::load();

    // Precedence: RUST_LOG env var > config file level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("fluxboard={}", config.logging.level).into());

    match cli.command {
        Some(Commands::Config { show, path, reset }) => {
            cli::handle_config(show, path, reset);
            Ok(())
        }

        Some(Commands::Report { output }) => {
            // Batch mode: plain stdout logging is fine, there is no TUI to
            // garble
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            report::run(&config, output).await
        }

        None => {
            let log_buffer = ClientLogBuffer::new();
            init_tui_logging(&config, filter, log_buffer.clone());
            tracing::info!("fluxboard {} starting", config::VERSION);
            tui::run(config, log_buffer).await
        }
    }
}

/// TUI mode logging: capture to the in-memory buffer (shown in the Logs
/// view), plus optional JSON file logging with rotation.
///
/// The appender guard is deliberately leaked: it must live until exit so
/// buffered log writes flush, and exit is the only thing that ends TUI mode.
fn init_tui_logging(config: &Config, filter: EnvFilter, buffer: ClientLogBuffer) {
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(CaptureLayer::new(buffer));

    if config.logging.file_enabled {
        if let Err(e) = std::fs::create_dir_all(&config.logging.file_dir) {
            eprintln!(
                "Warning: could not create log directory {:?}: {}",
                config.logging.file_dir, e
            );
            registry.init();
            return;
        }

        let appender = match config.logging.file_rotation {
            LogRotation::Hourly => tracing_appender::rolling::hourly(
                &config.logging.file_dir,
                &config.logging.file_prefix,
            ),
            LogRotation::Daily => tracing_appender::rolling::daily(
                &config.logging.file_dir,
                &config.logging.file_prefix,
            ),
            LogRotation::Never => tracing_appender::rolling::never(
                &config.logging.file_dir,
                &config.logging.file_prefix,
            ),
        };
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        Box::leak(Box::new(guard));

        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .init();
    } else {
        registry.init();
    }
}
