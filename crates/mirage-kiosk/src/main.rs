use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use mirage_application::KioskController;
use mirage_infrastructure::{ConfigService, MiragePaths};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod console;
mod render;

#[derive(Parser, Debug)]
#[command(name = "mirage-kiosk")]
#[command(about = "MIRAGE photo booth kiosk with an operator console", long_about = None)]
struct Cli {
    /// Path to config.toml (created with defaults when missing)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the gallery, usage counter, exports and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Seconds of inactivity before returning to the attract screen
    #[arg(long)]
    idle_timeout: Option<u64>,

    /// Keep config and data under this directory instead of the platform ones
    #[arg(long)]
    base_dir: Option<PathBuf>,
}

/// Logs go to a daily file; the terminal belongs to the console.
fn init_logging(paths: &MiragePaths, level: &str) -> Result<WorkerGuard> {
    let logs_dir = paths.logs_dir()?;
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&logs_dir, "mirage-kiosk.log"));
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{level}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = MiragePaths::new(cli.base_dir.as_deref());
    let config_service = ConfigService::resolve(cli.config.as_deref(), &paths)?;
    let mut config = config_service.load_or_create()?;
    if let Some(secs) = cli.idle_timeout {
        config.idle_timeout_secs = secs;
    }
    let paths = paths.with_data_dir(cli.data_dir.or_else(|| config.storage.data_dir.clone()));

    let _log_guard = init_logging(&paths, &config.log_level)?;
    tracing::info!(config = %config_service.path().display(), "Starting MIRAGE kiosk");

    let kiosk = bootstrap::build(&paths, &config).await?;
    if kiosk.secret_template_created {
        println!(
            "{}",
            format!(
                "Created {}; add the generation and upload keys there.",
                kiosk.secret_path.display()
            )
            .yellow()
        );
    }

    let (controller, handle) = KioskController::new(kiosk.services, kiosk.settings);
    let controller_task = tokio::spawn(controller.run());
    let renderer = tokio::spawn(render::follow(handle.subscribe(), handle.shutdown_token()));

    let console_handle = handle.clone();
    let console_result = tokio::task::spawn_blocking(move || console::run(console_handle)).await;

    handle.shutdown();
    let _ = renderer.await;
    controller_task.await.context("Kiosk controller panicked")?;
    console_result.context("Console thread panicked")??;

    tracing::info!("MIRAGE kiosk stopped");
    Ok(())
}
