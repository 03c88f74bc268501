//! Replay - Main Entry Point
//!
//! Loads a fixture directory, replays every fixture against the service at
//! `--base-url` and exits non-zero if any fixture failed.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use replay_application::tokens::{EnvHandler, TimestampHandler, UuidHandler};
use replay_application::{ImageCompareConfig, RunOptions, RunSuite, TokenHandlers};
use replay_infrastructure::{GraphicsMagickDiff, ReqwestExchange, SystemClock, TokioFileSystem};

use crate::cli::Cli;

fn builtin_handlers() -> TokenHandlers {
    TokenHandlers::new()
        .with("env", EnvHandler)
        .with("uuid", UuidHandler)
        .with("timestamp", TimestampHandler::new(Arc::new(SystemClock::new())))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut images = ImageCompareConfig::default();
    if let Some(dir) = cli.staging_dir {
        images.staging_dir = dir;
    }
    if let Some(tolerance) = cli.tolerance {
        images.tolerance = tolerance;
    }

    if cli.update {
        tracing::warn!("update mode is on; mismatching fixtures will be rewritten");
    }

    let exchange = Arc::new(
        ReqwestExchange::new(cli.base_url.clone()).context("failed to create HTTP client")?,
    );
    let suite = RunSuite::new(
        exchange,
        Arc::new(TokioFileSystem::new()),
        Arc::new(GraphicsMagickDiff::new(cli.gm_binary)),
        images,
    );
    let options = RunOptions::new()
        .with_update_fixtures(cli.update)
        .with_handlers(builtin_handlers());

    tracing::info!(
        base_url = %cli.base_url,
        fixtures = %cli.fixtures.display(),
        "Starting replay v{}",
        env!("CARGO_PKG_VERSION")
    );

    let report = suite
        .run(&cli.fixtures, &options)
        .await
        .with_context(|| format!("failed to run fixtures in {}", cli.fixtures.display()))?;

    for (name, message) in &report.failed {
        tracing::error!("FAILED {name}: {message}");
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
