//! # Tillslip Issuer
//!
//! Command line front end for the receipt engine.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          tillslip <command>                             │
//! │                                                                         │
//! │  1. Initialize Logging ─── tracing-subscriber to stderr, RUST_LOG       │
//! │  2. Resolve Config ─────── defaults ◄ TILLSLIP_* ◄ flags                │
//! │  3. Open Catalog ───────── <data dir>/tillslip.db, migrations applied   │
//! │  4. Wire Engine ────────── GenerationCoordinator::from_database         │
//! │  5. Run Subcommand ─────── issue · list · document · seed               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exit status is non-zero when the command did not succeed, including a
//! receipt issue that returned a failure outcome.

mod cli;
mod commands;
mod seed;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tillslip_db::{Database, DbConfig};
use tillslip_engine::{EngineConfig, GenerationCoordinator};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.engine.apply(EngineConfig::from_env())?;

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data directory {}", config.data_dir.display())
    })?;

    info!(
        data_dir = %config.data_dir.display(),
        store = %config.store,
        gst_bps = config.tax.rate.bps(),
        threshold = %config.tax.tax_invoice_threshold,
        "Starting tillslip"
    );

    let db = Database::new(DbConfig::new(config.database_path()))
        .await
        .context("failed to open catalog database")?;
    let engine = GenerationCoordinator::from_database(&config, &db);

    let succeeded = match &cli.command {
        Command::Issue { request } => commands::issue(&engine, request).await,
        Command::List { json } => commands::list(&engine, *json).await,
        Command::Document { id, out } => commands::document(&engine, id, out.as_deref()).await,
        Command::Seed => commands::seed_catalog(&db).await,
    };

    db.close().await;

    Ok(if succeeded? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Initializes the tracing subscriber on stderr, keeping stdout for output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tillslip=trace` - Show trace for tillslip crates only
/// - Default: `info,tillslip=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tillslip=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
