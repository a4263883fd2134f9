//! Keygate license server.
//!
//! Serves the desktop application's activation endpoints over HTTP,
//! backed by a SQLite license store:
//!
//!   keygate-server --port 5000 --database licenses.db
//!
//! Admin routes (create_license, delete_license) require a shared key,
//! taken from `--admin-key` or the `KEYGATE_ADMIN_KEY` environment
//! variable; with no key configured they refuse every caller.

use anyhow::{Context, Result};
use clap::Parser;
use keygate_engine::{LicenseEngine, SharedKeyAdmin};
use keygate_server::build_router;
use keygate_store::{SqliteStore, TransactionalStore};
use keygate_types::SystemClock;
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "keygate-server")]
#[command(about = "License entitlement server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Path to the license database
    #[arg(short, long, default_value = "licenses.db")]
    database: PathBuf,

    /// Shared key for the admin routes
    #[arg(long)]
    admin_key: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Keygate license server starting...");

    let store = SqliteStore::open(&args.database)
        .with_context(|| format!("failed to open license database {}", args.database.display()))?;
    let store = Arc::new(TransactionalStore::new(Arc::new(store)));

    let admin_key = args
        .admin_key
        .or_else(|| std::env::var("KEYGATE_ADMIN_KEY").ok())
        .unwrap_or_default();
    if admin_key.is_empty() {
        warn!("no admin key configured; create/delete routes will refuse every caller");
    }

    let engine = Arc::new(LicenseEngine::new(
        store,
        Arc::new(SystemClock),
        Arc::new(SharedKeyAdmin::new(admin_key)),
    ));

    let app = build_router(engine);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("failed to bind port {}", args.port))?;

    println!("\n========================================");
    println!("  Keygate License Server Running");
    println!("========================================");
    println!("  Port:     {}", args.port);
    println!("  Database: {}", args.database.display());
    println!("========================================\n");

    info!("listening on port {}", args.port);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
