//! gatrack-server - Google Analytics tracking id service
//!
//! Serves the tracking id stored in the settings database to anonymous
//! front-end clients at `GET /google_analytics/id`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gatrack_common::api::load_shared_secret;
use gatrack_common::config::{load_config_or_default, CliOverrides, ServiceConfig};
use gatrack_common::db::{init_database, SettingsStore};
use gatrack_server::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for gatrack-server
#[derive(Parser, Debug)]
#[command(name = "gatrack-server")]
#[command(about = "Publishes the Google Analytics tracking id")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "GATRACK_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "GATRACK_BIND")]
    bind: Option<String>,

    /// Root folder containing gatrack.db
    #[arg(short, long, env = "GATRACK_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, env = "GATRACK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gatrack_server=info,gatrack_common=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any database delays
    info!(
        "Starting gatrack-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let toml = load_config_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    let config = ServiceConfig::resolve(
        CliOverrides {
            root_folder: args.root_folder,
            port: args.port,
            bind_address: args.bind,
        },
        toml,
    );

    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize settings database")?;

    let settings = SettingsStore::new(pool);

    let shared_secret = match load_shared_secret(&settings).await {
        Ok(0) => {
            warn!("API authentication disabled (shared_secret = 0)");
            0
        }
        Ok(secret) => {
            info!("✓ Loaded shared secret for API authentication");
            secret
        }
        Err(e) => return Err(e).context("Failed to load shared secret"),
    };

    let state = AppState::new(settings, shared_secret);
    let app = build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("gatrack-server listening on http://{}", addr);
    info!("Tracking id: http://{}/google_analytics/id", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
