//! La Finquina server binary.
//!
//! Loads `.env`, initialises tracing, bootstraps the database (falling
//! back to offline mode), opens the blob store, assembles the farm and
//! serves the API.
//!
//! # Environment
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `FINQUINA_HOST` / `FINQUINA_PORT` | `0.0.0.0` / `3000` | Bind address |
//! | `FINQUINA_UPLOAD_DIR` | `uploads` | Blob store directory |
//! | `FINQUINA_PUBLIC_URL` | `/uploads` | URL prefix of stored blobs |
//! | `FINQUINA_CONFIG` | none | Farm settings YAML |
//! | `FINQUINA_LOG_JSON` | `false` | JSON log lines |
//! | `RUST_LOG` | `info` | Log filter |

use std::sync::Arc;

use anyhow::Context;
use finquina_core::{Farm, FarmConfig};
use finquina_db::{Database, DatabaseSettings};
use finquina_integrations::{DEFAULT_PUBLIC_BASE, LocalBlobStore};
use finquina_server::{AppState, ServerConfig, start_server};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_JSON_VAR: &str = "FINQUINA_LOG_JSON";
const UPLOAD_DIR_VAR: &str = "FINQUINA_UPLOAD_DIR";
const PUBLIC_URL_VAR: &str = "FINQUINA_PUBLIC_URL";
const DEFAULT_UPLOAD_DIR: &str = "uploads";

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if env_flag(LOG_JSON_VAR) {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

async fn open_database() -> Database {
    match DatabaseSettings::from_env() {
        Ok(settings) => Database::bootstrap(&settings).await,
        Err(e) => {
            error!(error = %e, "Database not configured, running in offline mode");
            Database::offline(e.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    info!("La Finquina starting");

    let config = FarmConfig::from_env().context("failed to load farm settings")?;
    let server = ServerConfig::from_env()?;
    let db = open_database().await;

    let upload_dir = env_or(UPLOAD_DIR_VAR, DEFAULT_UPLOAD_DIR);
    let public_url = env_or(PUBLIC_URL_VAR, DEFAULT_PUBLIC_BASE);
    let blobs = LocalBlobStore::open(&upload_dir, &public_url)
        .await
        .with_context(|| format!("failed to open blob store at {upload_dir}"))?;

    let farm = Farm::from_lookup(db, config, blobs, |name| std::env::var(name).ok())
        .context("failed to assemble the farm")?;
    info!(
        farm = %farm.config().farm.name,
        database_online = farm.db().is_online(),
        ai_configured = farm.ai_configured(),
        "Farm ready"
    );

    let state = Arc::new(AppState::new(Arc::new(farm)));
    let invalidation = state.spawn_cache_invalidation();

    let result = start_server(&server, state).await;
    invalidation.abort();
    result?;
    Ok(())
}
