//! gobank - Ledger bootstrap
//!
//! Loads configuration, installs logging, connects to PostgreSQL and makes
//! sure the ledger schema exists. The HTTP layer embeds the library and
//! reuses the same steps.

use anyhow::{Context, Result};

use gobank::account::{AccountStorage, PgAccountStore};
use gobank::config::AppConfig;
use gobank::db::Database;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = gobank::logging::init_logging(&app_config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        "Starting gobank ledger in {} mode",
        env
    );

    let db = Database::connect(&app_config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    db.init_schema()
        .await
        .context("Failed to initialize schema")?;
    db.health_check().await.context("Health check failed")?;

    let mut store = PgAccountStore::new(db.pool().clone());
    if let Some(timeout) = app_config.database.lock_timeout() {
        store = store.with_lock_timeout(timeout);
    }

    let accounts = store
        .list_all()
        .await
        .context("Failed to list accounts")?;
    tracing::info!(accounts = accounts.len(), "Ledger ready");

    Ok(())
}
