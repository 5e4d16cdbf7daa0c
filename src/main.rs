use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;

use shopdesk::core::{config, init_logger, log_startup_configuration};
use shopdesk::notify::Notifier;
use shopdesk::storage::create_pool;
use shopdesk::web::{run_server, AppState, WebConfig};

/// Main entry point for the storefront service
///
/// # Errors
/// Returns an error if initialization fails (logging, database, HTTP clients)
/// or the server cannot bind its port.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present (before any config is read)
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;
    log_startup_configuration();

    let pool = create_pool(&config::DATABASE_PATH)?;
    log::info!("Database ready at {}", config::DATABASE_PATH.as_str());

    let state = AppState {
        pool: Arc::new(pool),
        notifier: Notifier::from_config()?,
        config: WebConfig::from_env(),
    };

    run_server(*config::WEB_PORT, state).await
}
