//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A configuration summary logged once at startup (secrets are never printed)

use anyhow::Result;
use secrecy::ExposeSecret;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("DATABASE_PATH: {}", config::DATABASE_PATH.as_str());
    log::info!("WEB_PORT: {}", *config::WEB_PORT);
    log::info!("RESEND_API_URL: {}", config::providers::RESEND_API_URL.as_str());

    if let Some(url) = config::providers::TELEGRAM_API_URL.as_deref() {
        log::info!("TELEGRAM_API_URL: {}", url);
    }

    if config::session::SESSION_SECRET.expose_secret().is_empty() {
        log::error!("SESSION_SECRET is not set - every request will be treated as signed out");
    } else {
        log::info!("SESSION_SECRET: configured");
    }

    if config::admin::ADMIN_USERS.is_empty() {
        log::warn!("ADMIN_USERS is empty - admin pages are unreachable");
    } else {
        log::info!("ADMIN_USERS: {} configured", config::admin::ADMIN_USERS.len());
    }
}
