//! Shopdesk - storefront backend for shopper profiles and admin notifications
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors and logging
//! - `storage`: SQLite pool, migrations and query helpers
//! - `profile`: Shopper profile aggregation
//! - `notify`: Notification settings, Telegram and email delivery
//! - `web`: axum routes, session verification and HTML rendering

pub mod core;
pub mod i18n;
pub mod notify;
pub mod profile;
pub mod storage;
pub mod web;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use notify::{NotificationSettings, Notifier, OrderEvent, TestOutcome};
pub use profile::{load_profile, ProfileView};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
pub use web::{create_router, run_server, AppState, WebConfig};
