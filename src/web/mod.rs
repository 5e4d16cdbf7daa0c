//! HTTP surface: profile pages, admin notification settings and their JSON API.

pub mod admin;
pub mod auth;
pub mod error;
pub mod profile;
pub mod render;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use secrecy::SecretString;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::config;
use crate::notify::Notifier;
use crate::storage::db::DbPool;

pub use auth::SessionUser;
pub use error::WebError;

/// Request-independent settings the handlers need.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub session_secret: SecretString,
    /// Lowercase usernames without a leading `@`.
    pub admin_users: Vec<String>,
}

impl WebConfig {
    pub fn from_env() -> Self {
        Self {
            session_secret: config::session::SESSION_SECRET.clone(),
            admin_users: config::admin::ADMIN_USERS.clone(),
        }
    }

    pub fn is_admin(&self, user: &SessionUser) -> bool {
        user.username
            .as_deref()
            .map(|name| name.trim().trim_start_matches('@').to_lowercase())
            .is_some_and(|name| !name.is_empty() && self.admin_users.contains(&name))
    }
}

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub notifier: Notifier,
    pub config: WebConfig,
}

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/profile", get(profile::profile_page))
        .route("/api/profile", get(profile::profile_api))
        .route(
            "/admin/notifications",
            get(admin::settings_page).post(admin::save_settings_form),
        )
        .route("/admin/notifications/test-telegram", post(admin::test_telegram_form))
        .route("/admin/notifications/test-email", post(admin::test_email_form))
        .route(
            "/api/admin/notifications",
            get(admin::get_settings_api).put(admin::put_settings_api),
        )
        .route("/api/admin/notifications/test-telegram", post(admin::test_telegram_api))
        .route("/api/admin/notifications/test-email", post(admin::test_email_api))
        .with_state(Arc::new(state))
}

/// Binds `0.0.0.0:port` and serves until the process stops.
pub async fn run_server(port: u16, state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = create_router(state);

    log::info!("Starting web server on http://{}", addr);
    log::info!("  /profile                  - Shopper profile (HTML)");
    log::info!("  /api/profile              - Shopper profile (JSON)");
    log::info!("  /admin/notifications      - Notification settings (HTML)");
    log::info!("  /api/admin/notifications  - Notification settings (JSON)");
    log::info!("  /health                   - Health check");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
