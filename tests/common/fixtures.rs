//! Test fixtures for integration tests
//!
//! Provides TestEnvironment that sets up:
//! - A migrated SQLite database in a temporary directory
//! - Seed helpers for orders and loyalty points
//! - Routers and signed sessions for HTTP tests

#![allow(dead_code)]

use axum::Router;
use secrecy::SecretString;
use std::sync::Arc;
use tempfile::TempDir;

use shopdesk::notify::Notifier;
use shopdesk::storage::db::{self, DbConnection, DbPool};
use shopdesk::storage::orders::{self, NewOrder, OrderStatus};
use shopdesk::web::auth::{sign_session, SessionUser};
use shopdesk::web::{create_router, AppState, WebConfig};

pub const SESSION_SECRET: &str = "integration-test-secret";
pub const ADMIN_USERNAME: &str = "shopadmin";

/// Isolated database plus helpers to seed it.
pub struct TestEnvironment {
    // Keeps the database directory alive for the test's duration
    _dir: TempDir,
    pub pool: Arc<DbPool>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("shopdesk-test.sqlite");
        let pool = db::create_pool(path.to_str().expect("temp path is not UTF-8")).expect("Failed to create pool");

        Self {
            _dir: dir,
            pool: Arc::new(pool),
        }
    }

    pub fn conn(&self) -> DbConnection {
        db::get_connection(&self.pool).expect("Failed to get connection")
    }

    pub fn insert_order(&self, order_id: &str, user_id: &str, status: OrderStatus, created_at: i64) {
        let order = NewOrder {
            order_id: order_id.to_string(),
            user_id: user_id.to_string(),
            product_name: format!("Product for {}", order_id),
            amount: "10.00".to_string(),
            status,
            email: None,
            created_at,
        };
        orders::insert_order(&self.conn(), &order).expect("Failed to insert order");
    }

    pub fn set_points(&self, user_id: &str, points: i64) {
        orders::upsert_user_points(&self.conn(), user_id, None, points).expect("Failed to set points");
    }

    pub fn app_state(&self, notifier: Notifier) -> AppState {
        AppState {
            pool: Arc::clone(&self.pool),
            notifier,
            config: WebConfig {
                session_secret: SecretString::from(SESSION_SECRET.to_string()),
                admin_users: vec![ADMIN_USERNAME.to_string()],
            },
        }
    }

    pub fn router(&self, notifier: Notifier) -> Router {
        create_router(self.app_state(notifier))
    }
}

/// Session token signed with the test secret, valid for an hour.
pub fn session_token(user_id: &str, username: Option<&str>) -> String {
    let user = SessionUser {
        id: user_id.to_string(),
        name: None,
        username: username.map(str::to_string),
        avatar_url: None,
    };
    let secret = SecretString::from(SESSION_SECRET.to_string());
    sign_session(&user, &secret, chrono::Utc::now().timestamp(), 3600).expect("Failed to sign session")
}

pub fn admin_token() -> String {
    session_token("admin-1", Some(ADMIN_USERNAME))
}

pub fn shopper_token() -> String {
    session_token("user-1", Some("shopper"))
}
