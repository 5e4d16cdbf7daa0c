//! Database pool, migrations and query helpers

pub mod db;
pub mod migrations;
pub mod orders;
pub mod settings;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool};
