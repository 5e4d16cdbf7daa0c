use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::sync::Arc;
use std::time::Duration;

use crate::core::error::{AppError, AppResult};
use crate::storage::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Initializes a connection pool with up to 10 connections and runs schema migrations.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Returns
///
/// Returns a `DbPool` on success, or an error if the pool cannot be built
/// or the schema cannot be migrated.
///
/// # Example
///
/// ```no_run
/// use shopdesk::storage::db;
///
/// let pool = db::create_pool("shopdesk.sqlite")?;
/// # Ok::<(), shopdesk::core::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager =
        SqliteConnectionManager::file(database_path).with_init(|c| c.busy_timeout(Duration::from_secs(5)));
    let pool = Pool::builder()
        .max_size(10) // Maximum 10 connections in the pool
        .build(manager)?;

    let mut conn = pool.get()?;
    migrations::run_migrations(&mut conn).map_err(AppError::Anyhow)?;

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Runs `f` on the blocking thread pool with its own pooled connection.
///
/// Handlers are async while rusqlite is not; every query from a handler goes
/// through here.
pub async fn with_connection<T, F>(pool: &Arc<DbPool>, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> AppResult<T> + Send + 'static,
{
    let pool = Arc::clone(pool);
    tokio::task::spawn_blocking(move || {
        let mut conn = get_connection(&pool)?;
        f(&mut *conn)
    })
    .await?
}

/// Current time as epoch milliseconds, the unit used by every timestamp column.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
