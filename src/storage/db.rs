//! Connection pool construction and queries against the `users` table.
//!
//! The pool is constructed once at startup and passed around explicitly
//! (`Arc<DbPool>`); nothing here keeps global state. A `DbConnection` is a
//! lease: it returns to the pool when dropped, on every exit path.

use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Result;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// A registered user row.
#[derive(Debug, Clone)]
pub struct User {
    /// Telegram user id, primary key.
    pub id: i64,
    /// Telegram username, refreshed on every /start.
    pub username: Option<String>,
    /// Set once at first insert, never updated.
    pub created_at: String,
}

/// Create a new database connection pool.
///
/// Acquisition waits at most `acquire_timeout` before failing, so an
/// exhausted pool surfaces an error instead of blocking an event forever.
///
/// # Arguments
///
/// * `database_path` - Path to the SQLite database file
/// * `max_size` - Upper bound on pooled connections
/// * `acquire_timeout` - Bounded wait for a free connection
pub fn create_pool(database_path: &str, max_size: u32, acquire_timeout: Duration) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    Pool::builder()
        .max_size(max_size)
        .connection_timeout(acquire_timeout)
        .build(manager)
}

/// Get a connection from the pool.
///
/// The connection is automatically returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Insert a user or refresh their username.
///
/// `created_at` is set by the insert default and never overwritten on
/// conflict, so re-registration keeps the original timestamp.
pub fn upsert_user(conn: &DbConnection, id: i64, username: Option<&str>) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, username) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET username = excluded.username",
        &[&id as &dyn rusqlite::ToSql, &username as &dyn rusqlite::ToSql],
    )?;
    Ok(())
}

/// Fetch a user by id.
///
/// # Returns
///
/// `Ok(Some(User))` when the user exists, `Ok(None)` otherwise.
pub fn get_user(conn: &DbConnection, id: i64) -> Result<Option<User>> {
    let mut stmt = conn.prepare("SELECT id, username, created_at FROM users WHERE id = ?")?;
    let mut rows = stmt.query(&[&id as &dyn rusqlite::ToSql])?;

    if let Some(row) = rows.next()? {
        Ok(Some(User {
            id: row.get(0)?,
            username: row.get(1)?,
            created_at: row.get(2)?,
        }))
    } else {
        Ok(None)
    }
}

/// Count all registered users. Zero rows is a normal result.
pub fn count_users(conn: &DbConnection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}
