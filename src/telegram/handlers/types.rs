//! Handler types and dependencies.

use std::sync::Arc;

use crate::storage::db::DbPool;

/// Error type for dptree endpoints.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers.
///
/// Constructed once at startup and cloned into the dispatcher; the pool is
/// the only shared mutable resource.
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<DbPool>,
    pub admin_ids: Vec<i64>,
}

impl HandlerDeps {
    /// Create new handler dependencies.
    pub fn new(db_pool: Arc<DbPool>, admin_ids: Vec<i64>) -> Self {
        Self { db_pool, admin_ids }
    }
}
