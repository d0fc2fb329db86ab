//! Rollcall - Telegram bot that registers users and reports membership stats
//!
//! This library provides the full bot runtime: configuration loading, the
//! pooled SQLite store, and the per-event middleware chain (connection
//! scoping + error isolation) that wraps every handler.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, and logging
//! - `storage`: Connection pool, migrations, and user queries
//! - `telegram`: Event model, middleware, routing, and handlers

pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, BotError, Config};
pub use crate::storage::{create_pool, get_connection, DbConnection, DbPool};
pub use crate::telegram::{build_router, schema, Event, HandlerDeps, Router};
