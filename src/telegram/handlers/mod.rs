//! Event handlers and the dispatcher schema.

pub mod callbacks;
pub mod commands;
pub mod schema;
pub mod types;

pub use schema::{build_router, schema};
pub use types::{HandlerDeps, HandlerError};
