//! Telegram integration: event model, middleware chain, routing, handlers.

pub mod bot;
pub mod event;
pub mod handlers;
pub mod menu;
pub mod middleware;
pub mod notifications;
pub mod router;

#[cfg(test)]
pub(crate) mod fixtures;

/// The concrete bot type used throughout the crate.
pub type Bot = teloxide::Bot;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use event::{Event, Origin};
pub use handlers::{build_router, schema, HandlerDeps, HandlerError};
pub use middleware::{compose, endpoint, EventHandler};
pub use router::{MatchSpec, Router};
