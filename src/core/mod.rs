//! Core utilities: configuration, error types, logging.

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{Config, ConfigError};
pub use error::{BotError, HandlerResult};
pub use logging::init_logger;
