use thiserror::Error;

/// Centralized error type for per-event processing.
///
/// Every failure raised while handling one inbound event converges here so
/// the isolation layer can log a stable failure kind. Uses `thiserror` for
/// automatic conversion and display formatting.
#[derive(Error, Debug)]
pub enum BotError {
    /// Pool exhausted or store unreachable at acquisition time.
    #[error("database unavailable: {0}")]
    Pool(#[from] r2d2::Error),

    /// Statement preparation or execution failure.
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// Outbound Telegram API failure raised by handler code.
    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Any other failure raised by handler logic.
    #[error("{0}")]
    Handler(String),
}

impl BotError {
    /// Stable failure-kind tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::Pool(_) => "database_unavailable",
            BotError::Query(_) => "query",
            BotError::Telegram(_) => "telegram",
            BotError::Handler(_) => "handler",
        }
    }
}

impl From<String> for BotError {
    fn from(err: String) -> Self {
        BotError::Handler(err)
    }
}

impl From<&str> for BotError {
    fn from(err: &str) -> Self {
        BotError::Handler(err.to_string())
    }
}

/// Outcome of one business handler invocation.
pub type HandlerResult = Result<(), BotError>;
