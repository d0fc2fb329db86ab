//! Environment-backed configuration, validated once at startup.
//!
//! Every required value is read and checked by [`Config::from_env`] before
//! anything else starts; a missing or malformed value aborts the process
//! with a [`ConfigError`] instead of limping along half-configured.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Startup configuration errors. Always fatal; never raised after startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration value: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("failed to create session directory {path}: {source}")]
    SessionDir { path: String, source: std::io::Error },
}

/// Required startup configuration.
///
/// Loaded from the environment (`.env` supported via dotenvy in `main`).
#[derive(Debug)]
pub struct Config {
    /// Numeric platform API identifier.
    pub api_id: i32,
    /// Secret API hash paired with `api_id`.
    pub api_hash: SecretString,
    /// Bot token for the Telegram client.
    pub bot_token: SecretString,
    /// SQLite database path.
    pub database_path: String,
    /// Upper bound on pooled database connections.
    pub pool_size: u32,
    /// Administrator chat ids that receive error broadcasts.
    pub admin_ids: Vec<i64>,
    /// Directory holding session state and the log file.
    pub session_dir: PathBuf,
}

impl Config {
    /// Loads and validates configuration from the environment.
    ///
    /// # Errors
    /// Returns the first missing or malformed required value. The session
    /// directory is created here so a bad path also fails before startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_id = parse::<i32>("API_ID")?;
        let api_hash = SecretString::from(required("API_HASH")?);
        let bot_token = SecretString::from(required("BOT_TOKEN")?);
        let database_path = required("DATABASE_PATH")?;

        let pool_size = parse::<u32>("POOL_SIZE")?;
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "POOL_SIZE",
                reason: "must be greater than zero".to_string(),
            });
        }

        let admin_ids = parse_admin_ids(&required("ADMIN_IDS")?)?;

        let session_dir = PathBuf::from(required("SESSION_DIR")?);
        std::fs::create_dir_all(&session_dir).map_err(|source| ConfigError::SessionDir {
            path: session_dir.display().to_string(),
            source,
        })?;

        Ok(Self {
            api_id,
            api_hash,
            bot_token,
            database_path,
            pool_size,
            admin_ids,
            session_dir,
        })
    }

    /// Log file location inside the session directory.
    ///
    /// The file name can be overridden with the optional `LOG_FILE` variable.
    pub fn log_file_path(&self) -> PathBuf {
        let name = env::var("LOG_FILE").unwrap_or_else(|_| "rollcall.log".to_string());
        self.session_dir.join(name)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse<T: FromStr>(name: &'static str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    required(name)?.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>().map_err(|e| ConfigError::Invalid {
                name: "ADMIN_IDS",
                reason: format!("{:?} is not a valid chat id: {}", part, e),
            })
        })
        .collect()
}

/// Connection pool tuning.
pub mod pool {
    use std::time::Duration;

    /// Bounded wait for a pooled connection before acquisition fails.
    pub const ACQUIRE_TIMEOUT_SECS: u64 = 5;

    /// Acquisition timeout duration.
    pub fn acquire_timeout() -> Duration {
        Duration::from_secs(ACQUIRE_TIMEOUT_SECS)
    }
}

/// Network configuration.
pub mod network {
    use std::time::Duration;

    /// Request timeout for Bot API calls (in seconds).
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration.
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Retry configuration.
pub mod retry {
    use std::time::Duration;

    /// Maximum number of retries for dispatcher reconnection.
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Delay between dispatcher retry attempts (in seconds).
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Dispatcher retry delay duration.
    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }

    /// Base for exponential backoff calculation.
    pub const EXPONENTIAL_BACKOFF_BASE: u64 = 2;
}
