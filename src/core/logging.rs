//! Logger initialization (console + file).

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use simplelog::{ColorChoice, CombinedLogger, LevelFilter, TermLogger, TerminalMode, WriteLogger};

/// Initialize logger for both console and file output.
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Errors
/// Fails when the log file cannot be created or a logger is already set.
pub fn init_logger(log_file_path: &Path) -> Result<()> {
    let log_file =
        File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            simplelog::Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, simplelog::Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}
