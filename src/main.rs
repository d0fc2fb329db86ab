use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use rollcall::core::config::{self, Config};
use rollcall::core::init_logger;
use rollcall::storage::{create_pool, migrations};
use rollcall::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot.
///
/// # Errors
/// Returns an error when startup fails (configuration, logging, database,
/// bot creation). Per-event failures never reach this level.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    // Required configuration is validated before anything else starts.
    let cfg = Config::from_env()?;

    // Initialize logger (console + file in the session directory)
    init_logger(&cfg.log_file_path())?;

    // Global panic handler: log panics from the dispatcher instead of
    // terminating silently; the supervision loop below restarts it.
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    log::info!(
        "Starting rollcall (api_id: {}, pool size: {}, {} admin(s))",
        cfg.api_id,
        cfg.pool_size,
        cfg.admin_ids.len()
    );

    // Create the database connection pool and bring the schema up to date
    // before any event is processed.
    let db_pool = Arc::new(
        create_pool(&cfg.database_path, cfg.pool_size, config::pool::acquire_timeout())
            .map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?,
    );
    {
        let mut conn = db_pool
            .get()
            .map_err(|e| anyhow::anyhow!("Failed to get connection for migrations: {}", e))?;
        migrations::run_migrations(&mut conn)?;
    }

    let bot = create_bot(&cfg)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let deps = HandlerDeps::new(Arc::clone(&db_pool), cfg.admin_ids.clone());
    let handler = schema(deps);

    log::info!("Starting bot in long polling mode");

    // Run the dispatcher with retry logic. The dispatcher runs in a separate
    // task so a panic is caught via the JoinHandle instead of taking the
    // process down.
    let mut retry_count = 0;
    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;

    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        let handle = tokio::spawn(async move {
            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(DependencyMap::new())
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) => {
                if join_err.is_panic() {
                    log::error!("Dispatcher panicked: {}", join_err);

                    if retry_count < max_retries {
                        retry_count += 1;
                        log::info!("Restarting dispatcher (attempt {}/{})...", retry_count, max_retries);
                        exponential_backoff(retry_count).await;
                    } else {
                        log::error!("Max retries reached after panic. Exiting...");
                        break;
                    }
                } else {
                    log::warn!("Dispatcher task was cancelled: {}", join_err);
                    break;
                }
            }
        }

        // Add a delay between retries to avoid overwhelming the API
        if retry_count > 0 {
            sleep(config::retry::dispatcher_delay()).await;
        }
    }

    Ok(())
}

/// Exponential backoff delay for dispatcher restarts.
async fn exponential_backoff(retry_count: u32) {
    let delay = Duration::from_secs(config::retry::EXPONENTIAL_BACKOFF_BASE.pow(retry_count));
    sleep(delay).await;
}
