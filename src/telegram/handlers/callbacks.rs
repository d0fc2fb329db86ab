//! Callback handler implementations (stats button).

use teloxide::prelude::*;

use crate::core::error::{BotError, HandlerResult};
use crate::storage::db::{self, DbConnection};
use crate::telegram::event::Event;
use crate::telegram::Bot;

/// Handle the stats button: count registered users and answer the callback.
pub async fn handle_stats(bot: Bot, event: Event, conn: DbConnection) -> HandlerResult {
    let query = match &event {
        Event::Callback(query) => query,
        Event::Command(_) => {
            return Err(BotError::Handler("stats requires a callback interaction".to_string()));
        }
    };

    let count = db::count_users(&conn)?;

    bot.answer_callback_query(query.id.clone())
        .text(format!("Total users: {}", count))
        .await?;

    Ok(())
}
