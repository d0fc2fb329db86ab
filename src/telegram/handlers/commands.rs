//! Command handler implementations (/start).

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::core::error::{BotError, HandlerResult};
use crate::storage::db::{self, DbConnection};
use crate::telegram::event::Event;
use crate::telegram::menu;
use crate::telegram::Bot;

/// Handle /start: register (or refresh) the sender, then greet them.
///
/// The upsert and the greeting are independent steps with no transaction
/// spanning them; a failed greeting leaves the registration in place.
pub async fn handle_start(bot: Bot, event: Event, conn: DbConnection) -> HandlerResult {
    let origin = event
        .origin()
        .ok_or_else(|| BotError::Handler("start command without a sender".to_string()))?;
    let chat_id = origin
        .chat_id
        .ok_or_else(|| BotError::Handler("start command without a chat".to_string()))?;

    db::upsert_user(&conn, origin.user_id, origin.username.as_deref())?;

    let created_at = db::get_user(&conn, origin.user_id)?
        .map(|user| user.created_at)
        .unwrap_or_default();

    let name = origin.first_name.as_deref().unwrap_or("there");

    bot.send_message(chat_id, menu::welcome_text(name, &created_at))
        .parse_mode(ParseMode::Markdown)
        .reply_markup(menu::main_menu())
        .await?;

    Ok(())
}
