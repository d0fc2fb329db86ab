//! Best-effort administrator notifications.

use teloxide::prelude::*;

use crate::core::error::BotError;
use crate::telegram::event::Event;
use crate::telegram::Bot;

/// Notifies every configured administrator that an event handler failed.
///
/// Delivery failures are logged and otherwise ignored; admin broadcasting
/// must never affect the outcome of the event that triggered it.
pub async fn notify_admins_handler_error(bot: &Bot, admin_ids: &[i64], event: &Event, err: &BotError) {
    let text = format!(
        "⚠️ Handler error\n\nEvent: {}\nKind: {}\nError: {}",
        event.describe(),
        err.kind(),
        err
    );

    for admin_id in admin_ids {
        if let Err(e) = bot.send_message(ChatId(*admin_id), text.clone()).await {
            log::warn!("Failed to notify admin {} about handler error: {}", admin_id, e);
        }
    }
}
