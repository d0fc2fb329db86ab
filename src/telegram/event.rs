//! Inbound event model.
//!
//! An [`Event`] is one unit of work, either a slash-command message or an
//! inline-keyboard callback, and exists only for the duration of dispatch.
//! It carries the origin identity used for replies and for error
//! notifications.

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};

use crate::telegram::Bot;

/// The user/conversation an event came from.
#[derive(Debug, Clone)]
pub struct Origin {
    /// Chat to reply into. Absent for callbacks on inaccessible messages.
    pub chat_id: Option<ChatId>,
    /// Telegram user id of the sender.
    pub user_id: i64,
    pub first_name: Option<String>,
    pub username: Option<String>,
}

/// One inbound unit of work requiring a response.
#[derive(Debug, Clone)]
pub enum Event {
    /// A slash-command message.
    Command(Message),
    /// An inline-keyboard button press.
    Callback(CallbackQuery),
}

impl Event {
    /// Normalized command token: leading slash stripped, `@botname` suffix
    /// stripped, arguments ignored. `None` for callbacks.
    pub fn command(&self) -> Option<&str> {
        match self {
            Event::Command(msg) => {
                let token = msg.text()?.split_whitespace().next()?;
                let token = token.strip_prefix('/')?;
                Some(token.split('@').next().unwrap_or(token))
            }
            Event::Callback(_) => None,
        }
    }

    /// Callback datum carried by a button press. `None` for commands.
    pub fn callback_data(&self) -> Option<&str> {
        match self {
            Event::Callback(query) => query.data.as_deref(),
            Event::Command(_) => None,
        }
    }

    /// Identity of the sender, when the platform supplied one.
    pub fn origin(&self) -> Option<Origin> {
        match self {
            Event::Command(msg) => {
                let from = msg.from.as_ref();
                Some(Origin {
                    chat_id: Some(msg.chat.id),
                    user_id: from
                        .and_then(|user| i64::try_from(user.id.0).ok())
                        .unwrap_or(msg.chat.id.0),
                    first_name: from.map(|user| user.first_name.clone()),
                    username: from.and_then(|user| user.username.clone()),
                })
            }
            Event::Callback(query) => Some(Origin {
                chat_id: query.message.as_ref().map(|msg| msg.chat().id),
                user_id: i64::try_from(query.from.id.0).ok()?,
                first_name: Some(query.from.first_name.clone()),
                username: query.from.username.clone(),
            }),
        }
    }

    /// Short description used in log lines.
    pub fn describe(&self) -> String {
        match self {
            Event::Command(msg) => format!(
                "command {:?} from chat {}",
                msg.text().unwrap_or_default(),
                msg.chat.id
            ),
            Event::Callback(query) => format!(
                "callback {:?} from user {}",
                query.data.as_deref().unwrap_or_default(),
                query.from.id
            ),
        }
    }

    /// Best-effort generic failure acknowledgment to the origin.
    ///
    /// The text deliberately carries no error detail; diagnostics belong in
    /// the log, not in the chat.
    pub async fn notify_failure(&self, bot: &Bot) -> Result<(), teloxide::RequestError> {
        match self {
            Event::Command(msg) => {
                bot.send_message(
                    msg.chat.id,
                    "Something went wrong while handling your request. Please try again later.",
                )
                .await?;
            }
            Event::Callback(query) => {
                bot.answer_callback_query(query.id.clone())
                    .text("Something went wrong. Please try again later.")
                    .await?;
            }
        }
        Ok(())
    }
}
