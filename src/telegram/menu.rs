//! Inline keyboards and message templates.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Callback datum carried by the stats button.
pub const STATS_CALLBACK: &str = "stats";

/// Main menu shown under the greeting.
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback("📊 Stats", STATS_CALLBACK)]])
}

/// Greeting sent in response to /start.
pub fn welcome_text(name: &str, created_at: &str) -> String {
    format!("Welcome *{}*! Your account was created on {}", name, created_at)
}
