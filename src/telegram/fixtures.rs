//! Test-only builders for Telegram types.
//!
//! Deserializing from JSON is more reliable than struct construction across
//! teloxide versions.

use teloxide::types::{CallbackQuery, Message};

pub(crate) fn message_from_json(text: &str, chat_id: i64, user_id: u64, username: Option<&str>) -> Message {
    let json = serde_json::json!({
        "message_id": 1,
        "date": 1735992000,
        "chat": {
            "id": chat_id,
            "type": "private",
            "first_name": "Test",
            "username": "testuser"
        },
        "from": {
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
            "username": username,
        },
        "text": text
    });

    serde_json::from_value(json).expect("Failed to deserialize message")
}

pub(crate) fn callback_from_json(data: &str, chat_id: i64, user_id: u64) -> CallbackQuery {
    let json = serde_json::json!({
        "id": "callback_123",
        "from": {
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
            "username": "testuser"
        },
        "message": {
            "message_id": 42,
            "date": 1735992000,
            "chat": {
                "id": chat_id,
                "type": "private",
                "first_name": "Test",
                "username": "testuser"
            },
            "from": {
                "id": 987654321,
                "is_bot": true,
                "first_name": "TestBot",
                "username": "test_bot"
            },
            "text": "Original message"
        },
        "chat_instance": "chat_instance_123",
        "data": data
    });

    serde_json::from_value(json).expect("Failed to deserialize callback")
}
