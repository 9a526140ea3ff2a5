//! Telegram deep links for inviting people to an event.

use urlencoding::encode;

use crate::api::types::EventType;
use crate::i18n::{Language, Message};

/// `https://t.me/<bot>[/<app>]?startapp=<publicId>`
pub fn make_event_share_link(bot_username: &str, app_name: Option<&str>, public_id: &str) -> String {
    let app_path = match app_name.filter(|name| !name.is_empty()) {
        Some(name) => format!("/{name}"),
        None => String::new(),
    };
    format!(
        "https://t.me/{}{}?startapp={}",
        bot_username,
        app_path,
        encode(public_id)
    )
}

/// Link that opens Telegram's native "share to chat" picker.
pub fn make_telegram_share_url(url: &str, text: Option<&str>) -> String {
    let mut share = format!("https://t.me/share/url?url={}", encode(url));
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        share.push_str("&text=");
        share.push_str(&encode(text));
    }
    share
}

/// Invitation text sent along with the link.
pub fn share_text(language: Language, event_type: EventType, title: Option<&str>) -> String {
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let message = match (event_type, title.is_some()) {
        (EventType::Poll, false) => Message::SharePoll,
        (EventType::Booking, false) => Message::ShareBooking,
        (EventType::Poll, true) => Message::SharePollWithTitle,
        (EventType::Booking, true) => Message::ShareBookingWithTitle,
    };
    let template = language.text(message);
    match title {
        Some(title) => template.replace("{title}", title),
        None => template.to_string(),
    }
}
