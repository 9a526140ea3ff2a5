use std::sync::Arc;

use crate::host::{ButtonParams, HostBridge, HostError};
use crate::i18n::{Language, Message};

/// Feedback types for different flow outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
}

impl FeedbackType {
    fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
        }
    }
}

/// Localized alerts, confirms and main-button states for one screen.
#[derive(Clone)]
pub struct Feedback {
    host: Arc<dyn HostBridge>,
    language: Language,
}

impl Feedback {
    pub fn new(host: Arc<dyn HostBridge>, language: Language) -> Self {
        Self { host, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn host(&self) -> &Arc<dyn HostBridge> {
        &self.host
    }

    pub fn text(&self, message: Message) -> &'static str {
        self.language.text(message)
    }

    /// Show a native alert prefixed with the feedback type's marker
    pub async fn send(&self, feedback_type: FeedbackType, message: Message) -> Result<(), HostError> {
        let formatted = format!("{} {}", feedback_type.emoji(), self.text(message));
        self.host.show_alert(&formatted).await
    }

    pub async fn success(&self, message: Message) -> Result<(), HostError> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: Message) -> Result<(), HostError> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn warning(&self, message: Message) -> Result<(), HostError> {
        self.send(FeedbackType::Warning, message).await
    }

    pub async fn info(&self, message: Message) -> Result<(), HostError> {
        self.send(FeedbackType::Info, message).await
    }

    /// Native OK/Cancel popup; true when the user accepted.
    pub async fn confirm(&self, message: Message) -> Result<bool, HostError> {
        self.host.show_confirm(self.text(message)).await
    }

    pub fn main_button(&self, message: Message) {
        self.host.set_main_button(ButtonParams::active(self.text(message)));
    }

    pub fn main_button_disabled(&self, message: Message) {
        self.host.set_main_button(ButtonParams::disabled(self.text(message)));
    }

    pub fn main_button_loading(&self, message: Message) {
        self.host.set_main_button(ButtonParams::loading(self.text(message)));
    }

    pub fn hide_main_button(&self) {
        self.host.set_main_button(ButtonParams::hidden());
    }

    pub fn secondary_button(&self, message: Message) {
        self.host.set_secondary_button(ButtonParams::active(self.text(message)));
    }

    pub fn hide_secondary_button(&self) {
        self.host.set_secondary_button(ButtonParams::hidden());
    }
}
