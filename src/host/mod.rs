//! The Telegram WebApp host as seen by the screens.
//!
//! Screens never reach for a global WebApp object; they receive a
//! [`HostBridge`] and drive buttons, popups and links through it.

pub mod recording;
pub mod start_param;

pub use recording::RecordingBridge;
pub use start_param::{route_from_start_param, Route};

use async_trait::async_trait;
use thiserror::Error;

use crate::i18n::Language;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Not running inside Telegram")]
    NotInTelegram,

    #[error("Host initialization failed: {0}")]
    Init(String),

    #[error("Popup failed: {0}")]
    Popup(String),
}

/// Full state of one of the bottom buttons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonParams {
    pub text: String,
    pub is_visible: bool,
    pub is_enabled: bool,
    pub is_loader_visible: bool,
}

impl ButtonParams {
    pub fn active(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_visible: true,
            is_enabled: true,
            is_loader_visible: false,
        }
    }

    pub fn disabled(text: impl Into<String>) -> Self {
        Self {
            is_enabled: false,
            ..Self::active(text)
        }
    }

    /// Visible, disabled and spinning; used while a request is in flight.
    pub fn loading(text: impl Into<String>) -> Self {
        Self {
            is_enabled: false,
            is_loader_visible: true,
            ..Self::active(text)
        }
    }

    pub fn hidden() -> Self {
        Self::default()
    }
}

/// Values Telegram passes to the app at launch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchParams {
    /// Raw signed init data, forwarded verbatim to the backend.
    pub init_data: String,
    pub start_param: Option<String>,
    pub user_id: Option<i64>,
    pub language_code: Option<String>,
    pub platform: Option<String>,
}

impl LaunchParams {
    pub fn language(&self) -> Language {
        Language::from_code(self.language_code.as_deref())
    }
}

#[async_trait]
pub trait HostBridge: Send + Sync {
    /// True when a WebApp object with init data is present.
    fn is_telegram_env(&self) -> bool;

    /// Mounts the back and main buttons.
    fn init(&self) -> Result<(), HostError>;

    /// Signals readiness and expands the viewport.
    fn ready(&self);

    fn launch_params(&self) -> LaunchParams;

    fn set_main_button(&self, params: ButtonParams);

    fn set_secondary_button(&self, params: ButtonParams);

    async fn show_alert(&self, message: &str) -> Result<(), HostError>;

    /// Resolves to true when the user accepted.
    async fn show_confirm(&self, message: &str) -> Result<bool, HostError>;

    fn open_link(&self, url: &str);

    fn open_telegram_link(&self, url: &str);
}
