use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use super::{ButtonParams, HostBridge, HostError, LaunchParams};
use crate::utils::logging::log_host_event;

#[derive(Debug, Default)]
struct Recorded {
    alerts: Vec<String>,
    confirms: Vec<String>,
    confirm_answers: VecDeque<bool>,
    main_button: Vec<ButtonParams>,
    secondary_button: Vec<ButtonParams>,
    links: Vec<String>,
    telegram_links: Vec<String>,
    ready_calls: usize,
}

/// In-memory host that scripts confirm answers and records every
/// interaction. Used by tests and by headless callers.
#[derive(Debug)]
pub struct RecordingBridge {
    launch: LaunchParams,
    in_telegram: bool,
    init_error: Option<HostError>,
    default_confirm: bool,
    recorded: Mutex<Recorded>,
}

impl Default for RecordingBridge {
    fn default() -> Self {
        Self::new(LaunchParams::default())
    }
}

impl RecordingBridge {
    pub fn new(launch: LaunchParams) -> Self {
        Self {
            launch,
            in_telegram: true,
            init_error: None,
            default_confirm: true,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// A browser tab opened outside Telegram.
    pub fn outside_telegram() -> Self {
        Self {
            in_telegram: false,
            ..Self::default()
        }
    }

    pub fn with_init_error(mut self, error: HostError) -> Self {
        self.init_error = Some(error);
        self
    }

    /// Answer given once the scripted confirm answers run out.
    pub fn with_default_confirm(mut self, answer: bool) -> Self {
        self.default_confirm = answer;
        self
    }

    /// Queues the answers for the next `show_confirm` calls, in order.
    pub fn script_confirms(&self, answers: impl IntoIterator<Item = bool>) {
        self.lock().confirm_answers.extend(answers);
    }

    pub fn alerts(&self) -> Vec<String> {
        self.lock().alerts.clone()
    }

    pub fn last_alert(&self) -> Option<String> {
        self.lock().alerts.last().cloned()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.lock().confirms.clone()
    }

    /// Every state the main button was set to, oldest first.
    pub fn main_button_history(&self) -> Vec<ButtonParams> {
        self.lock().main_button.clone()
    }

    pub fn main_button(&self) -> Option<ButtonParams> {
        self.lock().main_button.last().cloned()
    }

    pub fn secondary_button(&self) -> Option<ButtonParams> {
        self.lock().secondary_button.last().cloned()
    }

    pub fn opened_links(&self) -> Vec<String> {
        self.lock().links.clone()
    }

    pub fn opened_telegram_links(&self) -> Vec<String> {
        self.lock().telegram_links.clone()
    }

    pub fn ready_calls(&self) -> usize {
        self.lock().ready_calls
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl HostBridge for RecordingBridge {
    fn is_telegram_env(&self) -> bool {
        self.in_telegram
    }

    fn init(&self) -> Result<(), HostError> {
        match &self.init_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn ready(&self) {
        self.lock().ready_calls += 1;
    }

    fn launch_params(&self) -> LaunchParams {
        self.launch.clone()
    }

    fn set_main_button(&self, params: ButtonParams) {
        self.lock().main_button.push(params);
    }

    fn set_secondary_button(&self, params: ButtonParams) {
        self.lock().secondary_button.push(params);
    }

    async fn show_alert(&self, message: &str) -> Result<(), HostError> {
        log_host_event("alert", Some(message));
        self.lock().alerts.push(message.to_string());
        Ok(())
    }

    async fn show_confirm(&self, message: &str) -> Result<bool, HostError> {
        let mut recorded = self.lock();
        recorded.confirms.push(message.to_string());
        let answer = recorded.confirm_answers.pop_front().unwrap_or(self.default_confirm);
        log_host_event("confirm", Some(&format!("{message} -> {answer}")));
        Ok(answer)
    }

    fn open_link(&self, url: &str) {
        log_host_event("open_link", Some(url));
        self.lock().links.push(url.to_string());
    }

    fn open_telegram_link(&self, url: &str) {
        log_host_event("open_telegram_link", Some(url));
        self.lock().telegram_links.push(url.to_string());
    }
}
