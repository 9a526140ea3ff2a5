use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use std::env;

use crate::utils::datetime::parse_timezone;

pub const DEFAULT_BOT_USERNAME: &str = "comunna_bot";
pub const DEFAULT_MINI_APP_NAME: &str = "timetally";
pub const DEFAULT_CALENDAR_PAGE_URL: &str = "http://localhost:3000/calendar";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub bot_username: String,
    pub mini_app_name: String,
    pub user_timezone: Tz,
    pub calendar_page_url: String,
    pub http_port: u16,
}

/// Everything needed to build outgoing links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSettings {
    pub bot_username: String,
    pub mini_app_name: Option<String>,
    pub calendar_page_url: String,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            bot_username: DEFAULT_BOT_USERNAME.to_string(),
            mini_app_name: Some(DEFAULT_MINI_APP_NAME.to_string()),
            calendar_page_url: DEFAULT_CALENDAR_PAGE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_base_url = env::var("API_BASE_URL")
            .map_err(|_| anyhow!("API_BASE_URL must be set"))?;

        if api_base_url.trim().is_empty() {
            return Err(anyhow!("API_BASE_URL must be set"));
        }

        let bot_username = var_or_default("BOT_USERNAME", DEFAULT_BOT_USERNAME);
        let mini_app_name = var_or_default("MINI_APP_NAME", DEFAULT_MINI_APP_NAME);
        let calendar_page_url = var_or_default("CALENDAR_PAGE_URL", DEFAULT_CALENDAR_PAGE_URL);

        let tz_name = var_or_default("USER_TIMEZONE", "UTC");
        let user_timezone = parse_timezone(&tz_name)
            .ok_or_else(|| anyhow!("Invalid USER_TIMEZONE '{}'", tz_name))?;

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        Ok(Config {
            api_base_url: api_base_url.trim().to_string(),
            bot_username,
            mini_app_name,
            user_timezone,
            calendar_page_url,
            http_port,
        })
    }

    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings {
            bot_username: self.bot_username.clone(),
            mini_app_name: Some(self.mini_app_name.clone()).filter(|name| !name.is_empty()),
            calendar_page_url: self.calendar_page_url.clone(),
        }
    }
}

/// Unset or blank variables fall back to `default`.
fn var_or_default(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
