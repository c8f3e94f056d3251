// src/config/options.rs
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;
use crate::error::{Result, WatchError};

/// Wiki side: where the page lives and how to log in.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceOptions {
    pub base_url: String,
    pub page_id: String,
    pub email: String,
    pub api_token: String,
}

/// Chat side: bot token and destination.
#[derive(Clone, PartialEq, Eq)]
pub struct NotifyOptions {
    pub bot_token: String,
    pub channel: String,
    /// Print the message instead of posting it.
    pub dry_run: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchOptions {
    pub source: SourceOptions,
    pub notify: NotifyOptions,
    pub interval: Duration,
    pub state_file: PathBuf,
    pub log_file: Option<PathBuf>,
    pub once: bool,
    pub verbose: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            source: SourceOptions {
                base_url: s!(),
                page_id: s!(),
                email: s!(),
                api_token: s!(),
            },
            notify: NotifyOptions {
                bot_token: s!(),
                channel: s!(),
                dry_run: false,
            },
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            once: false,
            verbose: false,
        }
    }
}

impl WatchOptions {
    /// Trim what users tend to paste sloppily and reject anything unusable.
    pub fn validate(mut self) -> Result<Self> {
        self.source.base_url = self.source.base_url.trim().trim_end_matches('/').to_string();
        self.source.page_id = self.source.page_id.trim().to_string();
        self.notify.channel = self.notify.channel.trim().to_string();

        require("base URL (CONFLUENCE_BASE_URL)", &self.source.base_url)?;
        require("page id (PAGE_ID)", &self.source.page_id)?;
        require("wiki user (CONFLUENCE_EMAIL)", &self.source.email)?;
        require("wiki API token (CONFLUENCE_API_TOKEN)", &self.source.api_token)?;

        if !self.source.base_url.starts_with("http://") && !self.source.base_url.starts_with("https://") {
            return Err(WatchError::Config(format!(
                "base URL must start with http:// or https://, got {}",
                self.source.base_url
            )));
        }
        if !self.notify.dry_run {
            require("bot token (SLACK_BOT_TOKEN)", &self.notify.bot_token)?;
            require("channel (SLACK_CHANNEL_ID)", &self.notify.channel)?;
        }
        if self.interval.is_zero() {
            return Err(WatchError::Config(s!("poll interval must be at least 1 second")));
        }
        if self.interval > Duration::from_secs(MAX_INTERVAL_SECS) {
            return Err(WatchError::Config(format!(
                "poll interval must be at most {MAX_INTERVAL_SECS} seconds, got {}",
                self.interval.as_secs()
            )));
        }
        Ok(self)
    }
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WatchError::Config(format!("missing {what}")));
    }
    Ok(())
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

// Secrets must never end up in logs, so Debug is hand-written here.
impl fmt::Debug for SourceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceOptions")
            .field("base_url", &self.base_url)
            .field("page_id", &self.page_id)
            .field("email", &self.email)
            .field("api_token", &redact(&self.api_token))
            .finish()
    }
}

impl fmt::Debug for NotifyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyOptions")
            .field("bot_token", &redact(&self.bot_token))
            .field("channel", &self.channel)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
