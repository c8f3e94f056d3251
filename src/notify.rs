// src/notify.rs
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::consts::SLACK_POST_URL;
use crate::config::options::NotifyOptions;
use crate::core::net::{self, Auth};
use crate::error::{Result, WatchError};

/// Delivers a finished message. Fire-and-forget from the watcher's side:
/// an error is logged by the caller and never retried.
pub trait Notifier {
    fn post(&self, text: &str) -> Result<()>;
}

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    unfurl_links: bool,
}

#[derive(Debug, Deserialize)]
struct SlackReply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// `chat.postMessage` with a bot token.
pub struct SlackNotifier {
    client: Client,
    token: String,
    channel: String,
}

impl SlackNotifier {
    pub fn new(opts: &NotifyOptions) -> Result<Self> {
        let client = net::client().map_err(|e| WatchError::Config(format!("http client: {e}")))?;
        Ok(Self { client, token: opts.bot_token.clone(), channel: opts.channel.clone() })
    }
}

impl Notifier for SlackNotifier {
    fn post(&self, text: &str) -> Result<()> {
        let body = PostMessage { channel: &self.channel, text, unfurl_links: false };
        let reply: SlackReply = net::post_json(&self.client, SLACK_POST_URL, Auth::Bearer(&self.token), &body)
            .map_err(|e| WatchError::Notify(e.to_string()))?;
        check_reply(reply)
    }
}

// Slack answers 200 even on failure; the verdict is in `ok`.
fn check_reply(reply: SlackReply) -> Result<()> {
    if reply.ok {
        Ok(())
    } else {
        Err(WatchError::Notify(reply.error.unwrap_or_else(|| s!("unknown slack error"))))
    }
}

/// Prints messages to stdout instead of posting them (`--dry-run`).
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn post(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}
