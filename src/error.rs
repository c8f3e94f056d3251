// src/error.rs
use thiserror::Error;

/// Everything that can go wrong outside the pure diff/extract core.
///
/// HTML oddities are not represented here: the normalizer and the table
/// extractor recover locally and never surface an error.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Network, HTTP status, auth or response-shape failure reaching the wiki.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Transport failure or an `ok: false` reply from the chat API.
    #[error("notify failed: {0}")]
    Notify(String),

    /// Snapshot could not be written.
    #[error("snapshot store: {0}")]
    Store(#[from] std::io::Error),

    /// Missing or invalid settings at startup.
    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WatchError>;
