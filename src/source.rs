// src/source.rs
//
// Where page versions come from. The watcher only sees the `PageSource` trait;
// `ConfluenceSource` is the REST implementation.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::consts::{CONTENT_API_PATH, CONTENT_EXPAND};
use crate::config::options::SourceOptions;
use crate::core::net::{self, Auth};
use crate::error::{Result, WatchError};

/// One fetched version of the monitored page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageVersion {
    pub version: u64,
    pub title: String,
    pub html_body: String,
    /// Absolute link to the page for humans.
    pub url: String,
    pub editor: String,
    /// Timestamp as reported by the wiki (RFC 3339 on Confluence).
    pub edited_at: String,
    /// Edit comment; `None` when the editor left it empty.
    pub comment: Option<String>,
}

pub trait PageSource {
    fn fetch_page(&self) -> Result<PageVersion>;
}

/* ---------------- Confluence REST ---------------- */

#[derive(Debug, Deserialize)]
struct ContentDto {
    title: String,
    version: VersionDto,
    #[serde(default)]
    body: Option<BodyDto>,
    #[serde(rename = "_links", default)]
    links: Option<LinksDto>,
}

#[derive(Debug, Deserialize)]
struct VersionDto {
    number: u64,
    #[serde(default)]
    by: Option<UserDto>,
    #[serde(default)]
    when: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BodyDto {
    storage: Option<StorageDto>,
}

#[derive(Debug, Deserialize)]
struct StorageDto {
    value: String,
}

#[derive(Debug, Deserialize)]
struct LinksDto {
    #[serde(default)]
    webui: Option<String>,
}

impl ContentDto {
    fn into_page(self, base_url: &str) -> PageVersion {
        let web_path = self.links.and_then(|l| l.webui).unwrap_or_default();
        PageVersion {
            version: self.version.number,
            title: self.title,
            html_body: self
                .body
                .and_then(|b| b.storage)
                .map(|s| s.value)
                .unwrap_or_default(),
            url: join!(base_url, &web_path),
            editor: self
                .version
                .by
                .and_then(|u| u.display_name)
                .unwrap_or_else(|| s!("unknown")),
            edited_at: self.version.when.unwrap_or_default(),
            comment: self.version.message.filter(|m| !m.trim().is_empty()),
        }
    }
}

pub struct ConfluenceSource {
    client: Client,
    opts: SourceOptions,
}

impl ConfluenceSource {
    pub fn new(opts: SourceOptions) -> Result<Self> {
        let client = net::client().map_err(|e| WatchError::Config(format!("http client: {e}")))?;
        Ok(Self { client, opts })
    }

    pub fn content_url(&self) -> String {
        format!(
            "{}{}{}?expand={}",
            self.opts.base_url, CONTENT_API_PATH, self.opts.page_id, CONTENT_EXPAND
        )
    }
}

impl PageSource for ConfluenceSource {
    fn fetch_page(&self) -> Result<PageVersion> {
        let auth = Auth::Basic { user: &self.opts.email, password: &self.opts.api_token };
        let dto: ContentDto = net::get_json(&self.client, &self.content_url(), auth)
            .map_err(|e| WatchError::Fetch(e.to_string()))?;
        Ok(dto.into_page(&self.opts.base_url))
    }
}

/// Decode a content API response. Exposed for offline fixtures.
pub fn parse_content(json: &str, base_url: &str) -> Result<PageVersion> {
    let dto: ContentDto =
        serde_json::from_str(json).map_err(|e| WatchError::Fetch(format!("bad content JSON: {e}")))?;
    Ok(dto.into_page(base_url))
}
