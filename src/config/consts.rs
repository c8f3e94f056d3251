// src/config/consts.rs

// Local state
pub const DEFAULT_STATE_FILE: &str = ".store/snapshot.json";
pub const DEFAULT_LOG_FILE: &str = ".store/watch.log";

// Polling
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;
pub const HTTP_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("wiki_watch/", env!("CARGO_PKG_VERSION"));

// Wiki
pub const CONTENT_API_PATH: &str = "/rest/api/content/";
pub const CONTENT_EXPAND: &str = "body.storage,version";

// Chat
pub const SLACK_POST_URL: &str = "https://slack.com/api/chat.postMessage";

// Summary
pub const EXCERPT_CAP: usize = 300;
pub const EXCERPT_MORE: &str = "…(truncated)";
pub const NO_DIFF_PLACEHOLDER: &str = "(no meaningful difference)";
pub const NO_COMMENT_PLACEHOLDER: &str = "(no comment)";
pub const ADDED_LABEL: &str = "[+] ";
pub const REMOVED_LABEL: &str = "[-] ";
pub const MAX_LISTED_ROWS: usize = 10;

// Text normalizer: render width is the body length plus this margin,
// so no rendered line can reach it
pub const RENDER_WIDTH_MARGIN: usize = 1_024;
