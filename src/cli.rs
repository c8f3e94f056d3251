// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::consts::{DEFAULT_INTERVAL_SECS, DEFAULT_LOG_FILE, DEFAULT_STATE_FILE};
use crate::config::options::{NotifyOptions, SourceOptions, WatchOptions};
use crate::error::Result;
use crate::notify::{Notifier, SlackNotifier, StdoutNotifier};
use crate::source::ConfluenceSource;
use crate::store::{FileStore, MemoryStore, SnapshotStore};
use crate::watch::{TickOutcome, Watcher};

/// Watch a wiki page and post a summary to chat whenever a new version appears.
///
/// Every option can also come from the environment or a `.env` file.
#[derive(Debug, Parser)]
#[command(name = "wiki_watch", version, about)]
pub struct Args {
    /// Wiki base URL, e.g. https://example.atlassian.net/wiki
    #[arg(long, env = "CONFLUENCE_BASE_URL", default_value = "")]
    pub base_url: String,

    /// Id of the page to watch
    #[arg(long, env = "PAGE_ID", default_value = "")]
    pub page_id: String,

    #[arg(long, env = "CONFLUENCE_EMAIL", default_value = "")]
    pub email: String,

    #[arg(long, env = "CONFLUENCE_API_TOKEN", default_value = "", hide_env_values = true)]
    pub api_token: String,

    #[arg(long, env = "SLACK_BOT_TOKEN", default_value = "", hide_env_values = true)]
    pub slack_token: String,

    /// Channel id to post to
    #[arg(long, env = "SLACK_CHANNEL_ID", default_value = "")]
    pub channel: String,

    /// Seconds between polls
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Where the last seen version is kept
    #[arg(long, env = "STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    /// Log file (stderr always gets a copy); empty to disable
    #[arg(long, env = "LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: String,

    /// Poll once and exit
    #[arg(long)]
    pub once: bool,

    /// Print notifications instead of posting them; the state file is not written
    #[arg(long)]
    pub dry_run: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Args> for WatchOptions {
    fn from(a: Args) -> Self {
        let log_file = a.log_file.trim();
        WatchOptions {
            source: SourceOptions {
                base_url: a.base_url,
                page_id: a.page_id,
                email: a.email,
                api_token: a.api_token,
            },
            notify: NotifyOptions {
                bot_token: a.slack_token,
                channel: a.channel,
                dry_run: a.dry_run,
            },
            interval: Duration::from_secs(a.interval),
            state_file: a.state_file,
            log_file: (!log_file.is_empty()).then(|| PathBuf::from(log_file)),
            once: a.once,
            verbose: a.verbose,
        }
    }
}

/// Load `.env`, parse flags and run until killed (or one tick with `--once`).
pub fn run() -> Result<()> {
    // A missing .env is normal
    let _ = dotenvy::dotenv();
    let opts = WatchOptions::from(Args::parse()).validate()?;
    run_with(opts)
}

pub fn run_with(opts: WatchOptions) -> Result<()> {
    crate::log::init(opts.log_file.as_deref(), opts.verbose);
    logf!(
        "Watching page {} on {} every {:?} (state: {})",
        opts.source.page_id,
        opts.source.base_url,
        opts.interval,
        opts.state_file.display()
    );
    logd!("{opts:?}");

    let file_store = FileStore::new(&opts.state_file);
    let store: Box<dyn SnapshotStore> = if opts.notify.dry_run {
        logf!("Dry run: printing notifications, state file left untouched");
        Box::new(MemoryStore::new(file_store.load()))
    } else {
        Box::new(file_store)
    };
    let notifier: Box<dyn Notifier> = if opts.notify.dry_run {
        Box::new(StdoutNotifier)
    } else {
        Box::new(SlackNotifier::new(&opts.notify)?)
    };
    let source = Box::new(ConfluenceSource::new(opts.source.clone())?);

    let watcher = Watcher::new(source, store, notifier, opts.interval);
    if opts.once {
        return match watcher.tick() {
            TickOutcome::Failed(e) => Err(e),
            _ => Ok(()),
        };
    }
    watcher.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn flags_map_onto_options() {
        let args = Args::parse_from([
            "wiki_watch",
            "--base-url", "https://wiki.example.com/",
            "--page-id", "42",
            "--email", "bot@example.com",
            "--api-token", "t",
            "--slack-token", "xoxb",
            "--channel", "C1",
            "--interval", "300",
            "--log-file", "",
            "--once",
        ]);
        let opts = WatchOptions::from(args).validate().unwrap();
        assert_eq!(opts.source.base_url, "https://wiki.example.com");
        assert_eq!(opts.source.page_id, "42");
        assert_eq!(opts.interval, Duration::from_secs(300));
        assert_eq!(opts.log_file, None);
        assert!(opts.once);
        assert!(!opts.notify.dry_run);
    }

    // Read from the command definition so exported STATE_FILE/LOG_FILE/
    // POLL_INTERVAL_SECS in the test environment cannot leak in
    fn default_of(id: &str) -> String {
        let cmd = Args::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        arg.get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn defaults_for_paths_and_interval() {
        assert_eq!(default_of("state_file"), DEFAULT_STATE_FILE);
        assert_eq!(default_of("log_file"), DEFAULT_LOG_FILE);
        assert_eq!(default_of("interval"), DEFAULT_INTERVAL_SECS.to_string());
    }

    #[test]
    fn env_names_are_wired() {
        let cmd = Args::command();
        let env_of = |id: &str| {
            cmd.get_arguments()
                .find(|a| a.get_id() == id)
                .and_then(|a| a.get_env())
                .map(|e| e.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("state_file").as_deref(), Some("STATE_FILE"));
        assert_eq!(env_of("interval").as_deref(), Some("POLL_INTERVAL_SECS"));
        assert_eq!(env_of("page_id").as_deref(), Some("PAGE_ID"));
        assert_eq!(env_of("once"), None);
    }

    #[test]
    fn explicit_flags_win() {
        let args = Args::parse_from([
            "wiki_watch",
            "--state-file", "/tmp/s.json",
            "--log-file", "/tmp/w.log",
            "--interval", "90",
        ]);
        let opts = WatchOptions::from(args);
        assert_eq!(opts.state_file, PathBuf::from("/tmp/s.json"));
        assert_eq!(opts.log_file, Some(PathBuf::from("/tmp/w.log")));
        assert_eq!(opts.interval, Duration::from_secs(90));
    }
}
