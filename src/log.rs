// src/log.rs
//
// Tiny log sink behind the logf!/logw!/logd!/loge! macros.
// Lines go to stderr and, once `init` has been called with a path,
// are appended to that file as well. Logging never fails the caller.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

static LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);
static VERBOSE: AtomicBool = AtomicBool::new(false);
static START: OnceLock<Instant> = OnceLock::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Route log lines to `path` in addition to stderr.
/// The parent directory is created if needed; `None` keeps stderr only.
pub fn init(path: Option<&Path>, verbose: bool) {
    start();
    set_verbose(verbose);

    let resolved = path.map(|p| {
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = fs::create_dir_all(parent);
            }
        }
        p.to_path_buf()
    });

    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = resolved;
    }
}

pub fn set_verbose(on: bool) {
    VERBOSE.store(on, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn format_line(elapsed_ms: u128, level: Level, msg: &str) -> String {
    format!("[{}][{}] {msg}\n", fmt_elapsed(elapsed_ms), level.as_str())
}

/// Internal logging function
pub fn write_log(level: Level, msg: &str) {
    if level == Level::Debug && !is_verbose() {
        return;
    }
    let line = format_line(start().elapsed().as_millis(), level, msg);

    // Holding the lock for the whole write keeps lines from interleaving
    if let Ok(guard) = LOG_FILE.lock() {
        eprint!("{line}");
        if let Some(path) = guard.as_ref() {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_stamp_is_zero_padded() {
        assert_eq!(fmt_elapsed(0), "00:00:00.000");
        assert_eq!(fmt_elapsed(3_723_004), "01:02:03.004");
    }

    #[test]
    fn line_carries_level_and_message() {
        let line = format_line(1_500, Level::Warn, "tick overran");
        assert_eq!(line, "[00:00:01.500][WARN] tick overran\n");
    }
}
