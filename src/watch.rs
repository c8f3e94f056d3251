// src/watch.rs
//
// One tick: load baseline → fetch → decide → (notify → persist).
// The decision itself is pure; everything with side effects stays in `run_tick`.

use std::thread;
use std::time::{Duration, Instant};

use crate::error::WatchError;
use crate::notify::Notifier;
use crate::source::{PageSource, PageVersion};
use crate::store::{Snapshot, SnapshotStore};
use crate::summary::{self, ChangeSummary};

/// What a fetched version means relative to the stored snapshot.
#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    /// Nothing stored yet: record this version, stay quiet.
    Baseline(Snapshot),
    /// Same or older version than stored.
    Unchanged,
    /// Newer version: send `message`, then store `next`.
    Changed {
        previous: u64,
        summary: ChangeSummary,
        message: String,
        next: Snapshot,
    },
}

pub fn decide(stored: &Snapshot, page: &PageVersion) -> Decision {
    let Some(previous) = stored.version else {
        return Decision::Baseline(Snapshot::observed(page.version, &page.html_body));
    };
    if page.version <= previous {
        return Decision::Unchanged;
    }

    let summary = ChangeSummary::between(stored.body.as_deref(), Some(page.html_body.as_str()));
    let message = summary::render_message(page, previous, &summary);
    Decision::Changed {
        previous,
        summary,
        message,
        next: Snapshot::observed(page.version, &page.html_body),
    }
}

#[derive(Debug)]
pub enum TickOutcome {
    Baseline(u64),
    Unchanged(u64),
    Notified { from: u64, to: u64 },
    /// The tick stopped early; stored state is whatever it was before.
    Failed(WatchError),
}

/// Run one tick. Errors are logged and reported in the outcome, never raised.
pub fn run_tick(
    source: &dyn PageSource,
    store: &dyn SnapshotStore,
    notifier: &dyn Notifier,
) -> TickOutcome {
    let stored = store.load();

    let page = match source.fetch_page() {
        Ok(p) => p,
        Err(e) => {
            loge!("{e}");
            return TickOutcome::Failed(e);
        }
    };

    match decide(&stored, &page) {
        Decision::Baseline(next) => {
            logf!("First observation of \"{}\": version {} recorded as baseline", page.title, page.version);
            if let Err(e) = store.save(&next) {
                loge!("Could not save baseline: {e}");
                return TickOutcome::Failed(WatchError::Store(e));
            }
            TickOutcome::Baseline(page.version)
        }
        Decision::Unchanged => {
            logd!("Version {} unchanged (stored {:?})", page.version, stored.version);
            TickOutcome::Unchanged(page.version)
        }
        Decision::Changed { previous, summary, message, next } => {
            logf!(
                "\"{}\" changed: version {previous} → {}, {} added row(s)",
                page.title,
                page.version,
                summary.added_rows.len()
            );
            logd!("Diff excerpt ({} chars): {}", summary.diff_excerpt.chars().count(), summary.diff_excerpt);

            if let Err(e) = notifier.post(&message) {
                loge!("{e}");
                return TickOutcome::Failed(e);
            }
            logf!("Notification sent for version {}", page.version);

            // Next tick re-notifies if this fails
            if let Err(e) = store.save(&next) {
                loge!("Notified, but could not save snapshot: {e}");
                return TickOutcome::Failed(WatchError::Store(e));
            }
            TickOutcome::Notified { from: previous, to: page.version }
        }
    }
}

/* ---------------- Schedule ---------------- */

/// Next fixed-rate slot after `due` that is not already in the past at `now`.
/// Returns the slot and how many slots were skipped because a tick overran,
/// or `None` when the slot lies beyond what `Instant` can represent.
pub fn next_slot(due: Instant, now: Instant, interval: Duration) -> Option<(Instant, u64)> {
    let mut next = due.checked_add(interval)?;
    let mut skipped = 0u64;
    while next < now {
        next = next.checked_add(interval)?;
        skipped += 1;
    }
    Some((next, skipped))
}

/// Polls one page forever on a fixed-rate schedule.
/// Ticks run on the calling thread, one at a time, so they can never overlap.
pub struct Watcher {
    source: Box<dyn PageSource>,
    store: Box<dyn SnapshotStore>,
    notifier: Box<dyn Notifier>,
    interval: Duration,
}

impl Watcher {
    pub fn new(
        source: Box<dyn PageSource>,
        store: Box<dyn SnapshotStore>,
        notifier: Box<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        Self { source, store, notifier, interval }
    }

    pub fn tick(&self) -> TickOutcome {
        run_tick(self.source.as_ref(), self.store.as_ref(), self.notifier.as_ref())
    }

    pub fn run(&self) -> ! {
        let mut due = Instant::now();
        loop {
            self.tick();

            match next_slot(due, Instant::now(), self.interval) {
                Some((next, skipped)) => {
                    if skipped > 0 {
                        logw!("Tick overran the {:?} interval, skipped {skipped} slot(s)", self.interval);
                    }
                    due = next;
                    thread::sleep(due.saturating_duration_since(Instant::now()));
                }
                None => {
                    loge!("Next tick after {:?} is out of range, sleeping a full interval", self.interval);
                    thread::sleep(self.interval);
                    due = Instant::now();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(version: u64, body: &str) -> PageVersion {
        PageVersion {
            version,
            title: s!("Roster"),
            html_body: s!(body),
            url: s!("https://wiki.example.com/x"),
            editor: s!("Ana"),
            edited_at: s!("2026-10-19T09:15:00Z"),
            comment: None,
        }
    }

    #[test]
    fn first_observation_is_baseline_whatever_the_version() {
        for v in [0, 1, 999] {
            let d = decide(&Snapshot::default(), &page(v, "<p>a</p>"));
            assert_eq!(d, Decision::Baseline(Snapshot::observed(v, "<p>a</p>")));
        }
    }

    #[test]
    fn same_or_older_version_is_unchanged() {
        let stored = Snapshot::observed(5, "<p>a</p>");
        assert_eq!(decide(&stored, &page(5, "<p>b</p>")), Decision::Unchanged);
        assert_eq!(decide(&stored, &page(3, "<p>b</p>")), Decision::Unchanged);
    }

    #[test]
    fn newer_version_builds_message_and_next_snapshot() {
        let stored = Snapshot::observed(5, "<p>status open</p>");
        let Decision::Changed { previous, summary, message, next } =
            decide(&stored, &page(6, "<p>status closed</p>"))
        else {
            panic!("expected a change");
        };
        assert_eq!(previous, 5);
        assert_eq!(next, Snapshot::observed(6, "<p>status closed</p>"));
        assert!(summary.diff_excerpt.contains("[-] open"));
        assert!(summary.diff_excerpt.contains("[+] closed"));
        assert!(message.contains("*Version*: 5 → 6"));
    }

    #[test]
    fn version_bump_with_same_body_still_notifies() {
        let stored = Snapshot::observed(1, "<p>same</p>");
        let d = decide(&stored, &page(2, "<p>same</p>"));
        let Decision::Changed { summary, .. } = d else { panic!("expected a change") };
        assert!(!summary.has_text_changes());
    }

    #[test]
    fn stored_version_without_body_diffs_against_empty() {
        let stored = Snapshot { version: Some(1), body: None };
        let Decision::Changed { summary, .. } = decide(&stored, &page(2, "<p>hello</p>")) else {
            panic!("expected a change");
        };
        assert!(summary.diff_excerpt.contains("[+] hello"));
    }

    #[test]
    fn next_slot_on_time() {
        let t0 = Instant::now();
        let i = Duration::from_secs(60);
        let (next, skipped) = next_slot(t0, t0 + Duration::from_secs(5), i).unwrap();
        assert_eq!(next, t0 + i);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn next_slot_skips_overrun_slots() {
        let t0 = Instant::now();
        let i = Duration::from_secs(60);
        let (next, skipped) = next_slot(t0, t0 + Duration::from_secs(150), i).unwrap();
        assert_eq!(next, t0 + Duration::from_secs(180));
        assert_eq!(skipped, 2);
    }

    #[test]
    fn next_slot_out_of_range_is_none() {
        let t0 = Instant::now();
        assert_eq!(next_slot(t0, t0, Duration::from_secs(u64::MAX)), None);
    }
}
