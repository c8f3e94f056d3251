// src/summary.rs
//
// Turns two page bodies into something a person can skim in a chat message:
// a capped excerpt of the changed words plus the table rows that are new.

use std::collections::HashSet;

use chrono::DateTime;

use crate::config::consts::*;
use crate::core::sanitize::clip_chars;
use crate::diff::{self, DiffSpan, SpanKind};
use crate::source::PageVersion;
use crate::tables::{self, TableRow};
use crate::text;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Labelled added/removed words, at most `EXCERPT_CAP` chars plus marker,
    /// or the no-difference placeholder.
    pub diff_excerpt: String,
    /// New-side rows with no exact match on the old side, new-side order.
    pub added_rows: Vec<TableRow>,
}

impl ChangeSummary {
    /// Full pipeline for one detected change: normalize, diff, extract, compare.
    pub fn between(old_body: Option<&str>, new_body: Option<&str>) -> Self {
        let spans = diff::diff_words(&text::normalize(old_body), &text::normalize(new_body));
        let old_rows = tables::extract_rows(old_body);
        let new_rows = tables::extract_rows(new_body);
        summarize(&old_rows, &new_rows, &spans)
    }

    pub fn has_text_changes(&self) -> bool {
        self.diff_excerpt != NO_DIFF_PLACEHOLDER
    }
}

pub fn summarize(old_rows: &[TableRow], new_rows: &[TableRow], spans: &[DiffSpan]) -> ChangeSummary {
    ChangeSummary {
        diff_excerpt: diff_excerpt(spans),
        added_rows: added_rows(old_rows, new_rows),
    }
}

/// Rows of `new` whose exact text is absent from `old`.
/// Duplicates in `new` are each kept.
pub fn added_rows(old: &[TableRow], new: &[TableRow]) -> Vec<TableRow> {
    let seen: HashSet<&str> = old.iter().map(String::as_str).collect();
    new.iter()
        .filter(|r| !seen.contains(r.as_str()))
        .cloned()
        .collect()
}

/// Changed spans only, one labelled span per line, capped at `EXCERPT_CAP` chars.
/// Whitespace-only changes do not count.
pub fn diff_excerpt(spans: &[DiffSpan]) -> String {
    // Spans are trimmed and blank ones skipped: an edit that only moves
    // whitespace is not meaningful and yields the placeholder
    let lines: Vec<String> = spans
        .iter()
        .filter_map(|span| {
            let label = match span.kind {
                SpanKind::Added => ADDED_LABEL,
                SpanKind::Removed => REMOVED_LABEL,
                SpanKind::Unchanged => return None,
            };
            let text = span.text.trim();
            (!text.is_empty()).then(|| join!(label, text))
        })
        .collect();

    if lines.is_empty() {
        return s!(NO_DIFF_PLACEHOLDER);
    }

    let full = lines.join("\n");
    match clip_chars(&full, EXCERPT_CAP) {
        (cut, true) => join!(cut, EXCERPT_MORE),
        (_, false) => full,
    }
}

/* ---------------- Message ---------------- */

/// Escape `&`, `<` and `>` for Slack mrkdwn, where `<@U123>` is a mention
/// and `<url|text>` a link.
pub fn escape_mrkdwn(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// RFC 3339 stamps become "YYYY-MM-DD HH:MM:SS +hh:mm"; anything else is shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Slack mrkdwn text for one detected change.
pub fn render_message(page: &PageVersion, previous: u64, summary: &ChangeSummary) -> String {
    let comment = page
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(NO_COMMENT_PLACEHOLDER);

    let mut msg = format!(
        ":page_facing_up: *Page updated*\n\
         *Title*: {}\n\
         *URL*: {}\n\
         *Editor*: {}\n\
         *Edited at*: {}\n\
         *Version*: {} → {}\n\
         *Comment*: {}\n\
         *Changes*:\n```\n{}\n```",
        escape_mrkdwn(&page.title),
        escape_mrkdwn(&page.url),
        escape_mrkdwn(&page.editor),
        format_timestamp(&page.edited_at),
        previous,
        page.version,
        escape_mrkdwn(comment),
        escape_mrkdwn(&summary.diff_excerpt),
    );

    if !summary.added_rows.is_empty() {
        msg.push_str(&format!("\n*Added rows* ({}):\n", summary.added_rows.len()));
        let listed: Vec<String> = summary
            .added_rows
            .iter()
            .take(MAX_LISTED_ROWS)
            .map(|row| {
                row.lines()
                    .map(|l| join!("> ", &escape_mrkdwn(l)))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect();
        msg.push_str(&listed.join("\n>\n"));

        let hidden = summary.added_rows.len().saturating_sub(MAX_LISTED_ROWS);
        if hidden > 0 {
            msg.push_str(&format!("\n…and {hidden} more"));
        }
    }
    msg
}
