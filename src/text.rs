// src/text.rs
//
// HTML body → plain text, used on both sides of a diff.
//
// Rendering is undecorated: no `**bold**`, no `[link]` markers, no link
// footnotes, no list bullets. Formatting-only edits therefore never show up
// as word changes.

use html2text::render::TrivialDecorator;

use crate::config::consts::RENDER_WIDTH_MARGIN;
use crate::core::html;

// Horizontal rules are drawn as a run of this character as wide as the render
const RULE_CHAR: char = '─';

/// Render an HTML body as plain text without inserting line wraps.
/// `None` and blank input give an empty string. If html2text rejects the
/// input, falls back to a plain tag strip so a bad body never breaks a tick.
pub fn normalize(html_body: Option<&str>) -> String {
    let Some(body) = html_body.filter(|b| !b.trim().is_empty()) else {
        return s!();
    };

    // Wider than any line the body can produce, so nothing wraps
    let width = body.len().saturating_add(RENDER_WIDTH_MARGIN);

    match html2text::config::with_decorator(TrivialDecorator::new())
        .raw_mode(true)
        .no_link_wrapping()
        .allow_width_overflow()
        .string_from_read(body.as_bytes(), width)
    {
        Ok(text) => drop_rules(&text),
        Err(e) => {
            logd!("html2text failed ({e}), falling back to tag strip");
            html::strip_tags(body)
        }
    }
}

// Rule length tracks the render width, which tracks the body length
fn drop_rules(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let t = line.trim();
        if !t.is_empty() && t.chars().all(|c| c == RULE_CHAR) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
