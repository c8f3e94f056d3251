// src/diff.rs
//
// Word-level diff between two plain texts.
//
// Tokens are words and the whitespace runs between them, so whitespace is
// carried inside spans and both sides can be rebuilt exactly:
//   old = removed + unchanged spans, new = added + unchanged spans.

use similar::{Algorithm, ChangeTag, TextDiff};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanKind {
    Added,
    Removed,
    Unchanged,
}

impl From<ChangeTag> for SpanKind {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Insert => SpanKind::Added,
            ChangeTag::Delete => SpanKind::Removed,
            ChangeTag::Equal => SpanKind::Unchanged,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffSpan {
    pub kind: SpanKind,
    pub text: String,
}

impl DiffSpan {
    pub fn is_change(&self) -> bool {
        self.kind != SpanKind::Unchanged
    }
}

/// Diff `old` against `new` word by word (Myers).
/// Consecutive tokens of the same kind are merged into one span.
pub fn diff_words(old: &str, new: &str) -> Vec<DiffSpan> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_words(old, new);

    let mut spans: Vec<DiffSpan> = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = SpanKind::from(change.tag());
        match spans.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(change.value()),
            _ => spans.push(DiffSpan { kind, text: change.value().to_string() }),
        }
    }
    spans
}

/// Rebuild one side of a diff: `Removed` gives the old text, `Added` the new.
pub fn reconstruct(spans: &[DiffSpan], side: SpanKind) -> String {
    spans
        .iter()
        .filter(|s| s.kind == SpanKind::Unchanged || s.kind == side)
        .map(|s| s.text.as_str())
        .collect()
}

pub fn has_changes(spans: &[DiffSpan]) -> bool {
    spans.iter().any(DiffSpan::is_change)
}
