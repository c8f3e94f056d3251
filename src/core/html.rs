// src/core/html.rs
//
// Low-level, forgiving HTML tag scanning.
// Nothing here fails: unterminated tags, comments and CDATA simply end the scan
// or get skipped. Tag names are matched case-insensitively on ASCII.

use super::sanitize::{decode_entities, normalize_ws};

/// One tag occurrence: `<name ...>` or `</name>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased tag name, may contain a namespace (`ac:link`).
    pub name: String,
    pub closing: bool,
    /// Byte offset of the `<`.
    pub start: usize,
    /// Byte offset just past the `>`.
    pub end: usize,
}

impl Tag {
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Offset just past the `>` closing a tag that starts at `from`.
/// Quoted attribute values may contain `>`.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (off, &b) in bytes[from..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(from + off + 1),
            None => {}
        }
    }
    None
}

fn find_from(s: &str, pat: &str, from: usize) -> Option<usize> {
    s.get(from..)?.find(pat).map(|p| p + from)
}

/// Find the next real tag at or after `from`.
/// Comments, CDATA sections, doctypes and processing instructions are skipped.
/// A stray `<` that does not open a tag is treated as text.
pub fn next_tag(s: &str, mut from: usize) -> Option<Tag> {
    let bytes = s.as_bytes();
    loop {
        let lt = find_from(s, "<", from)?;
        let after = &s[lt + 1..];

        if after.starts_with("!--") {
            from = find_from(s, "-->", lt + 4)? + 3;
            continue;
        }
        if after.starts_with("![CDATA[") {
            from = find_from(s, "]]>", lt + 9)? + 3;
            continue;
        }
        if after.starts_with('!') || after.starts_with('?') {
            from = tag_end(bytes, lt + 1)?;
            continue;
        }

        let (closing, name_start) = match after.as_bytes().first() {
            Some(b'/') => (true, lt + 2),
            _ => (false, lt + 1),
        };
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b':' || **b == b'-')
            .count();
        if name_len == 0 || !bytes[name_start].is_ascii_alphabetic() {
            from = lt + 1;
            continue;
        }

        let end = tag_end(bytes, name_start + name_len)?;
        return Some(Tag {
            name: s[name_start..name_start + name_len].to_ascii_lowercase(),
            closing,
            start: lt,
            end,
        });
    }
}

/// Iterate over every tag in document order.
pub fn tags(s: &str) -> impl Iterator<Item = Tag> + '_ {
    let mut pos = 0usize;
    std::iter::from_fn(move || {
        let tag = next_tag(s, pos)?;
        pos = tag.end;
        Some(tag)
    })
}

/// Tags that separate words when rendered (`a<p>b` reads as two words).
fn breaks_words(name: &str) -> bool {
    matches!(
        name,
        "p" | "br" | "div" | "li" | "ul" | "ol" | "tr" | "td" | "th" | "table"
            | "thead" | "tbody" | "tfoot" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            | "blockquote" | "pre" | "hr" | "dt" | "dd"
    )
}

/// Remove all tags, comments and CDATA markers, keeping only character data.
/// Block-level tags leave a space behind. Entities are left encoded.
pub fn strip_tags_raw(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pos = 0usize;
    for tag in tags(s) {
        push_text(&mut out, &s[pos..tag.start]);
        if breaks_words(&tag.name) {
            out.push(' ');
        }
        pos = tag.end;
    }
    if pos < s.len() {
        push_text(&mut out, &s[pos..]);
    }
    out
}

// Text between two tags may still hold comments, CDATA or declarations,
// which `next_tag` stepped over. CDATA keeps its content; the rest is dropped.
fn push_text(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tail = &rest[lt..];
        if let Some(body) = tail.strip_prefix("<![CDATA[") {
            let close = body.find("]]>").unwrap_or(body.len());
            out.push_str(&body[..close]);
            rest = body.get(close + 3..).unwrap_or("");
        } else if tail.starts_with("<!--") {
            rest = tail.find("-->").map_or("", |e| &tail[e + 3..]);
        } else if tail.starts_with("<!") || tail.starts_with("<?") {
            rest = tail.find('>').map_or("", |e| &tail[e + 1..]);
        } else {
            out.push('<');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
}

/// Visible text of an HTML fragment: tags removed, entities decoded,
/// whitespace collapsed and trimmed.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    normalize_ws(&decode_entities(&strip_tags_raw(s.as_ref())))
}
