//! Per-tag opt-out marker handling.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Attribute that disables integrity injection on a `<script>` or `<link>`.
pub const SKIP_MARKER: &str = "skip-sri";

fn marker_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"(?i)\s{}(?:\s|=|>|/)", regex::escape(SKIP_MARKER)))
            .expect("invalid skip marker regex")
    })
}

fn marker_attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(
            r#"(?i)\s+{}(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>/]+))?\s*"#,
            regex::escape(SKIP_MARKER)
        ))
        .expect("invalid skip marker attribute regex")
    })
}

fn opening_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)<(?:script|link)\b[^>]*>").expect("invalid opening tag regex")
    })
}

/// Returns `true` when a matched tag carries the opt-out marker as a standalone token.
pub fn has_skip_marker(raw: &str) -> bool {
    marker_token_pattern().is_match(raw)
}

/// Remove every opt-out marker, with or without a value, from `<script>` and `<link>`
/// opening tags.
///
/// The marker is replaced by a single space unless it sits right before the tag's `>` or
/// `/`, in which case nothing is left behind.
pub fn strip_skip_markers(document: &str) -> String {
    opening_tag_pattern()
        .replace_all(document, |caps: &Captures<'_>| strip_in_tag(&caps[0]))
        .into_owned()
}

fn strip_in_tag(tag: &str) -> String {
    let mut stripped = String::with_capacity(tag.len());
    let mut last = 0;

    for found in marker_attribute_pattern().find_iter(tag) {
        let leading = found.len() - found.as_str().trim_start().len();
        let name_end = found.start() + leading + SKIP_MARKER.len();
        let bounded = tag[name_end..]
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '=' | '>' | '/'));
        if !bounded {
            continue;
        }

        stripped.push_str(&tag[last..found.start()]);
        match tag[found.end()..].chars().next() {
            Some('>') | Some('/') | None => {}
            Some(_) => stripped.push(' '),
        }
        last = found.end();
    }

    stripped.push_str(&tag[last..]);
    stripped
}
