//! Regex scanning for external script, stylesheet and module-preload references.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::models::{AssetReference, TagKind};

/// Syntax between the insertion point of a script and the end of its match.
const SCRIPT_CLOSE: &str = "></script>";

fn script_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)<script\b([^<>]*)></script>").expect("invalid script regex")
    })
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<link\b([^<>]*)>").expect("invalid link regex"))
}

/// Compiled matchers for the attributes the scanner reads.
struct AttributePatterns {
    src: Regex,
    href: Regex,
    rel: Regex,
    integrity: Regex,
}

#[derive(Clone, Copy)]
enum Attribute {
    Src,
    Href,
    Rel,
    Integrity,
}

fn attribute_regex(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)(?:^|\s){name}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#
    ))
    .expect("invalid attribute regex")
}

fn attribute_pattern(attribute: Attribute) -> &'static Regex {
    static PATTERNS: OnceLock<AttributePatterns> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| AttributePatterns {
        src: attribute_regex("src"),
        href: attribute_regex("href"),
        rel: attribute_regex("rel"),
        integrity: attribute_regex("integrity"),
    });
    match attribute {
        Attribute::Src => &patterns.src,
        Attribute::Href => &patterns.href,
        Attribute::Rel => &patterns.rel,
        Attribute::Integrity => &patterns.integrity,
    }
}

/// Value of an attribute inside the attribute section of a tag.
fn attribute_value(attributes: &str, attribute: Attribute) -> Option<&str> {
    let caps = attribute_pattern(attribute).captures(attributes)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|value| value.as_str())
}

/// Returns `true` when the tag already declares an `integrity` attribute.
pub fn has_integrity_attribute(raw: &str) -> bool {
    attribute_pattern(Attribute::Integrity).is_match(raw)
}

fn rel_contains(attributes: &str, token: &str) -> bool {
    attribute_value(attributes, Attribute::Rel).is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|value| value.eq_ignore_ascii_case(token))
    })
}

/// Scan `document` for references of one tag kind, in document order.
///
/// Each call rescans from the start. Tags whose URL attribute is missing or empty are
/// not yielded.
pub fn find_asset_references(
    document: &str,
    kind: TagKind,
) -> impl Iterator<Item = AssetReference> + '_ {
    let pattern = match kind {
        TagKind::Script => script_pattern(),
        TagKind::Stylesheet | TagKind::ModulePreload => link_pattern(),
    };
    pattern
        .captures_iter(document)
        .filter_map(move |caps| reference_from_match(kind, &caps))
}

fn reference_from_match(kind: TagKind, caps: &Captures<'_>) -> Option<AssetReference> {
    let whole = caps.get(0)?;
    let attributes = caps.get(1).map_or("", |value| value.as_str());

    let (url, insert_at) = match kind {
        TagKind::Script => (
            attribute_value(attributes, Attribute::Src)?,
            whole.end() - SCRIPT_CLOSE.len(),
        ),
        TagKind::Stylesheet | TagKind::ModulePreload => {
            let rel = if kind == TagKind::Stylesheet {
                "stylesheet"
            } else {
                "modulepreload"
            };
            if !rel_contains(attributes, rel) {
                return None;
            }
            // before `/>` (and the whitespace leading up to it) on self-closing tags
            let close = match attributes.strip_suffix('/') {
                Some(rest) => 2 + (rest.len() - rest.trim_end().len()),
                None => 1,
            };
            (attribute_value(attributes, Attribute::Href)?, whole.end() - close)
        }
    };

    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    Some(AssetReference {
        tag_kind: kind,
        raw: whole.as_str().to_string(),
        url: url.to_string(),
        insert_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(document: &str, kind: TagKind) -> Vec<(String, usize)> {
        find_asset_references(document, kind)
            .map(|reference| (reference.url, reference.insert_at))
            .collect()
    }

    #[test]
    fn finds_external_scripts_with_insertion_before_opening_close() {
        let html = r#"<script type="module" src="/app.js"></script>"#;
        let found = collect(html, TagKind::Script);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "/app.js");
        assert_eq!(&html[found[0].1..], "></script>");
    }

    #[test]
    fn ignores_inline_scripts_and_scripts_without_src() {
        let html = "<script>console.log(1)</script><script type=\"module\"></script>";
        assert!(collect(html, TagKind::Script).is_empty());
    }

    #[test]
    fn accepts_unquoted_and_single_quoted_values() {
        let html = "<script src=/a.js></script><script src='/b.js'></script>";
        let urls: Vec<String> = collect(html, TagKind::Script)
            .into_iter()
            .map(|(url, _)| url)
            .collect();
        assert_eq!(urls, vec!["/a.js".to_string(), "/b.js".to_string()]);
    }

    #[test]
    fn does_not_mistake_data_src_for_src() {
        let html = r#"<script data-src="/lazy.js"></script>"#;
        assert!(collect(html, TagKind::Script).is_empty());
    }

    #[test]
    fn finds_stylesheets_regardless_of_attribute_order() {
        let html = concat!(
            r#"<link rel="stylesheet" href="/a.css">"#,
            r#"<link href="/b.css" rel="stylesheet">"#,
            r#"<link rel="icon" href="/favicon.ico">"#,
        );
        let found = collect(html, TagKind::Stylesheet);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "/a.css");
        assert_eq!(found[1].0, "/b.css");
        assert_eq!(&html[found[0].1..found[0].1 + 1], ">");
    }

    #[test]
    fn inserts_before_self_closing_syntax() {
        let html = r#"<link rel="modulepreload" href="/vendor.js" />"#;
        let found = collect(html, TagKind::ModulePreload);
        assert_eq!(found.len(), 1);
        assert_eq!(&html[found[0].1..], " />");

        let compact = r#"<link rel="modulepreload" href="/vendor.js"/>"#;
        let found = collect(compact, TagKind::ModulePreload);
        assert_eq!(&compact[found[0].1..], "/>");
    }

    #[test]
    fn separates_stylesheets_from_module_preloads() {
        let html = r#"<link rel="modulepreload" href="/v.js"><link rel="stylesheet" href="/s.css">"#;
        assert_eq!(collect(html, TagKind::ModulePreload)[0].0, "/v.js");
        assert_eq!(collect(html, TagKind::Stylesheet)[0].0, "/s.css");
    }

    #[test]
    fn skips_empty_urls() {
        let html = r#"<script src=""></script><link rel="stylesheet" href=" ">"#;
        assert!(collect(html, TagKind::Script).is_empty());
        assert!(collect(html, TagKind::Stylesheet).is_empty());
    }

    #[test]
    fn detects_existing_integrity() {
        assert!(has_integrity_attribute(
            r#"<script src="/a.js" integrity="sha384-abc"></script>"#
        ));
        assert!(!has_integrity_attribute(r#"<script src="/a.js"></script>"#));
    }
}
