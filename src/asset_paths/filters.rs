use regex::Regex;

fn remote_reference_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"),
                Regex::new(r"^//[^/]").expect("invalid protocol-relative regex"),
            ]
        })
        .as_slice()
}

/// Determine whether a reference must be downloaded instead of looked up locally.
///
/// Schemed `http(s)` URLs and protocol-relative `//host/...` URLs are remote.
pub fn is_remote_url(value: &str) -> bool {
    remote_reference_patterns()
        .iter()
        .any(|pattern| pattern.is_match(value))
}

/// Concrete URL to request for a remote reference.
///
/// Protocol-relative references are requested over HTTPS.
pub fn remote_fetch_url(value: &str) -> String {
    if value.starts_with("//") {
        format!("https:{value}")
    } else {
        value.to_string()
    }
}
