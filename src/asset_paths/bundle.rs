use crate::config::BasePath;

/// Map a reference URL to the key it is stored under in the output set.
///
/// With a relative base the URL is resolved against the directory holding the
/// referencing document, so `./chunk.js` next to `nested/index.html` becomes
/// `nested/chunk.js`. Any other base is stripped from the front of the URL as a literal
/// prefix; URLs that do not carry the prefix are used unchanged.
///
/// Returns `None` when a relative reference climbs above the output root.
pub fn bundle_key(document_path: &str, url: &str, base: BasePath<'_>) -> Option<String> {
    match base {
        BasePath::Relative => {
            if url.starts_with('/') {
                normalize_posix(url)
            } else {
                let directory = match document_path.rfind('/') {
                    Some(index) => &document_path[..index],
                    None => "",
                };
                normalize_posix(&format!("{directory}/{url}"))
            }
        }
        BasePath::Prefix(prefix) => Some(url.strip_prefix(prefix).unwrap_or(url).to_string()),
    }
}

/// Collapse `.` and `..` segments of a forward-slash path.
///
/// The result never carries a leading slash. A `..` with nothing left to pop yields
/// `None`.
pub fn normalize_posix(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::{bundle_key, normalize_posix};
    use crate::config::BasePath;

    #[test]
    fn resolves_relative_to_document_directory() {
        assert_eq!(
            bundle_key("index.html", "./chunk.js", BasePath::Relative).as_deref(),
            Some("chunk.js")
        );
        assert_eq!(
            bundle_key("docs/guide/index.html", "../assets/app.js", BasePath::Relative).as_deref(),
            Some("docs/assets/app.js")
        );
        assert_eq!(
            bundle_key("docs/index.html", "/assets/app.js", BasePath::Relative).as_deref(),
            Some("assets/app.js")
        );
    }

    #[test]
    fn strips_literal_prefix() {
        assert_eq!(
            bundle_key("index.html", "/assets/app.js", BasePath::Prefix("/")).as_deref(),
            Some("assets/app.js")
        );
        assert_eq!(
            bundle_key("index.html", "/app/assets/app.js", BasePath::Prefix("/app/")).as_deref(),
            Some("assets/app.js")
        );
        assert_eq!(
            bundle_key("index.html", "assets/app.js", BasePath::Prefix("/app/")).as_deref(),
            Some("assets/app.js")
        );
    }

    #[test]
    fn relative_keys_cannot_leave_the_output_root() {
        assert_eq!(bundle_key("index.html", "/../secret.js", BasePath::Relative), None);
        assert_eq!(bundle_key("index.html", "../../secret.js", BasePath::Relative), None);
        assert_eq!(bundle_key("a/index.html", "../../secret.js", BasePath::Relative), None);
        assert_eq!(
            bundle_key("a/b/index.html", "../../secret.js", BasePath::Relative).as_deref(),
            Some("secret.js")
        );
    }

    #[test]
    fn parent_segments_stop_at_the_root() {
        assert_eq!(normalize_posix("../../etc/passwd"), None);
        assert_eq!(normalize_posix("a/../../b"), None);
        assert_eq!(normalize_posix("/a/./b/../c").as_deref(), Some("a/c"));
        assert_eq!(normalize_posix("a/.."), Some(String::new()));
        assert_eq!(normalize_posix(""), Some(String::new()));
    }
}
