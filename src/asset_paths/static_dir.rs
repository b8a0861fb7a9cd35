use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Drop any `?query` and `#fragment` suffix from a reference.
pub fn strip_query_and_fragment(reference: &str) -> &str {
    match reference.find(['?', '#']) {
        Some(index) => &reference[..index],
        None => reference,
    }
}

/// Locate the file a reference points to inside the static directory.
///
/// The reference is stripped of its query and fragment, percent-decoded and joined onto
/// `root`. Anything that would leave `root`, lexically through `..` or physically through
/// a symlink, resolves to `None` exactly like a file that does not exist. Directories are
/// not matches.
pub fn resolve_static_path(root: &Path, reference: &str) -> Option<PathBuf> {
    let decoded = decode_reference(strip_query_and_fragment(reference))?;
    if decoded.contains('\0') {
        return None;
    }

    let relative = contained_relative_path(decoded.trim_start_matches('/'))?;
    if relative.as_os_str().is_empty() {
        return None;
    }

    let root_canonical = root.canonicalize().ok()?;
    let canonical = root.join(&relative).canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        tracing::debug!(reference, "static reference escapes the static directory");
        return None;
    }

    canonical.is_file().then_some(canonical)
}

fn decode_reference(reference: &str) -> Option<Cow<'_, str>> {
    percent_decode_str(reference).decode_utf8().ok()
}

/// Lexically fold `.`/`..` segments, refusing paths that climb above their start.
fn contained_relative_path(path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    tracing::debug!(path, "static reference escapes the static directory");
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(strip_query_and_fragment("a.js?v=1#top"), "a.js");
        assert_eq!(strip_query_and_fragment("a.js#top?x"), "a.js");
        assert_eq!(strip_query_and_fragment("a.js"), "a.js");
    }

    #[test]
    fn resolves_decoded_files_inside_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("public");
        fs::create_dir_all(root.join("vendor")).unwrap();
        fs::write(root.join("vendor/my lib.js"), b"lib").unwrap();

        let resolved = resolve_static_path(&root, "/vendor/my%20lib.js?v=3").unwrap();
        assert_eq!(fs::read(resolved).unwrap(), b"lib");
    }

    #[test]
    fn rejects_parent_traversal() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("public");
        fs::create_dir_all(&root).unwrap();
        fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

        assert!(resolve_static_path(&root, "../secret.txt").is_none());
        assert!(resolve_static_path(&root, "/%2e%2e/secret.txt").is_none());
        assert!(resolve_static_path(&root, "nested/../../secret.txt").is_none());
    }

    #[test]
    fn allows_parent_segments_that_stay_inside() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("public");
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("b.css"), b"b").unwrap();

        assert!(resolve_static_path(&root, "a/../b.css").is_some());
    }

    #[test]
    fn missing_files_and_directories_are_not_found() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("css")).unwrap();

        assert!(resolve_static_path(&root, "nope.js").is_none());
        assert!(resolve_static_path(&root, "css").is_none());
        assert!(resolve_static_path(&root, "/").is_none());
        assert!(resolve_static_path(&root, "%ff.js").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn rejects_symlinks_leaving_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("public");
        fs::create_dir_all(&root).unwrap();
        fs::write(dir.path().join("outside.js"), b"x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("outside.js"), root.join("link.js")).unwrap();

        assert!(resolve_static_path(&root, "link.js").is_none());
    }
}
