//! Offset-corrected insertion of attribute text.

use crate::models::IntegrityEdit;

/// Apply `edits` to `document` from left to right.
///
/// Positions refer to the unpatched document and must be ascending. A running offset,
/// grown by the length of every inserted text, shifts each position past the insertions
/// already made so no edit invalidates a later one.
pub fn apply_insertions(document: &str, edits: &[IntegrityEdit]) -> String {
    debug_assert!(
        edits.windows(2).all(|pair| pair[0].position <= pair[1].position),
        "edits must be sorted by position"
    );

    let extra: usize = edits.iter().map(|edit| edit.text.len()).sum();
    let mut patched = String::with_capacity(document.len() + extra);
    patched.push_str(document);

    let mut offset = 0;
    for edit in edits {
        patched.insert_str(edit.position + offset, &edit.text);
        offset += edit.text.len();
    }
    patched
}
