//! Heading normalization and duplicate-title elision.

use crate::dom::{self, NodeRef};
use crate::options::Options;
use crate::patterns::WHITESPACE_NORMALIZE;

/// Demote every `h1` to `h2`, then drop the first `h2` if it repeats the title.
///
/// The page title is rendered separately, so an opening heading with the
/// same text would show up twice.
pub fn standardize_headings(root: &NodeRef, title: &str, options: &Options) -> usize {
    let mut changed = 0;

    for h1 in dom::query_all(root, "h1") {
        let h2 = dom::new_element(&h1, "h2");
        dom::copy_attributes(&h1, &h2, |name| options.allowed_attributes.contains(name));
        dom::move_children(&h1, &h2);
        dom::replace_with(&h1, &h2);
        changed += 1;
    }

    let normalized_title = normalize_text(title);
    if normalized_title.is_empty() {
        return changed;
    }

    if let Some(first) = dom::query_all(root, "h2").first() {
        if normalize_text(&dom::text_content(first)) == normalized_title {
            dom::remove(first);
            changed += 1;
        }
    }

    changed
}

/// Lower-case, collapse whitespace (`&nbsp;` included) and trim.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let spaced = text.replace('\u{a0}', " ");
    WHITESPACE_NORMALIZE
        .replace_all(&spaced, " ")
        .trim()
        .to_lowercase()
}
