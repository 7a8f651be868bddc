//! Footnote markup cleanup.

use crate::dom::{self, NodeRef};
use crate::error::Result;
use crate::options::{checked_selector, Options};

/// Drop footnote back-reference links and normalize inline references to `sup`.
///
/// Anchor references are wrapped in a `sup`, keeping the link; other
/// reference elements (`span`, `cite`) become a `sup` holding the same
/// content and `id`. References already inside a `sup` are left alone.
pub fn standardize_footnotes(root: &NodeRef, options: &Options) -> Result<usize> {
    let backrefs = checked_selector(&options.footnote_backref_selectors)?;
    let references = checked_selector(&options.footnote_inline_references)?;
    let mut changed = 0;

    // Back-links first: `a[href^="#fn"]` would also match `#fnref` links.
    for link in dom::query_all(root, &backrefs) {
        dom::remove(&link);
        changed += 1;
    }

    for reference in dom::query_all(root, &references) {
        if !dom::is_within(&reference, root) || dom::is_tag(&reference, "sup") {
            continue;
        }
        if reference.parent().is_some_and(|p| dom::is_tag(&p, "sup")) {
            continue;
        }

        let sup = dom::new_element(&reference, "sup");
        if dom::is_tag(&reference, "a") {
            dom::replace_with(&reference, &sup);
            dom::append_child(&sup, &reference);
        } else {
            if let Some(id) = dom::get_attribute(&reference, "id") {
                dom::set_attribute(&sup, "id", &id);
            }
            dom::move_children(&reference, &sup);
            dom::replace_with(&reference, &sup);
        }
        changed += 1;
    }

    Ok(changed)
}
