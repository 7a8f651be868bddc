//! Whitespace Canonicalization
//!
//! Two passes over text nodes outside `pre`/`code`:
//!
//! - text pass: drop empty and invisible-only text, then rewrite the rest
//!   through an ordered regex pipeline (newline runs, padded newlines, space
//!   runs, space before punctuation, zero-width marks, `&nbsp;` runs)
//! - element pass: merge adjacent text, trim whitespace-only text at element
//!   boundaries, and put a space back between inline children that would
//!   otherwise run two words together

use crate::dom::{self, NodeRef};
use crate::options::Options;
use crate::patterns::{
    ALL_SPACES, BLOCK_BOUNDARY, ENDS_WITH_OPENING, INLINE_BOUNDARY, INVISIBLE_ONLY,
    LEADING_BREAKS, MULTIPLE_NEWLINES, PADDED_NEWLINE, REPEATED_NBSP, SPACE_BEFORE_PUNCT,
    SPACE_RUN, STARTS_WITH_CLOSING, TRAILING_BREAKS, ZERO_WIDTH,
};

/// Normalize whitespace under `root`. Returns the number of text nodes touched.
pub fn remove_empty_lines(root: &NodeRef, options: &Options) -> usize {
    let mut changed = 0;
    clean_text_nodes(root, options, &mut changed);
    tidy_elements(root, options, &mut changed);
    changed
}

/// Run a text payload through the cleanup pipeline.
#[must_use]
pub fn normalize_text_payload(text: &str) -> String {
    let text = MULTIPLE_NEWLINES.replace_all(text, "\n\n");
    let text = LEADING_BREAKS.replace_all(&text, "");
    let text = TRAILING_BREAKS.replace_all(&text, "");
    let text = PADDED_NEWLINE.replace_all(&text, "\n");
    let text = SPACE_RUN.replace_all(&text, " ");
    let text = ALL_SPACES.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = ZERO_WIDTH.replace_all(&text, "");
    REPEATED_NBSP.replace_all(&text, "\u{a0}").into_owned()
}

fn is_code(node: &NodeRef) -> bool {
    dom::is_any_tag(node, &["pre", "code"])
}

fn is_inline_element(node: &NodeRef, options: &Options) -> bool {
    dom::tag_name(node).is_some_and(|t| options.is_inline(&t))
}

fn is_inline_or_text(node: Option<NodeRef>, options: &Options) -> bool {
    node.is_some_and(|n| n.is_text() || is_inline_element(&n, options))
}

fn clean_text_nodes(node: &NodeRef, options: &Options, changed: &mut usize) {
    for child in dom::child_nodes(node) {
        if child.is_text() {
            clean_text_node(&child, options, changed);
        } else if child.is_element() && !is_code(&child) {
            clean_text_nodes(&child, options, changed);
        }
    }
}

fn clean_text_node(node: &NodeRef, options: &Options, changed: &mut usize) {
    let original = node.text().to_string();
    if INVISIBLE_ONLY.is_match(&original) {
        dom::remove(node);
        *changed += 1;
        return;
    }

    let cleaned = normalize_text_payload(&original);
    if cleaned == original {
        return;
    }

    if cleaned.is_empty() {
        // Whitespace between two inline neighbours still separates words.
        let between_inline = original.trim().is_empty()
            && is_inline_or_text(node.prev_sibling(), options)
            && is_inline_or_text(node.next_sibling(), options);
        if between_inline {
            dom::set_text(node, " ");
        } else {
            dom::remove(node);
        }
    } else {
        dom::set_text(node, &cleaned);
    }
    *changed += 1;
}

fn tidy_elements(node: &NodeRef, options: &Options, changed: &mut usize) {
    if is_code(node) {
        return;
    }
    for child in dom::element_children(node) {
        tidy_elements(&child, options, changed);
    }

    dom::merge_text_nodes(node);

    let inline = is_inline_element(node, options);
    let boundary = if inline { &*INLINE_BOUNDARY } else { &*BLOCK_BOUNDARY };

    while let Some(first) = node.first_child() {
        if !(first.is_text() && boundary.is_match(&first.text())) {
            break;
        }
        dom::remove(&first);
        *changed += 1;
    }
    while let Some(last) = node.last_child() {
        if !(last.is_text() && boundary.is_match(&last.text())) {
            break;
        }
        dom::remove(&last);
        *changed += 1;
    }

    if inline {
        *changed += separate_inline_children(node);
    }
}

/// Insert a space between adjacent children of an inline element when one of
/// them is an element and their text would otherwise touch.
fn separate_inline_children(node: &NodeRef) -> usize {
    let children = dom::child_nodes(node);
    let mut inserted = 0;

    for pair in children.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if !current.is_element() && !next.is_element() {
            continue;
        }

        let current_text = current.text();
        let next_text = next.text();
        let (Some(last), Some(first)) = (current_text.chars().last(), next_text.chars().next())
        else {
            continue;
        };
        if last.is_whitespace() || first.is_whitespace() {
            continue;
        }
        if STARTS_WITH_CLOSING.is_match(&next_text) || ENDS_WITH_OPENING.is_match(&current_text) {
            continue;
        }

        let space = dom::new_text(node, " ");
        next.insert_before(&space.id);
        inserted += 1;
    }

    inserted
}
