//! Non-breaking space normalization.

use regex::Captures;

use crate::dom::{self, NodeRef};
use crate::patterns::NBSP_RUN;

/// Turn runs of `&nbsp;` into regular spaces, outside `pre`/`code`.
///
/// A lone non-breaking space between two word characters (as in `10&nbsp;kg`)
/// is kept: it is holding a number and its unit together. The neighbours are
/// read from the same text node, or from the sibling text at its edges.
///
/// Returns the number of rewritten text nodes.
pub fn standardize_spaces(root: &NodeRef) -> usize {
    let mut changed = 0;
    walk(root, &mut changed);
    changed
}

fn walk(node: &NodeRef, changed: &mut usize) {
    if dom::is_any_tag(node, &["pre", "code"]) {
        return;
    }

    if node.is_text() {
        let text = node.text().to_string();
        if !text.contains('\u{a0}') {
            return;
        }
        let before = node.prev_sibling().and_then(|s| s.text().chars().last());
        let after = node.next_sibling().and_then(|s| s.text().chars().next());
        let replaced = replace_nbsp_runs(&text, before, after);
        if replaced != text {
            dom::set_text(node, &replaced);
            *changed += 1;
        }
        return;
    }

    for child in node.children() {
        walk(&child, changed);
    }
}

/// Replace `&nbsp;` runs in `text`; `before`/`after` are the characters just
/// outside the text, used when a run touches its edges.
pub(crate) fn replace_nbsp_runs(text: &str, before: Option<char>, after: Option<char>) -> String {
    NBSP_RUN
        .replace_all(text, |caps: &Captures| {
            let Some(run) = caps.get(0) else {
                return String::new();
            };
            let len = run.as_str().chars().count();
            if len == 1 {
                let prev = text[..run.start()].chars().last().or(before);
                let next = text[run.end()..].chars().next().or(after);
                if prev.is_some_and(is_word_char) && next.is_some_and(is_word_char) {
                    return run.as_str().to_string();
                }
            }
            " ".repeat(len)
        })
        .into_owned()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
