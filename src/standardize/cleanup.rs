//! Structural cleanup: comments, empty elements, trailing headings, `br` runs.

use tracing::warn;

use crate::dom::{self, NodeRef};
use crate::error::{Error, Result};
use crate::options::Options;

/// Remove comment (and any other non-element, non-text) nodes.
pub fn remove_comments(root: &NodeRef) -> usize {
    let stray: Vec<_> = root
        .descendants()
        .into_iter()
        .filter(|n| !n.is_element() && !n.is_text())
        .collect();
    for node in &stray {
        dom::remove(node);
    }
    stray.len()
}

/// Remove elements with no content, repeating until a sweep removes nothing.
///
/// Tags in the allowed-empty set (`img`, `br`, `hr`, ...) and anything inside
/// an `svg` are never removed. A lone `&nbsp;` counts as content.
pub fn remove_empty_elements(root: &NodeRef, options: &Options) -> Result<usize> {
    let cap = options.fixed_point_cap(root.descendants().len());
    let mut total = 0;

    for _ in 0..cap {
        let removed = sweep_empty(root, options);
        if removed == 0 {
            return Ok(total);
        }
        total += removed;
    }

    warn!(iterations = cap, "empty element removal did not reach a fixed point");
    Err(Error::FixedPointNotReached {
        pass: "remove_empty_elements",
        iterations: cap,
    })
}

fn sweep_empty(root: &NodeRef, options: &Options) -> usize {
    let mut removed = 0;
    for node in dom::descendant_elements(root) {
        if dom::is_within(&node, root) && is_empty_element(&node, options) {
            dom::remove(&node);
            removed += 1;
        }
    }
    removed
}

fn is_empty_element(node: &NodeRef, options: &Options) -> bool {
    let Some(tag) = dom::tag_name(node) else {
        return false;
    };
    if options.allowed_empty_elements.contains(&tag) || dom::closest(node, "svg").is_some() {
        return false;
    }

    if tag == "div" && is_separator_leftover(node) {
        return true;
    }

    let text = dom::text_content(node);
    if text.contains('\u{a0}') || !text.trim().is_empty() {
        return false;
    }

    dom::child_nodes(node)
        .iter()
        .all(|c| c.is_text() && c.text().trim().is_empty())
}

/// `<div><span>,</span><span> </span></div>`: what is left of a separated list.
fn is_separator_leftover(node: &NodeRef) -> bool {
    let children = dom::element_children(node);
    !children.is_empty()
        && children.iter().all(|c| {
            let text = c.text();
            dom::is_tag(c, "span") && matches!(text.trim(), "," | "")
        })
        && dom::child_nodes(node)
            .iter()
            .all(|c| c.is_element() || c.text().trim().is_empty())
}

/// Remove headings with no text after them, up to the end of `root`.
///
/// Siblings of the heading's ancestors count too: a heading closing one
/// section is kept when the next section has text.
pub fn remove_trailing_headings(root: &NodeRef) -> usize {
    let mut removed = 0;
    for heading in dom::query_all(root, "h1, h2, h3, h4, h5, h6").into_iter().rev() {
        if dom::is_within(&heading, root) && !has_text_after(&heading, root) {
            dom::remove(&heading);
            removed += 1;
        }
    }
    removed
}

fn has_text_after(node: &NodeRef, root: &NodeRef) -> bool {
    let mut current = *node;
    loop {
        let mut sibling = current.next_sibling();
        while let Some(s) = sibling {
            if (s.is_element() || s.is_text()) && !s.text().trim().is_empty() {
                return true;
            }
            sibling = s.next_sibling();
        }
        match current.parent() {
            Some(parent) if parent.id != root.id => current = parent,
            _ => return false,
        }
    }
}

/// Keep the first `br` of every run of consecutive `br` siblings.
pub fn strip_extra_br_elements(root: &NodeRef) -> usize {
    let mut removed = 0;
    for br in dom::query_all(root, "br") {
        if previous_significant_sibling(&br).is_some_and(|prev| dom::is_tag(&prev, "br")) {
            dom::remove(&br);
            removed += 1;
        }
    }
    removed
}

/// Previous sibling, skipping whitespace-only text.
fn previous_significant_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if !(s.is_text() && s.text().trim().is_empty()) {
            return Some(s);
        }
        sibling = s.prev_sibling();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_body<F: FnOnce(&NodeRef)>(html: &str, f: F) -> String {
        let doc = dom::parse(&format!("<body>{html}</body>"));
        let body = dom::body(&doc).unwrap();
        f(&body);
        doc.select("body").inner_html().to_string()
    }

    #[test]
    fn test_remove_comments() {
        let out = with_body("<p>a<!-- note --></p><!-- x -->", |b| {
            assert_eq!(remove_comments(b), 2);
        });
        assert_eq!(out, "<p>a</p>");
    }

    #[test]
    fn test_empty_elements_cascade() {
        let out = with_body("<p>a</p><div><span> </span><em></em></div>", |b| {
            assert_eq!(remove_empty_elements(b, &Options::default()).unwrap(), 3);
        });
        assert_eq!(out, "<p>a</p>");
    }

    #[test]
    fn test_allowed_empty_and_nbsp_survive() {
        let out = with_body("<p><br></p><p>\u{a0}</p><hr><svg><g></g></svg>", |b| {
            remove_empty_elements(b, &Options::default()).unwrap();
        });
        assert_eq!(out, "<p><br></p><p>&nbsp;</p><hr><svg><g></g></svg>");
    }

    #[test]
    fn test_separator_div_is_removed() {
        let out = with_body("<p>a</p><div><span>,</span> <span></span></div>", |b| {
            remove_empty_elements(b, &Options::default()).unwrap();
        });
        assert_eq!(out, "<p>a</p>");
    }

    #[test]
    fn test_trailing_headings() {
        let out = with_body("<h2>Intro</h2><p>Body</p><h2>Related</h2><h3>More</h3>", |b| {
            assert_eq!(remove_trailing_headings(b), 2);
        });
        assert_eq!(out, "<h2>Intro</h2><p>Body</p>");
    }

    #[test]
    fn test_heading_followed_by_next_section_is_kept() {
        let out = with_body("<section><h2>A</h2></section><section><p>text</p></section>", |b| {
            assert_eq!(remove_trailing_headings(b), 0);
        });
        assert_eq!(out, "<section><h2>A</h2></section><section><p>text</p></section>");
    }

    #[test]
    fn test_strip_extra_br() {
        let out = with_body("<p>a<br><br>\n<br>b<br>c</p>", |b| {
            assert_eq!(strip_extra_br_elements(b), 2);
        });
        assert_eq!(out, "<p>a<br>\nb<br>c</p>");
    }
}
