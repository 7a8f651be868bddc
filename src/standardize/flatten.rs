//! Wrapper Flattening
//!
//! Page builders nest content in layers of layout `div`s. This pass peels
//! them away until only the structural elements remain. Three sub-passes
//! run in a loop until a full round changes nothing:
//!
//! 1. top level: unwrap direct children of the root that only hold blocks
//! 2. deepest first: classify every block element, innermost first
//! 3. final: unwrap blocks that are now bare paragraph holders or wrappers
//!
//! Every action removes a node or trades a block element for a `p`, so the
//! loop terminates; the iteration cap only guards against a broken rule.

use tracing::{debug, trace, warn};

use crate::dom::{self, NodeRef};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::patterns::{SEMANTIC_CLASS, SEMANTIC_ROLES, WRAPPER_CLASS};

/// Flatten layout wrappers under `root`. Returns the number of mutations.
pub fn flatten_wrapper_elements(root: &NodeRef, options: &Options) -> Result<usize> {
    Flattener::new(options).run(root)
}

/// Classifies block elements against the injected tag tables.
pub struct Flattener<'o> {
    options: &'o Options,
}

/// What the deepest-first pass does with one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Keep,
    Remove,
    Unwrap,
    WrapInParagraph,
}

impl<'o> Flattener<'o> {
    #[must_use]
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// Run the three sub-passes to a fixed point.
    pub fn run(&self, root: &NodeRef) -> Result<usize> {
        self.options.check_block_elements()?;

        let cap = self.options.fixed_point_cap(root.descendants().len());
        let mut total = 0;

        for iteration in 0..cap {
            let changed =
                self.top_level_pass(root) + self.deepest_first_pass(root) + self.final_pass(root);
            if changed == 0 {
                debug!(iterations = iteration + 1, mutations = total, "flatten reached fixed point");
                return Ok(total);
            }
            total += changed;
        }

        warn!(iterations = cap, "flatten did not reach a fixed point");
        Err(Error::FixedPointNotReached {
            pass: "flatten_wrapper_elements",
            iterations: cap,
        })
    }

    fn top_level_pass(&self, root: &NodeRef) -> usize {
        let mut changed = 0;
        for child in dom::element_children(root) {
            if !self.is_block(&child) || self.is_preserved(&child) {
                continue;
            }
            let children = dom::element_children(&child);
            if children.is_empty() || self.has_direct_inline_content(&child) {
                continue;
            }
            if children.iter().all(|c| self.is_block(c)) {
                dom::unwrap(&child);
                changed += 1;
            }
        }
        changed
    }

    fn deepest_first_pass(&self, root: &NodeRef) -> usize {
        let mut blocks: Vec<(usize, NodeRef)> = dom::descendant_elements(root)
            .into_iter()
            .filter(|n| self.is_block(n))
            .map(|n| (dom::depth(&n), n))
            .collect();
        blocks.sort_by(|a, b| b.0.cmp(&a.0));

        let mut changed = 0;
        for (_, node) in blocks {
            if !dom::is_within(&node, root) {
                continue;
            }
            let action = self.classify(&node, root);
            trace!(tag = ?dom::tag_name(&node), ?action, "flatten decision");
            match action {
                Action::Keep => continue,
                Action::Remove => dom::remove(&node),
                Action::Unwrap => dom::unwrap(&node),
                Action::WrapInParagraph => {
                    let p = dom::new_element(&node, "p");
                    dom::move_children(&node, &p);
                    dom::replace_with(&node, &p);
                }
            }
            changed += 1;
        }
        changed
    }

    fn final_pass(&self, root: &NodeRef) -> usize {
        let mut changed = 0;
        for node in dom::descendant_elements(root) {
            if !self.is_block(&node) || !dom::is_within(&node, root) {
                continue;
            }
            if self.is_preserved(&node) {
                continue;
            }
            if self.holds_only_paragraphs(&node) || self.is_wrapper(&node) {
                dom::unwrap(&node);
                changed += 1;
            }
        }
        changed
    }

    fn classify(&self, node: &NodeRef, root: &NodeRef) -> Action {
        if self.is_preserved(node) {
            return Action::Keep;
        }

        let children = dom::element_children(node);
        let tag = dom::tag_name(node).unwrap_or_default();
        if children.is_empty()
            && dom::is_blank(node)
            && !self.options.allowed_empty_elements.contains(&tag)
        {
            return Action::Remove;
        }

        let inline_content = self.has_direct_inline_content(node);

        if !inline_content
            && !children.is_empty()
            && node.parent().is_some_and(|p| p.id == root.id)
        {
            return Action::Unwrap;
        }

        if self.is_wrapper(node) {
            return Action::Unwrap;
        }

        if self.is_inline_only(node) {
            return Action::WrapInParagraph;
        }

        if let [only] = children.as_slice() {
            if self.is_block(only) && !self.is_preserved(only) {
                return Action::Unwrap;
            }
        }

        if !inline_content && self.has_block_ancestor(node, root) {
            return Action::Unwrap;
        }

        Action::Keep
    }

    fn is_block(&self, node: &NodeRef) -> bool {
        dom::tag_name(node).is_some_and(|t| self.options.is_block(&t))
    }

    fn is_inline(&self, node: &NodeRef) -> bool {
        dom::tag_name(node).is_some_and(|t| self.options.is_inline(&t))
    }

    /// Preserve tags, semantic roles and semantic class/id names, on the
    /// element itself or one of its element children.
    fn is_preserved(&self, node: &NodeRef) -> bool {
        self.is_semantic(node)
            || dom::element_children(node).iter().any(|child| {
                dom::tag_name(child).is_some_and(|t| self.options.preserve_elements.contains(&t))
                    || dom::get_attribute(child, "role").as_deref() == Some("article")
                    || SEMANTIC_CLASS.is_match(&dom::class_name(child))
            })
    }

    fn is_semantic(&self, node: &NodeRef) -> bool {
        if dom::tag_name(node).is_some_and(|t| self.options.preserve_elements.contains(&t)) {
            return true;
        }
        if dom::get_attribute(node, "role").is_some_and(|r| SEMANTIC_ROLES.contains(&r.as_str())) {
            return true;
        }
        SEMANTIC_CLASS.is_match(&dom::class_name(node)) || SEMANTIC_CLASS.is_match(&dom::id(node))
    }

    /// Non-blank text or an inline element among the direct children.
    fn has_direct_inline_content(&self, node: &NodeRef) -> bool {
        dom::child_nodes(node).iter().any(|child| {
            if child.is_text() {
                !child.text().trim().is_empty()
            } else {
                self.is_inline(child)
            }
        })
    }

    /// A block that only groups other nodes and contributes nothing itself.
    fn is_wrapper(&self, node: &NodeRef) -> bool {
        if self.has_direct_inline_content(node) {
            return false;
        }

        let children = dom::element_children(node);
        dom::is_blank(node)
            || children.is_empty()
            || children.iter().all(|c| self.is_block(c))
            || WRAPPER_CLASS.is_match(&dom::class_name(node))
            || !dom::child_nodes(node)
                .iter()
                .any(|c| c.is_text() && !c.text().trim().is_empty())
    }

    /// Only text and inline elements, with some actual text.
    fn is_inline_only(&self, node: &NodeRef) -> bool {
        let all_inline = dom::child_nodes(node)
            .iter()
            .all(|c| c.is_text() || self.is_inline(c));
        all_inline && !dom::is_blank(node)
    }

    /// Element children are all `p`, with nothing but whitespace between them.
    fn holds_only_paragraphs(&self, node: &NodeRef) -> bool {
        let children = dom::child_nodes(node);
        children.iter().any(NodeRef::is_element)
            && children.iter().all(|c| {
                if c.is_text() {
                    c.text().trim().is_empty()
                } else {
                    dom::is_tag(c, "p")
                }
            })
    }

    fn has_block_ancestor(&self, node: &NodeRef, root: &NodeRef) -> bool {
        let mut current = node.parent();
        while let Some(ancestor) = current {
            if self.is_block(&ancestor) {
                return true;
            }
            if ancestor.id == root.id {
                return false;
            }
            current = ancestor.parent();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(html: &str) -> (String, usize) {
        let doc = dom::parse(&format!("<body>{html}</body>"));
        let body = dom::body(&doc).unwrap();
        let n = flatten_wrapper_elements(&body, &Options::default()).unwrap();
        (doc.select("body").inner_html().to_string(), n)
    }

    #[test]
    fn test_nested_wrappers_collapse() {
        let (html, n) = flatten(r#"<div class="wrapper"><div><p>Hello</p><p>World</p></div></div>"#);
        assert_eq!(html, "<p>Hello</p><p>World</p>");
        assert!(n >= 2);
    }

    #[test]
    fn test_inline_only_div_becomes_paragraph() {
        let (html, _) = flatten(r#"<section><p>x</p><div>Some <b>bold</b> text</div></section>"#);
        assert_eq!(html, "<p>x</p><p>Some <b>bold</b> text</p>");
    }

    #[test]
    fn test_empty_div_is_removed() {
        let (html, _) = flatten(r#"<p>a</p><div> </div><p>b</p>"#);
        assert_eq!(html, "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_preserved_blocks_survive() {
        let (html, _) = flatten(r#"<div role="main"><p>a</p></div><div class="footnotes"><ol><li>n</li></ol></div>"#);
        assert_eq!(
            html,
            r#"<div role="main"><p>a</p></div><div class="footnotes"><ol><li>n</li></ol></div>"#
        );
    }

    #[test]
    fn test_block_holding_a_table_is_kept() {
        let (html, _) = flatten("<p>a</p><div>caption <table><tr><td>1</td></tr></table></div>");
        assert!(html.contains("<div>caption <table>"));
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let doc = dom::parse(
            r#"<body><div class="row"><div class="col"><div><span>a</span></div><p>b</p></div></div></body>"#,
        );
        let body = dom::body(&doc).unwrap();
        flatten_wrapper_elements(&body, &Options::default()).unwrap();
        let first = doc.select("body").inner_html().to_string();

        assert_eq!(flatten_wrapper_elements(&body, &Options::default()).unwrap(), 0);
        assert_eq!(doc.select("body").inner_html().to_string(), first);
    }

    #[test]
    fn test_paragraph_block_tag_is_rejected() {
        let doc = dom::parse("<body><p>x</p></body>");
        let body = dom::body(&doc).unwrap();
        let mut opts = Options::default();
        opts.block_elements.push("p".to_string());

        assert!(matches!(flatten_wrapper_elements(&body, &opts), Err(Error::Config(_))));
    }

    #[test]
    fn test_iteration_cap_is_reported() {
        let doc = dom::parse("<body><div><div><div><p>x</p></div></div></div></body>");
        let body = dom::body(&doc).unwrap();
        let opts = Options {
            max_fixed_point_iterations: 1,
            ..Options::default()
        };

        assert!(matches!(
            flatten_wrapper_elements(&body, &opts),
            Err(Error::FixedPointNotReached { iterations: 1, .. })
        ));
    }
}
