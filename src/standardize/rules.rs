//! Element Conversion Rules
//!
//! Pages built with ARIA roles or test ids instead of real tags
//! (`div role="paragraph"`, `div data-testid="list"`) and custom embed elements
//! are rewritten into plain HTML here. The rule table is fixed and applied in
//! declared order; each rule is either a rename or a custom transform.

use crate::dom::{self, NodeRef};
use crate::options::Options;
use crate::patterns::ORDERED_LABEL;

/// Builds the replacement for a matched element, or `None` to leave it as is.
///
/// The returned node is detached; the caller puts it in place of the match.
pub type Transform = for<'a> fn(&NodeRef<'a>, &Options) -> Option<NodeRef<'a>>;

/// What a rule does with a matched element.
#[derive(Clone, Copy)]
pub enum RuleAction {
    /// Rename to the tag, keeping allow-listed attributes and all children.
    Rename(&'static str),
    /// Build a replacement `tag` element with a custom transform.
    Custom {
        /// Tag the transform produces (informational).
        tag: &'static str,
        /// The conversion.
        transform: Transform,
    },
}

/// A selector and the conversion applied to its matches.
#[derive(Clone, Copy)]
pub struct StandardizationRule {
    /// CSS selector for the elements this rule converts.
    pub selector: &'static str,
    /// Conversion to apply.
    pub action: RuleAction,
}

const LIST_SELECTOR: &str =
    r#"div[data-testid^="list"]:not([data-testid^="listitem"]), div[role="list"]"#;

const LIST_ITEM_SELECTOR: &str = r#"div[data-testid^="listitem"], div[role="listitem"]"#;

/// The built-in rule table, in application order.
pub const RULES: &[StandardizationRule] = &[
    StandardizationRule {
        selector: r#"div[data-testid^="paragraph"], div[role="paragraph"]"#,
        action: RuleAction::Rename("p"),
    },
    StandardizationRule {
        selector: LIST_SELECTOR,
        action: RuleAction::Custom {
            tag: "ul",
            transform: convert_list,
        },
    },
    StandardizationRule {
        selector: LIST_ITEM_SELECTOR,
        action: RuleAction::Custom {
            tag: "li",
            transform: convert_list_item,
        },
    },
    StandardizationRule {
        selector: "lite-youtube",
        action: RuleAction::Custom {
            tag: "iframe",
            transform: convert_lite_youtube,
        },
    },
];

/// Apply [`RULES`] to everything under `root`. Returns the number of conversions.
pub fn standardize_elements(root: &NodeRef, options: &Options) -> usize {
    apply_rules(root, RULES, options)
}

/// Apply an arbitrary rule table, in order.
pub fn apply_rules(root: &NodeRef, rules: &[StandardizationRule], options: &Options) -> usize {
    let mut converted = 0;

    for rule in rules {
        for node in dom::query_all(root, rule.selector) {
            // An earlier conversion (a parent list) may have consumed it.
            if !dom::is_within(&node, root) {
                continue;
            }

            let replacement = match rule.action {
                RuleAction::Rename(tag) => Some(rename_with_allowed(&node, tag, options)),
                RuleAction::Custom { transform, .. } => transform(&node, options),
            };

            if let Some(new_node) = replacement {
                dom::replace_with(&node, &new_node);
                converted += 1;
            }
        }
    }

    converted
}

/// New `tag` element carrying the allow-listed attributes and all children of `node`.
fn rename_with_allowed<'a>(node: &NodeRef<'a>, tag: &str, options: &Options) -> NodeRef<'a> {
    let renamed = dom::new_element(node, tag);
    dom::copy_attributes(node, &renamed, |name| {
        options.allowed_attributes.contains(name) && name != "role"
    });
    dom::move_children(node, &renamed);
    renamed
}

fn is_list(node: &NodeRef) -> bool {
    if !dom::is_tag(node, "div") {
        return false;
    }
    if dom::get_attribute(node, "role").as_deref() == Some("list") {
        return true;
    }
    dom::get_attribute(node, "data-testid")
        .is_some_and(|id| id.starts_with("list") && !id.starts_with("listitem"))
}

fn is_list_item(node: &NodeRef) -> bool {
    if !dom::is_tag(node, "div") {
        return false;
    }
    dom::get_attribute(node, "role").as_deref() == Some("listitem")
        || dom::get_attribute(node, "data-testid").is_some_and(|id| id.starts_with("listitem"))
}

fn has_class(node: &NodeRef, class: &str) -> bool {
    dom::class_name(node).split_whitespace().any(|c| c == class)
}

/// First descendant carrying `class`.
fn find_by_class<'a>(node: &NodeRef<'a>, class: &str) -> Option<NodeRef<'a>> {
    dom::descendant_elements(node).into_iter().find(|n| has_class(n, class))
}

fn is_ordered(items: &[NodeRef]) -> bool {
    items
        .first()
        .and_then(|item| find_by_class(item, "label"))
        .is_some_and(|label| ORDERED_LABEL.is_match(dom::text_content(&label).trim()))
}

fn convert_list<'a>(node: &NodeRef<'a>, options: &Options) -> Option<NodeRef<'a>> {
    let items: Vec<_> = dom::element_children(node)
        .into_iter()
        .filter(is_list_item)
        .collect();
    let list = dom::new_element(node, if is_ordered(&items) { "ol" } else { "ul" });

    for item in dom::element_children(node) {
        if is_list_item(&item) {
            if let Some(li) = convert_list_item(&item, options) {
                dom::append_child(&list, &li);
            }
        } else {
            dom::append_child(&list, &item);
        }
    }

    Some(list)
}

fn convert_list_item<'a>(node: &NodeRef<'a>, options: &Options) -> Option<NodeRef<'a>> {
    let li = dom::new_element(node, "li");
    let source = find_by_class(node, "content").unwrap_or(*node);

    for child in dom::child_nodes(&source) {
        if is_list(&child) {
            if let Some(nested) = convert_list(&child, options) {
                dom::append_child(&li, &nested);
            }
            continue;
        }
        dom::append_child(&li, &child);
    }

    Some(li)
}

fn convert_lite_youtube<'a>(node: &NodeRef<'a>, _options: &Options) -> Option<NodeRef<'a>> {
    let video_id = dom::get_attribute(node, "videoid").filter(|id| !id.trim().is_empty())?;
    let title = dom::get_attribute(node, "videotitle")
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "YouTube video player".to_string());

    let iframe = dom::new_element(node, "iframe");
    dom::set_attribute(&iframe, "width", "560");
    dom::set_attribute(&iframe, "height", "315");
    dom::set_attribute(
        &iframe,
        "src",
        &format!("https://www.youtube.com/embed/{}", video_id.trim()),
    );
    dom::set_attribute(&iframe, "title", &title);
    dom::set_attribute(&iframe, "frameborder", "0");
    dom::set_attribute(
        &iframe,
        "allow",
        "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share",
    );
    dom::set_attribute(&iframe, "allowfullscreen", "");

    Some(iframe)
}
