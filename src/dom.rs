//! DOM Operations Adapter
//!
//! Thin layer over `dom_query`'s arena tree. Nodes are `NodeRef` handles into
//! the document's arena; detaching a node only unlinks its id from the parent,
//! so handles collected before a batch of removals stay valid.
//!
//! Every pass in this crate goes through these helpers instead of touching
//! `dom_query` directly, which keeps the mutation vocabulary small: rename,
//! unwrap, replace, detach, rewrite a text node.

pub use dom_query::{Document, NodeId, NodeRef, Selection};
pub use tendril::StrTendril;

// === Tag/Node Information ===

/// Get tag name (lowercase), `None` for non-element nodes.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Check whether the node is an element with the given tag.
#[inline]
#[must_use]
pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    tag_name(node).is_some_and(|t| t == tag)
}

/// Check whether the node is an element whose tag is one of `tags`.
#[must_use]
pub fn is_any_tag(node: &NodeRef, tags: &[&str]) -> bool {
    tag_name(node).is_some_and(|t| tags.contains(&t.as_str()))
}

// === Attribute Operations ===

/// Get any attribute value.
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|s| s.to_string())
}

/// Lower-cased class attribute, empty when absent.
#[must_use]
pub fn class_name(node: &NodeRef) -> String {
    get_attribute(node, "class").unwrap_or_default().to_lowercase()
}

/// Lower-cased id attribute, empty when absent.
#[must_use]
pub fn id(node: &NodeRef) -> String {
    get_attribute(node, "id").unwrap_or_default().to_lowercase()
}

/// Get all attributes as name/value pairs, in document order.
#[must_use]
pub fn get_all_attributes(node: &NodeRef) -> Vec<(String, String)> {
    node.attrs()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

/// Set an attribute value.
#[inline]
pub fn set_attribute(node: &NodeRef, name: &str, value: &str) {
    Selection::from(*node).set_attr(name, value);
}

/// Remove an attribute.
#[inline]
pub fn remove_attribute(node: &NodeRef, name: &str) {
    Selection::from(*node).remove_attr(name);
}

/// Copy the attributes of `from` onto `to`, keeping only names accepted by `keep`.
pub fn copy_attributes<F>(from: &NodeRef, to: &NodeRef, keep: F)
where
    F: Fn(&str) -> bool,
{
    for (name, value) in get_all_attributes(from) {
        if keep(&name) {
            set_attribute(to, &name, &value);
        }
    }
}

// === Text Content ===

/// All text of the node and its descendants.
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

/// Whitespace-split word count of the subtree text.
#[must_use]
pub fn word_count(node: &NodeRef) -> usize {
    text_content(node).split_whitespace().count()
}

/// True when the subtree has no non-whitespace text.
#[must_use]
pub fn is_blank(node: &NodeRef) -> bool {
    text_content(node).trim().is_empty()
}

/// Replace the payload of a text node.
///
/// The old node is detached and a fresh text node takes its place; the new
/// handle is returned so callers can keep walking from it.
pub fn set_text<'a>(node: &NodeRef<'a>, text: &str) -> NodeRef<'a> {
    let replacement = node.tree.new_text(text);
    node.insert_before(&replacement.id);
    node.remove_from_parent();
    replacement
}

/// Create a detached text node in the same document.
#[must_use]
pub fn new_text<'a>(node: &NodeRef<'a>, text: &str) -> NodeRef<'a> {
    node.tree.new_text(text)
}

// === Tree Navigation ===

/// All child nodes (elements, text, comments) in order.
#[inline]
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children()
}

/// Element children in order.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children().into_iter().filter(NodeRef::is_element).collect()
}

/// Number of ancestors above the node.
#[must_use]
pub fn depth(node: &NodeRef) -> usize {
    let mut depth = 0;
    let mut current = node.parent();
    while let Some(parent) = current {
        depth += 1;
        current = parent.parent();
    }
    depth
}

/// True when `node` is `root` or sits somewhere beneath it.
#[must_use]
pub fn is_within(node: &NodeRef, root: &NodeRef) -> bool {
    let mut current = Some(*node);
    while let Some(n) = current {
        if n.id == root.id {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Nearest ancestor with the given tag.
#[must_use]
pub fn closest<'a>(node: &NodeRef<'a>, tag: &str) -> Option<NodeRef<'a>> {
    let mut current = node.parent();
    while let Some(n) = current {
        if is_tag(&n, tag) {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// True when an ancestor strictly between `node` and `root` has one of `tags`.
#[must_use]
pub fn has_ancestor_below(node: &NodeRef, tags: &[&str], root: &NodeRef) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        if n.id == root.id {
            return false;
        }
        if is_any_tag(&n, tags) {
            return true;
        }
        current = n.parent();
    }
    false
}

// === Querying ===

/// Query all descendants (not the node itself) matching a CSS selector.
///
/// The result is a snapshot: mutating the tree afterwards does not change it.
#[must_use]
pub fn query_all<'a>(node: &NodeRef<'a>, selector: &str) -> Vec<NodeRef<'a>> {
    if selector.is_empty() {
        return Vec::new();
    }
    Selection::from(*node).select(selector).nodes().to_vec()
}

/// True when any descendant matches the selector.
#[must_use]
pub fn has_match(node: &NodeRef, selector: &str) -> bool {
    !selector.is_empty() && Selection::from(*node).select(selector).exists()
}

/// Descendant elements in document order.
#[must_use]
pub fn descendant_elements<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.descendants().into_iter().filter(NodeRef::is_element).collect()
}

// === Tree Manipulation ===

/// Detach a node from its parent.
#[inline]
pub fn remove(node: &NodeRef) {
    node.remove_from_parent();
}

/// Create a detached element in the same document.
#[must_use]
pub fn new_element<'a>(node: &NodeRef<'a>, tag: &str) -> NodeRef<'a> {
    node.tree.new_element(tag)
}

/// Append `child` as the last child of `parent`, detaching it first.
pub fn append_child(parent: &NodeRef, child: &NodeRef) {
    child.remove_from_parent();
    parent.append_child(&child.id);
}

/// Move every child of `from` to the end of `to`.
pub fn move_children(from: &NodeRef, to: &NodeRef) {
    for child in from.children() {
        append_child(to, &child);
    }
}

/// Put `new` where `old` is and detach `old`.
pub fn replace_with(old: &NodeRef, new: &NodeRef) {
    if old.id == new.id {
        return;
    }
    new.remove_from_parent();
    old.insert_before(&new.id);
    old.remove_from_parent();
}

/// Replace a node with its children, in place.
pub fn unwrap(node: &NodeRef) {
    for child in node.children() {
        child.remove_from_parent();
        node.insert_before(&child.id);
    }
    node.remove_from_parent();
}

/// Merge runs of adjacent text nodes among the node's children.
pub fn merge_text_nodes(node: &NodeRef) {
    fn flush(run: &mut Vec<NodeRef>) {
        if run.len() > 1 {
            let merged: String = run.iter().map(|t| t.text().to_string()).collect();
            set_text(&run[0], &merged);
            for extra in &run[1..] {
                extra.remove_from_parent();
            }
        }
        run.clear();
    }

    let mut run = Vec::new();
    for child in node.children() {
        if child.is_text() {
            run.push(child);
        } else {
            flush(&mut run);
        }
    }
    flush(&mut run);
}

// === Parsing ===

/// Parse HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// The `body` element of a parsed document.
#[must_use]
pub fn body(doc: &Document) -> Option<NodeRef<'_>> {
    doc.select("body").nodes().first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a Document, sel: &str) -> NodeRef<'a> {
        *doc.select(sel).nodes().first().unwrap()
    }

    #[test]
    fn test_tag_and_attributes() {
        let doc = parse(r#"<div id="Main" class="Container" data-x="1">content</div>"#);
        let div = first(&doc, "div");

        assert_eq!(tag_name(&div), Some("div".to_string()));
        assert_eq!(id(&div), "main");
        assert_eq!(class_name(&div), "container");
        assert_eq!(get_all_attributes(&div).len(), 3);
        assert_eq!(get_attribute(&div, "missing"), None);
    }

    #[test]
    fn test_unwrap_keeps_children_in_place() {
        let doc = parse(r#"<div><p>a</p><section><p>b</p>tail</section><p>c</p></div>"#);
        let section = first(&doc, "section");

        unwrap(&section);

        assert_eq!(doc.select("div").inner_html().to_string(), "<p>a</p><p>b</p>tail<p>c</p>");
    }

    #[test]
    fn test_replace_with_new_element() {
        let doc = parse(r#"<div><span id="old">x</span></div>"#);
        let span = first(&doc, "#old");
        let em = new_element(&span, "em");
        move_children(&span, &em);

        replace_with(&span, &em);

        assert_eq!(doc.select("div").inner_html().to_string(), "<em>x</em>");
    }

    #[test]
    fn test_set_text_replaces_text_node() {
        let doc = parse(r#"<p>before<b>b</b></p>"#);
        let p = first(&doc, "p");
        let text = p.first_child().unwrap();

        set_text(&text, "after");

        assert_eq!(p.text().to_string(), "afterb");
    }

    #[test]
    fn test_merge_text_nodes() {
        let doc = parse(r#"<p>one<b>x</b>three</p>"#);
        let p = first(&doc, "p");
        let b = first(&doc, "b");
        unwrap(&b);
        assert_eq!(child_nodes(&p).len(), 3);

        merge_text_nodes(&p);

        let children = child_nodes(&p);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].text().to_string(), "onexthree");
    }

    #[test]
    fn test_depth_and_within() {
        let doc = parse(r#"<div><section><p id="t">x</p></section></div>"#);
        let p = first(&doc, "#t");
        let div = first(&doc, "div");
        let section = first(&doc, "section");

        assert_eq!(depth(&p), depth(&div) + 2);
        assert!(is_within(&p, &div));
        assert!(!is_within(&div, &section));
        assert_eq!(closest(&p, "div").map(|n| n.id), Some(div.id));
    }

    #[test]
    fn test_query_snapshot_survives_removal() {
        let doc = parse(r#"<div><p class="x">1</p><p class="x">2</p><p>3</p></div>"#);
        let div = first(&doc, "div");
        let matches = query_all(&div, "p.x");

        for node in &matches {
            remove(node);
        }

        assert_eq!(matches.len(), 2);
        assert_eq!(doc.select("p").length(), 1);
    }

    #[test]
    fn test_empty_selector_matches_nothing() {
        let doc = parse("<div><p>x</p></div>");
        let div = first(&doc, "div");

        assert!(query_all(&div, "").is_empty());
        assert!(!has_match(&div, ""));
    }

    #[test]
    fn test_word_count_and_blank() {
        let doc = parse("<div>  one two\nthree </div><span> </span>");

        assert_eq!(word_count(&first(&doc, "div")), 3);
        assert!(is_blank(&first(&doc, "span")));
    }
}
