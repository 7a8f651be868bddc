//! Attribute allow-listing.

use tracing::debug;

use crate::dom::{self, NodeRef};
use crate::options::Options;

/// Remove every attribute not on the allow-list from elements under `root`.
///
/// `svg` subtrees are left untouched. Footnote anchors (`id="fn:.."`,
/// `id="fnref:.."`, `id="footnotes"`), `class="footnote-backref"` and
/// `language-*` classes on `code` are always kept. In debug mode the debug
/// allow-list and `data-*` attributes survive as well.
///
/// Returns the number of attributes removed.
pub fn strip_unwanted_attributes(root: &NodeRef, debug_mode: bool, options: &Options) -> usize {
    let mut removed = 0;
    for child in dom::element_children(root) {
        strip(&child, debug_mode, options, &mut removed);
    }
    debug!(removed, debug_mode, "stripped attributes");
    removed
}

fn strip(node: &NodeRef, debug: bool, options: &Options, removed: &mut usize) {
    if dom::is_tag(node, "svg") {
        return;
    }

    let is_code = dom::is_tag(node, "code");
    for (name, value) in dom::get_all_attributes(node) {
        if !keep_attribute(&name, &value, is_code, debug, options) {
            dom::remove_attribute(node, &name);
            *removed += 1;
        }
    }

    for child in dom::element_children(node) {
        strip(&child, debug, options, removed);
    }
}

fn keep_attribute(name: &str, value: &str, is_code: bool, debug: bool, options: &Options) -> bool {
    match name {
        "id" if value.starts_with("fnref:") || value.starts_with("fn:") || value == "footnotes" => {
            return true;
        }
        "class" if value == "footnote-backref" => return true,
        "class" if is_code && value.starts_with("language-") => return true,
        _ => {}
    }

    if options.allowed_attributes.contains(name) {
        return true;
    }

    debug && (options.allowed_attributes_debug.contains(name) || name.starts_with("data-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str, debug: bool) -> String {
        let doc = dom::parse(&format!("<body>{html}</body>"));
        let body = dom::body(&doc).unwrap();
        strip_unwanted_attributes(&body, debug, &Options::default());
        doc.select("body").inner_html().to_string()
    }

    #[test]
    fn test_keep_attribute() {
        let opts = Options::default();

        assert!(keep_attribute("href", "/x", false, false, &opts));
        assert!(!keep_attribute("onclick", "x()", false, false, &opts));
        assert!(keep_attribute("id", "fn:3", false, false, &opts));
        assert!(!keep_attribute("id", "intro", false, false, &opts));
        assert!(keep_attribute("class", "language-rust", true, false, &opts));
        assert!(!keep_attribute("class", "language-rust", false, false, &opts));
    }

    #[test]
    fn test_non_allowed_attributes_are_removed() {
        assert_eq!(
            run(r#"<p class="lead" style="color:red" title="t">x</p>"#, false),
            r#"<p title="t">x</p>"#
        );
    }

    #[test]
    fn test_debug_keeps_class_and_data() {
        assert_eq!(
            run(r#"<p class="lead" data-x="1" onclick="f()">x</p>"#, true),
            r#"<p class="lead" data-x="1">x</p>"#
        );
    }
}
