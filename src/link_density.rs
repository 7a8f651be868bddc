//! Link and Text Density Statistics
//!
//! Both scorers look at the same handful of subtree counts: words, paragraphs,
//! links, images, lists. They are gathered once per element here so each
//! heuristic reads from one snapshot instead of re-querying the tree.

use crate::dom::{self, NodeRef};

/// Counts gathered from an element's subtree.
#[derive(Debug, Clone, Default)]
pub struct BlockStats {
    /// Full subtree text.
    pub text: String,
    /// Whitespace-split token count of `text`.
    pub words: usize,
    /// `<p>` descendants.
    pub paragraphs: usize,
    /// `<a>` descendants.
    pub links: usize,
    /// `<a>` descendants that sit inside a `<ul>` or `<ol>`.
    pub list_links: usize,
    /// `<img>` descendants.
    pub images: usize,
    /// `<ul>` and `<ol>` descendants.
    pub lists: usize,
    /// `<table>` descendants.
    pub tables: usize,
}

impl BlockStats {
    /// Collect counts for `node`.
    #[must_use]
    pub fn collect(node: &NodeRef) -> Self {
        let text = dom::text_content(node).to_string();
        let words = text.split_whitespace().count();
        let mut stats = Self {
            text,
            words,
            ..Self::default()
        };

        for el in dom::descendant_elements(node) {
            match dom::tag_name(&el).as_deref() {
                Some("p") => stats.paragraphs += 1,
                Some("a") => {
                    stats.links += 1;
                    if dom::has_ancestor_below(&el, &["ul", "ol"], node) {
                        stats.list_links += 1;
                    }
                }
                Some("img") => stats.images += 1,
                Some("ul" | "ol") => stats.lists += 1,
                Some("table") => stats.tables += 1,
                _ => {}
            }
        }

        stats
    }

    /// Links per word, with the word count floored at one.
    #[must_use]
    pub fn link_density(&self) -> f64 {
        self.links as f64 / self.words.max(1) as f64
    }

    /// Images per word, with the word count floored at one.
    #[must_use]
    pub fn image_density(&self) -> f64 {
        self.images as f64 / self.words.max(1) as f64
    }

    /// More list links than `ratio` per list: the shape of a link farm.
    #[must_use]
    pub fn is_link_farm(&self, ratio: usize) -> bool {
        self.lists > 0 && self.list_links > self.lists * ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(html: &str) -> BlockStats {
        let doc = dom::parse(html);
        let div = *doc.select("div").nodes().first().unwrap();
        BlockStats::collect(&div)
    }

    #[test]
    fn test_counts() {
        let s = stats(
            r#"<div><p>one two <a href="/">three</a></p><p><img src="x.png"> four</p>
            <ul><li><a href="/a">a</a></li></ul> <table><tr><td>t</td></tr></table></div>"#,
        );

        assert_eq!(s.paragraphs, 2);
        assert_eq!(s.links, 2);
        assert_eq!(s.list_links, 1);
        assert_eq!(s.images, 1);
        assert_eq!(s.lists, 1);
        assert_eq!(s.tables, 1);
        assert_eq!(s.words, 6);
    }

    #[test]
    fn test_density_floors_word_count() {
        let s = stats(r#"<div><a href="/"></a><a href="/"></a></div>"#);

        assert_eq!(s.words, 0);
        assert!((s.link_density() - 2.0).abs() < f64::EPSILON);
        assert!((s.image_density() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_link_farm() {
        let s = stats(
            r#"<div><ul><li><a>1</a></li><li><a>2</a></li><li><a>3</a></li><li><a>4</a></li></ul></div>"#,
        );

        assert!(s.is_link_farm(3));
        assert!(!s.is_link_farm(4));
    }

    #[test]
    fn test_links_outside_lists_do_not_make_a_farm() {
        let s = stats(
            r#"<div><ul><li>plain item</li></ul> some prose text here with <a>one</a> <a>two</a> <a>three</a> <a>four</a></div>"#,
        );

        assert_eq!(s.links, 4);
        assert_eq!(s.list_links, 0);
        assert!(!s.is_link_farm(3));
    }
}
