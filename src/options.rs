//! Configuration tables for scoring and standardization.
//!
//! Tag classifications, attribute allow-lists and footnote selectors are
//! injected by the caller rather than hardcoded in the passes. `Options::default()`
//! carries the stock tables; any subset can be overridden from JSON.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Configuration tables consumed by the scorer and the standardizer.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the stock tables.
///
/// # Example
///
/// ```rust
/// use page_distill::Options;
///
/// let mut options = Options::default();
/// options.allowed_attributes.insert("class".to_string());
/// assert!(options.is_block("section"));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Tags treated as block-level wrappers (scored by `score_and_remove`,
    /// flattened by the standardizer).
    ///
    /// `p` must not appear here: the flattener rewrites inline-only blocks
    /// into paragraphs.
    pub block_elements: Vec<String>,

    /// Tags treated as inline content.
    pub inline_elements: HashSet<String>,

    /// Tags the flattener never unwraps, nor anything containing them.
    pub preserve_elements: HashSet<String>,

    /// Tags that may legitimately be empty (`img`, `br`, `hr`, ...).
    pub allowed_empty_elements: HashSet<String>,

    /// Attributes kept by `strip_unwanted_attributes`.
    pub allowed_attributes: HashSet<String>,

    /// Extra attributes kept in debug mode.
    pub allowed_attributes_debug: HashSet<String>,

    /// Selectors matching inline footnote references (`sup.reference`, ...).
    pub footnote_inline_references: Vec<String>,

    /// Selectors matching footnote lists.
    pub footnote_list_selectors: Vec<String>,

    /// Selectors matching footnote back-reference links.
    pub footnote_backref_selectors: Vec<String>,

    /// Heuristic constants.
    pub thresholds: Thresholds,

    /// Safety cap for fixed-point passes. `0` derives the cap from the
    /// number of nodes under the content root.
    pub max_fixed_point_iterations: usize,
}

/// Numeric heuristics used by the scorer.
///
/// These are empirical values; they are kept as named fields so callers can
/// tune them without forking the passes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// `find_best_element` returns a candidate only above this score.
    pub min_score: f64,

    /// Weight of each `<p>` descendant.
    pub paragraph_weight: f64,
    /// Multiplier applied to link density in `score_element`.
    pub link_density_weight: f64,
    /// Multiplier applied to image density in `score_element`.
    pub image_density_weight: f64,
    /// Bonus for right-floated or centered elements.
    pub position_bonus: f64,
    /// Bonus for a month-name date in the text.
    pub date_bonus: f64,
    /// Bonus for a byline in the text.
    pub author_bonus: f64,
    /// Bonus for a content-ish class name.
    pub content_class_bonus: f64,
    /// Bonus for each kind of footnote markup present.
    pub footnote_bonus: f64,
    /// Penalty per nested table.
    pub nested_table_penalty: f64,
    /// Tables wider than this are treated as layout tables.
    pub layout_table_width: i64,
    /// Bonus for a middle cell of a layout table row.
    pub layout_cell_bonus: f64,

    /// `words > long_words` marks a block as likely content.
    pub long_words: usize,
    /// `words > medium_words && paragraphs > 1` marks likely content.
    pub medium_words: usize,
    /// `words > short_words && paragraphs > 0` marks likely content.
    pub short_words: usize,

    /// Blocks with fewer words are not judged as boilerplate.
    pub min_judged_words: usize,
    /// Penalty per navigation phrase found in a block's text.
    pub navigation_penalty: f64,
    /// Link density above which a block looks like navigation.
    pub max_link_density: f64,
    /// Penalty for exceeding `max_link_density`.
    pub link_density_penalty: f64,
    /// A block is a link farm when links inside its lists exceed `lists * link_farm_ratio`.
    pub link_farm_ratio: usize,
    /// Penalty for a link farm.
    pub link_farm_penalty: f64,
    /// Penalty per non-content class/id keyword.
    pub non_content_class_penalty: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_score: 50.0,
            paragraph_weight: 10.0,
            link_density_weight: 5.0,
            image_density_weight: 3.0,
            position_bonus: 5.0,
            date_bonus: 10.0,
            author_bonus: 10.0,
            content_class_bonus: 15.0,
            footnote_bonus: 10.0,
            nested_table_penalty: 5.0,
            layout_table_width: 400,
            layout_cell_bonus: 10.0,
            long_words: 100,
            medium_words: 50,
            short_words: 30,
            min_judged_words: 3,
            navigation_penalty: 10.0,
            max_link_density: 0.5,
            link_density_penalty: 15.0,
            link_farm_ratio: 3,
            link_farm_penalty: 10.0,
            non_content_class_penalty: 8.0,
        }
    }
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            block_elements: list(&[
                "div", "section", "article", "main", "aside", "header", "footer", "nav",
                "content",
            ]),
            inline_elements: set(&[
                "a", "span", "strong", "em", "i", "b", "u", "code", "br", "small", "sub",
                "sup", "mark", "date", "del", "ins", "q", "abbr", "cite", "relative-time",
                "time", "font",
            ]),
            preserve_elements: set(&[
                "pre", "code", "table", "thead", "tbody", "tr", "td", "th", "ul", "ol", "li",
                "dl", "dt", "dd", "figure", "figcaption", "picture", "details", "summary",
                "blockquote", "form", "fieldset",
            ]),
            allowed_empty_elements: set(&[
                "area", "audio", "base", "br", "col", "embed", "figure", "hr", "iframe", "img",
                "input", "link", "meta", "object", "param", "picture", "source", "svg", "td",
                "th", "track", "video", "wbr",
            ]),
            allowed_attributes: set(&[
                "alt", "allow", "allowfullscreen", "aria-label", "checked", "colspan",
                "controls", "data-latex", "data-src", "data-srcset", "data-lang", "dir",
                "display", "frameborder", "headers", "height", "href", "lang", "role",
                "rowspan", "src", "srcset", "title", "type", "width", "accent",
                "accentunder", "align", "columnalign", "columnlines", "columnspacing",
                "columnspan", "depth", "displaystyle", "fence", "frame", "framespacing",
                "linethickness", "lspace", "mathsize", "mathvariant", "maxsize", "minsize",
                "movablelimits", "notation", "numalign", "open", "rowalign", "rowlines",
                "rowspacing", "rspace", "scriptlevel", "separator", "stretchy", "symmetric",
                "voffset", "xmlns",
            ]),
            allowed_attributes_debug: set(&["class", "id"]),
            footnote_inline_references: list(&[
                "sup.reference",
                "cite.ltx_cite",
                "sup[id^=\"fnr\"]",
                "span[id^=\"fnr\"]",
                "span[class*=\"footnote_ref\"]",
                "span.footnote-link",
                "a.citation",
                "a[id^=\"ref-link\"]",
                "a[href^=\"#fn\"]",
                "a[href^=\"#cite\"]",
                "a[href^=\"#reference\"]",
                "a[href^=\"#footnote\"]",
                "a[href^=\"#r\"]",
                "a[href^=\"#b\"]",
                "a[role=\"doc-noteref\"]",
                "sup a[href*=\"cite_note\"]",
            ]),
            footnote_list_selectors: list(&[
                "div.footnote ol",
                "div.footnotes ol",
                "div[role=\"doc-endnotes\"]",
                "div[role=\"doc-footnotes\"]",
                "ol.footnotes-list",
                "ol.footnotes",
                "ol.references",
                "ol[class*=\"article-references\"]",
                "section.footnotes ol",
                "section[role=\"doc-endnotes\"]",
                "section[role=\"doc-footnotes\"]",
                "section[role=\"doc-bibliography\"]",
                "ul.footnotes-list",
                "ul.ltx_biblist",
                "div.footnote-definitions",
                "#footnotes",
            ]),
            footnote_backref_selectors: list(&[
                "a.footnote-backref",
                "a.footnote-back",
                "a.reversefootnote",
                "a[rev=\"footnote\"]",
                "a[role=\"doc-backlink\"]",
                "a[href^=\"#fnref\"]",
                "a[href^=\"#ref-\"]",
                "a[href^=\"#cite_ref\"]",
            ]),
            thresholds: Thresholds::default(),
            max_fixed_point_iterations: 0,
        }
    }
}

impl Options {
    /// Load options from a JSON document.
    ///
    /// Missing fields fall back to `Options::default()`.
    ///
    /// ```rust
    /// use page_distill::Options;
    ///
    /// let options = Options::from_json(r#"{"thresholds": {"min_score": 10.0}}"#)?;
    /// assert_eq!(options.thresholds.min_score, 10.0);
    /// assert!(options.is_block("div"));
    /// # Ok::<(), page_distill::Error>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Compile every injected selector once, reporting the first that fails.
    pub fn validate(&self) -> Result<()> {
        checked_selector(&self.footnote_inline_references)?;
        checked_selector(&self.footnote_list_selectors)?;
        checked_selector(&self.footnote_backref_selectors)?;
        self.check_block_elements()
    }

    /// The flattener rewrites inline-only blocks into `p`; a `p` block tag
    /// would rewrite forever.
    pub(crate) fn check_block_elements(&self) -> Result<()> {
        if self.is_block("p") {
            return Err(Error::Config("`p` cannot be a block wrapper tag".to_string()));
        }
        Ok(())
    }

    /// Comma-joined selector for all block tags.
    #[must_use]
    pub fn block_selector(&self) -> String {
        self.block_elements.join(", ")
    }

    /// Comma-joined selector for inline footnote references.
    #[must_use]
    pub fn footnote_inline_selector(&self) -> String {
        self.footnote_inline_references.join(", ")
    }

    /// Comma-joined selector for footnote lists.
    #[must_use]
    pub fn footnote_list_selector(&self) -> String {
        self.footnote_list_selectors.join(", ")
    }

    /// Check whether a tag is configured as a block wrapper.
    #[must_use]
    pub fn is_block(&self, tag: &str) -> bool {
        self.block_elements.iter().any(|t| t == tag)
    }

    /// Check whether a tag is configured as inline.
    #[must_use]
    pub fn is_inline(&self, tag: &str) -> bool {
        self.inline_elements.contains(tag)
    }

    /// Effective cap for a fixed-point loop over a tree of `node_count` nodes.
    #[must_use]
    pub fn fixed_point_cap(&self, node_count: usize) -> usize {
        if self.max_fixed_point_iterations > 0 {
            self.max_fixed_point_iterations
        } else {
            node_count + 2
        }
    }
}

/// Compile each selector, then join them into one selector list.
pub(crate) fn checked_selector(selectors: &[String]) -> Result<String> {
    for sel in selectors {
        if dom_query::Matcher::new(sel).is_err() {
            return Err(Error::InvalidSelector(sel.clone()));
        }
    }
    Ok(selectors.join(", "))
}
