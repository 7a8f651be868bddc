//! Content Scoring
//!
//! Heuristic scoring that tells article content apart from navigation and
//! site chrome. Two entry points work on the raw tree:
//!
//! - [`score_element`] / [`find_best_element`] rank candidate content roots.
//! - [`score_and_remove`] strips blocks that look like boilerplate before a
//!   content root is chosen.

use tracing::{debug, trace};

use crate::dom::{self, NodeRef};
use crate::error::Result;
use crate::link_density::BlockStats;
use crate::options::Options;
use crate::patterns::{
    AD_TOKEN, BYLINE, CONTENT_CLASS_HINTS, CONTENT_INDICATORS, CONTENT_ROLES, MONTH_DATE,
    NAVIGATION_INDICATORS, NON_CONTENT_PATTERNS,
};

/// A scored candidate. Lives only for the duration of one ranking call.
#[derive(Debug, Clone, Copy)]
pub struct ContentScore<'a> {
    /// Heuristic score.
    pub score: f64,
    /// The scored element.
    pub element: NodeRef<'a>,
}

/// Score an element by how much it looks like main article content.
///
/// Deterministic in the element's subtree (plus, for table cells, the
/// enclosing table and row).
///
/// # Example
///
/// ```rust
/// use page_distill::{dom, scoring, Options};
///
/// let doc = dom::parse("<div class=\"post\"><p>Some words here.</p></div>");
/// let div = *doc.select("div").nodes().first().unwrap();
/// assert!(scoring::score_element(&div, &Options::default()) > 0.0);
/// ```
#[must_use]
pub fn score_element(node: &NodeRef, options: &Options) -> f64 {
    let t = &options.thresholds;
    let stats = BlockStats::collect(node);
    let mut score = 0.0;

    score += stats.words as f64;
    score += stats.paragraphs as f64 * t.paragraph_weight;
    score -= stats.link_density() * t.link_density_weight;
    score -= stats.image_density() * t.image_density_weight;

    if is_pulled_aside(node) {
        score += t.position_bonus;
    }

    if MONTH_DATE.is_match(&stats.text) {
        score += t.date_bonus;
    }

    if BYLINE.is_match(&stats.text) {
        score += t.author_bonus;
    }

    let class = dom::class_name(node);
    if CONTENT_CLASS_HINTS.iter().any(|hint| class.contains(hint)) {
        score += t.content_class_bonus;
    }

    if dom::has_match(node, &options.footnote_inline_selector()) {
        score += t.footnote_bonus;
    }
    if dom::has_match(node, &options.footnote_list_selector()) {
        score += t.footnote_bonus;
    }

    score -= stats.tables as f64 * t.nested_table_penalty;

    if dom::is_tag(node, "td") && is_middle_layout_cell(node, options) {
        score += t.layout_cell_bonus;
    }

    score
}

/// Right-floated or centered via inline style or `align`.
fn is_pulled_aside(node: &NodeRef) -> bool {
    let style: String = dom::get_attribute(node, "style")
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let align = dom::get_attribute(node, "align").unwrap_or_default().to_lowercase();

    style.contains("float:right")
        || style.contains("text-align:right")
        || style.contains("text-align:center")
        || align == "right"
        || align == "center"
}

/// A `td` that is neither the first nor the last cell of its row, inside a
/// table that looks like page layout rather than data.
fn is_middle_layout_cell(cell: &NodeRef, options: &Options) -> bool {
    let Some(table) = dom::closest(cell, "table") else {
        return false;
    };

    // Non-numeric widths read as zero.
    let width = dom::get_attribute(&table, "width")
        .and_then(|w| w.trim().parse::<i64>().ok())
        .unwrap_or(0);
    let align = dom::get_attribute(&table, "align").unwrap_or_default().to_lowercase();
    let class = dom::class_name(&table);

    let is_layout = width > options.thresholds.layout_table_width
        || align == "center"
        || class.contains("content")
        || class.contains("article");
    if !is_layout {
        return false;
    }

    let Some(row) = cell.parent() else {
        return false;
    };
    let cells: Vec<NodeRef> = dom::element_children(&row)
        .into_iter()
        .filter(|c| dom::is_tag(c, "td"))
        .collect();
    match cells.iter().position(|c| c.id == cell.id) {
        Some(index) => index > 0 && index + 1 < cells.len(),
        None => false,
    }
}

/// Pick the highest-scoring candidate, if it beats `min_score`.
///
/// Ties keep the first candidate seen.
#[must_use]
pub fn find_best_element<'a>(
    candidates: &[NodeRef<'a>],
    min_score: f64,
    options: &Options,
) -> Option<NodeRef<'a>> {
    let mut best: Option<ContentScore<'a>> = None;

    for candidate in candidates {
        let score = score_element(candidate, options);
        trace!(score, tag = ?dom::tag_name(candidate), "scored candidate");
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(ContentScore {
                score,
                element: *candidate,
            });
        }
    }

    best.filter(|b| b.score > min_score).map(|b| b.element)
}

/// True when a block should never be removed as boilerplate.
#[must_use]
pub fn is_likely_content(node: &NodeRef, options: &Options) -> bool {
    let t = &options.thresholds;

    if let Some(role) = dom::get_attribute(node, "role") {
        if CONTENT_ROLES.contains(&role.to_lowercase().as_str()) {
            return true;
        }
    }

    let class = dom::class_name(node);
    let id = dom::id(node);
    if CONTENT_INDICATORS
        .iter()
        .any(|indicator| class.contains(indicator) || id.contains(indicator))
    {
        return true;
    }

    let stats = BlockStats::collect(node);
    (stats.words > t.medium_words && stats.paragraphs > 1)
        || stats.words > t.long_words
        || (stats.words > t.short_words && stats.paragraphs > 0)
}

/// Score how much a block looks like navigation or chrome.
///
/// Zero means "no opinion"; negative means boilerplate.
#[must_use]
pub fn score_non_content_block(node: &NodeRef, options: &Options) -> f64 {
    let t = &options.thresholds;

    if dom::has_match(node, &options.footnote_list_selector()) {
        return 0.0;
    }

    let stats = BlockStats::collect(node);
    if stats.words < t.min_judged_words {
        return 0.0;
    }

    let mut score = 0.0;

    let text = stats.text.to_lowercase();
    for indicator in NAVIGATION_INDICATORS {
        if text.contains(indicator) {
            score -= t.navigation_penalty;
        }
    }

    if stats.link_density() > t.max_link_density {
        score -= t.link_density_penalty;
    }

    if stats.is_link_farm(t.link_farm_ratio) {
        score -= t.link_farm_penalty;
    }

    let class = dom::class_name(node);
    let id = dom::id(node);
    for pattern in NON_CONTENT_PATTERNS {
        if class.contains(pattern) || id.contains(pattern) {
            score -= t.non_content_class_penalty;
        }
    }
    if AD_TOKEN.is_match(&class) || AD_TOKEN.is_match(&id) {
        score -= t.non_content_class_penalty;
    }

    score
}

/// Remove every block under `root` that scores as boilerplate.
///
/// Candidates are collected over the whole tree first and removed in one
/// batch afterwards, so removals never disturb the walk. Returns the number
/// of removed blocks.
pub fn score_and_remove(root: &NodeRef, debug: bool, options: &Options) -> Result<usize> {
    options.validate()?;

    let mut to_remove: Vec<(NodeRef, f64)> = Vec::new();
    for block in dom::query_all(root, &options.block_selector()) {
        if is_likely_content(&block, options) {
            continue;
        }
        let score = score_non_content_block(&block, options);
        if score < 0.0 {
            to_remove.push((block, score));
        }
    }

    for (block, score) in &to_remove {
        if debug {
            debug!(
                tag = ?dom::tag_name(block),
                class = %dom::class_name(block),
                id = %dom::id(block),
                score,
                "removing non-content block"
            );
        }
        dom::remove(block);
    }

    debug!(removed = to_remove.len(), "score_and_remove finished");
    Ok(to_remove.len())
}
