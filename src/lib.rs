//! # page-distill
//!
//! Content scoring and DOM canonicalization for readable web page extraction.
//!
//! The crate works on an already-parsed [`dom_query`] tree and has three parts:
//!
//! - **Scoring** ([`scoring`]): ranks candidate content roots and strips
//!   blocks that look like navigation, ads and other site chrome.
//! - **Standardization** ([`standardize`]): rewrites a chosen content subtree
//!   into a small, predictable tag vocabulary (headings, footnotes, ARIA
//!   lists, wrapper flattening, attribute allow-listing, whitespace).
//! - **Extractor dispatch** ([`extractors`]): maps URLs to site-specific
//!   strategies, falling back to the generic path when none match.
//!
//! ## Quick Start
//!
//! ```rust
//! use page_distill::{clean_document, dom, ExtractorRegistry, Options};
//!
//! let doc = dom::parse(r#"<html><body>
//!   <div class="wrapper"><div class="inner">
//!     <h1>My Article</h1>
//!     <p>Main content here, long enough to keep.</p>
//!   </div></div>
//! </body></html>"#);
//!
//! let registry = ExtractorRegistry::new();
//! let result = clean_document(&doc, "https://example.com/a", "My Article", &registry, &Options::default())?;
//!
//! assert_eq!(result.extractor, "generic");
//! assert_eq!(result.content_html, "<p>Main content here, long enough to keep.</p>");
//! # Ok::<(), page_distill::Error>(())
//! ```

mod error;
mod options;
mod patterns;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Subtree word, link and image statistics.
pub mod link_density;

/// Content scoring and boilerplate removal.
pub mod scoring;

/// Content subtree standardization passes.
pub mod standardize;

/// Site-specific extractor dispatch.
pub mod extractors;

// Public API - re-exports
pub use error::{Error, Result};
pub use extractors::{
    BoundExtractor, Extractor, ExtractorPattern, ExtractorRegistry, ExtractorResult, PageContext,
};
pub use options::{Options, Thresholds};
pub use scoring::{find_best_element, score_and_remove, score_element, ContentScore};
pub use standardize::{standardize_content, StandardizeReport};

use tracing::debug;

/// Clean a parsed page.
///
/// When `registry` has a strategy for `url` that recognizes the page, its
/// result is returned as is. Otherwise boilerplate blocks are scored away
/// over the whole document and the `body` is standardized as the content
/// root; `title` is used to drop a heading that repeats it.
///
/// Fails only when `options` carries an invalid selector.
///
/// # Example
///
/// ```rust
/// use page_distill::{clean_document, dom, ExtractorRegistry, Options};
///
/// let doc = dom::parse("<body><nav><a href=\"/\">Home</a> <a href=\"/about\">About us</a> <a href=\"/x\">More here</a></nav><p>Text.</p></body>");
/// let result = clean_document(&doc, "https://example.com/", "", &ExtractorRegistry::new(), &Options::default())?;
///
/// assert_eq!(result.content_html, "<p>Text.</p>");
/// # Ok::<(), page_distill::Error>(())
/// ```
pub fn clean_document(
    document: &dom::Document,
    url: &str,
    title: &str,
    registry: &ExtractorRegistry,
    options: &Options,
) -> Result<ExtractorResult> {
    if let Some(extractor) = registry.find_extractor(document, url, None) {
        if extractor.can_extract() {
            debug!(url, extractor = extractor.name(), "using site extractor");
            return Ok(extractor.extract());
        }
        debug!(url, extractor = extractor.name(), "site extractor declined, using generic path");
    }

    let title = title.trim();
    let mut result = ExtractorResult {
        title: (!title.is_empty()).then(|| title.to_string()),
        extractor: "generic".to_string(),
        ..ExtractorResult::default()
    };

    let Some(body) = dom::body(document) else {
        return Ok(result);
    };

    score_and_remove(&body, false, options)?;
    let report = standardize_content(&body, title, false, options);
    debug!(
        mutations = report.total_mutations(),
        skipped = report.skipped.len(),
        "generic extraction finished"
    );

    result.content_html = dom::Selection::from(body).inner_html().to_string();
    result.content_text = dom::text_content(&body).trim().to_string();
    Ok(result)
}
