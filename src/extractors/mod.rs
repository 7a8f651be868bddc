//! Site-Specific Extraction
//!
//! Some sites are better served by a dedicated strategy than by the generic
//! scorer. A strategy implements [`Extractor`]; the [`ExtractorRegistry`]
//! maps URLs to strategies and decides whether the generic path runs at all.

mod registry;

pub use registry::{ExtractorConstructor, ExtractorPattern, ExtractorRegistry};

use std::fmt;
use std::sync::Arc;

use crate::dom::Document;

/// Everything a strategy may look at for one page.
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    /// The parsed page.
    pub document: &'a Document,
    /// The page URL as given to the registry.
    pub url: &'a str,
    /// Schema.org data already pulled from the page, if any.
    pub schema_org_data: Option<&'a serde_json::Value>,
}

impl fmt::Debug for PageContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("url", &self.url)
            .field("schema_org_data", &self.schema_org_data.is_some())
            .finish_non_exhaustive()
    }
}

/// What a strategy hands back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractorResult {
    /// Cleaned content markup.
    pub content_html: String,
    /// Plain text of the content.
    pub content_text: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published: Option<String>,
    /// Name of the strategy (or `"generic"`) that produced the result.
    pub extractor: String,
}

/// A site-specific extraction strategy.
///
/// Strategies are stateless and shared between threads; all per-page data
/// arrives through [`PageContext`].
pub trait Extractor: Send + Sync {
    /// Short identifier, used in logs and [`ExtractorResult::extractor`].
    fn name(&self) -> &str;

    /// Whether the page has the markup this strategy expects.
    fn can_extract(&self, page: &PageContext<'_>) -> bool;

    /// Extract the page.
    fn extract(&self, page: &PageContext<'_>) -> ExtractorResult;
}

/// A strategy bound to the page it was looked up for.
#[derive(Clone)]
pub struct BoundExtractor<'a> {
    extractor: Arc<dyn Extractor>,
    page: PageContext<'a>,
}

impl<'a> BoundExtractor<'a> {
    pub(crate) fn new(extractor: Arc<dyn Extractor>, page: PageContext<'a>) -> Self {
        Self { extractor, page }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.extractor.name()
    }

    #[must_use]
    pub fn can_extract(&self) -> bool {
        self.extractor.can_extract(&self.page)
    }

    #[must_use]
    pub fn extract(&self) -> ExtractorResult {
        self.extractor.extract(&self.page)
    }

    /// The page this strategy is bound to.
    #[must_use]
    pub fn page(&self) -> &PageContext<'a> {
        &self.page
    }

    /// The shared strategy instance.
    #[must_use]
    pub fn strategy(&self) -> &Arc<dyn Extractor> {
        &self.extractor
    }
}

impl fmt::Debug for BoundExtractor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundExtractor")
            .field("name", &self.name())
            .field("page", &self.page)
            .finish()
    }
}
