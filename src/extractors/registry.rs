//! URL → strategy dispatch with a per-hostname cache.
//!
//! Mappings are scanned in registration order and the first match wins. The
//! outcome is memoized per hostname, misses included, so repeated lookups for
//! the same site never rescan. The cache is a [`DashMap`], so one registry can
//! serve lookups from many threads at once.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use regex::Regex;
use tracing::{debug, trace};
use url::Url;

use super::{BoundExtractor, Extractor, PageContext};
use crate::dom::Document;
use crate::error::{Error, Result};

/// Builds a strategy instance. Runs at most once per hostname between cache clears.
pub type ExtractorConstructor = Arc<dyn Fn() -> Arc<dyn Extractor> + Send + Sync>;

/// One way a mapping can match a URL.
#[derive(Debug, Clone)]
pub enum ExtractorPattern {
    /// Matches when the hostname contains the (lower-cased) text.
    Literal(String),
    /// Matches against the full URL.
    Regex(Regex),
}

impl ExtractorPattern {
    #[must_use]
    pub fn literal(text: &str) -> Self {
        Self::Literal(text.to_lowercase())
    }

    /// Compile a URL pattern.
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| Error::InvalidPattern(format!("{pattern}: {e}")))
    }

    fn matches(&self, host: &str, url: &str) -> bool {
        match self {
            Self::Literal(text) => host.contains(text.as_str()),
            Self::Regex(re) => re.is_match(url),
        }
    }
}

impl From<&str> for ExtractorPattern {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

struct ExtractorMapping {
    patterns: Vec<ExtractorPattern>,
    constructor: ExtractorConstructor,
}

/// Ordered URL-pattern → strategy mappings plus the hostname cache.
#[derive(Default)]
pub struct ExtractorRegistry {
    mappings: Vec<ExtractorMapping>,
    cache: DashMap<String, Option<Arc<dyn Extractor>>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapping. Earlier registrations win on ambiguous URLs.
    pub fn register<F>(&mut self, patterns: Vec<ExtractorPattern>, constructor: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn Extractor> + Send + Sync + 'static,
    {
        self.mappings.push(ExtractorMapping {
            patterns,
            constructor: Arc::new(constructor),
        });
        self
    }

    /// Find the strategy for `url`, bound to this page.
    ///
    /// Returns `None` when the URL has no hostname, cannot be parsed, or no
    /// mapping matches. Only the last case is cached.
    pub fn find_extractor<'a>(
        &self,
        document: &'a Document,
        url: &'a str,
        schema_org_data: Option<&'a serde_json::Value>,
    ) -> Option<BoundExtractor<'a>> {
        let Some(host) = hostname(url) else {
            debug!(url, "no hostname, skipping extractor lookup");
            return None;
        };

        let cached = self.cache.get(&host).map(|entry| entry.value().clone());
        let extractor = match cached {
            Some(hit) => {
                trace!(host = %host, "extractor cache hit");
                hit
            }
            None => self
                .cache
                .entry(host.clone())
                .or_insert_with(|| self.scan(&host, url))
                .value()
                .clone(),
        }?;

        Some(BoundExtractor::new(
            extractor,
            PageContext {
                document,
                url,
                schema_org_data,
            },
        ))
    }

    fn scan(&self, host: &str, url: &str) -> Option<Arc<dyn Extractor>> {
        for mapping in &self.mappings {
            if mapping.patterns.iter().any(|p| p.matches(host, url)) {
                let extractor = (mapping.constructor)();
                debug!(host, extractor = extractor.name(), "extractor matched");
                return Some(extractor);
            }
        }
        debug!(host, "no extractor matched");
        None
    }

    /// Forget every cached hostname; later lookups rescan the mappings.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of hostnames in the cache, misses included.
    #[must_use]
    pub fn cached_domains(&self) -> usize {
        self.cache.len()
    }

    /// Number of registered mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("mappings", &self.mappings.len())
            .field("cached_domains", &self.cache.len())
            .finish()
    }
}

fn hostname(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_lowercase)
}
