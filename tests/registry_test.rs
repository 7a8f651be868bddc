use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use page_distill::{
    dom, Extractor, ExtractorPattern, ExtractorRegistry, ExtractorResult, PageContext,
};

struct ExampleExtractor;

impl Extractor for ExampleExtractor {
    fn name(&self) -> &str {
        "example"
    }

    fn can_extract(&self, page: &PageContext<'_>) -> bool {
        page.document.select("div.story-body").exists()
    }

    fn extract(&self, page: &PageContext<'_>) -> ExtractorResult {
        let body = page.document.select("div.story-body");
        ExtractorResult {
            content_html: body.inner_html().to_string(),
            content_text: body.text().trim().to_string(),
            title: page
                .schema_org_data
                .and_then(|v| v.get("headline"))
                .and_then(|h| h.as_str())
                .map(str::to_string),
            extractor: self.name().to_string(),
            ..ExtractorResult::default()
        }
    }
}

fn counting_registry() -> (ExtractorRegistry, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut registry = ExtractorRegistry::new();
    registry.register(vec![ExtractorPattern::literal("example.com")], move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Arc::new(ExampleExtractor) as Arc<dyn Extractor>
    });
    (registry, calls)
}

#[test]
fn constructor_runs_once_per_hostname() {
    let (registry, calls) = counting_registry();
    let doc = dom::parse("<div class=\"story-body\"><p>Story</p></div>");

    let first = registry.find_extractor(&doc, "https://example.com/x", None).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let second = registry.find_extractor(&doc, "https://example.com/y", None).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(first.name(), second.name());
    assert_eq!(first.extract(), second.extract());
    assert!(Arc::ptr_eq(first.strategy(), second.strategy()));
}

#[test]
fn unmatched_host_returns_none_and_is_cached() {
    let (registry, calls) = counting_registry();
    let doc = dom::parse("");

    assert!(registry.find_extractor(&doc, "https://other.org", None).is_none());
    assert!(registry.find_extractor(&doc, "https://other.org/again", None).is_none());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(registry.cached_domains(), 1);
}

#[test]
fn urls_without_host_are_not_cached() {
    let (registry, _) = counting_registry();
    let doc = dom::parse("");

    assert!(registry.find_extractor(&doc, "example.com/no-scheme", None).is_none());
    assert!(registry.find_extractor(&doc, "file:///tmp/example.com.html", None).is_none());
    assert_eq!(registry.cached_domains(), 0);
}

#[test]
fn bound_extractor_sees_page_and_side_data() {
    let (registry, _) = counting_registry();
    let doc = dom::parse("<div class=\"story-body\"><p>Story text</p></div>");
    let schema = serde_json::json!({"@type": "NewsArticle", "headline": "Big News"});

    let extractor = registry
        .find_extractor(&doc, "https://www.example.com/news/1", Some(&schema))
        .unwrap();

    assert!(extractor.can_extract());
    assert_eq!(extractor.page().url, "https://www.example.com/news/1");
    let result = extractor.extract();
    assert_eq!(result.content_text, "Story text");
    assert_eq!(result.title.as_deref(), Some("Big News"));
    assert_eq!(result.extractor, "example");
}

#[test]
fn shared_registry_serves_many_threads() {
    let (registry, calls) = counting_registry();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let doc = dom::parse("<div class=\"story-body\">x</div>");
                let host = if i % 2 == 0 { "example.com" } else { "elsewhere.net" };
                let url = format!("https://{host}/{i}");
                registry.find_extractor(&doc, &url, None).is_some()
            })
        })
        .collect();

    let matched = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|m| *m)
        .count();

    assert_eq!(matched, 8);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.cached_domains(), 2);
}
