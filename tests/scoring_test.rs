use page_distill::scoring::{is_likely_content, score_non_content_block};
use page_distill::{dom, find_best_element, score_and_remove, score_element, Options};

fn paragraphs(count: usize, words_each: usize, linked_words: usize) -> String {
    let mut html = String::from("<div>");
    let mut linked = 0;
    for p in 0..count {
        html.push_str("<p>");
        for w in 0..words_each {
            let word = format!("word{p}x{w} ");
            if linked < linked_words {
                html.push_str(&format!("<a href=\"/l{linked}\">{word}</a>"));
                linked += 1;
            } else {
                html.push_str(&word);
            }
        }
        html.push_str("</p>");
    }
    html.push_str("</div>");
    html
}

#[test]
fn link_density_lowers_otherwise_identical_element() {
    let few = dom::parse(&paragraphs(5, 40, 1));
    let many = dom::parse(&paragraphs(5, 40, 30));
    let opts = Options::default();

    let few_div = *few.select("div").nodes().first().unwrap();
    let many_div = *many.select("div").nodes().first().unwrap();

    assert_eq!(dom::word_count(&few_div), 200);
    assert_eq!(dom::word_count(&many_div), 200);
    assert!(score_element(&few_div, &opts) > score_element(&many_div, &opts));
}

#[test]
fn best_element_must_beat_min_score() {
    let doc = dom::parse(&format!(
        "<body>{}<section><p>short</p></section></body>",
        paragraphs(3, 30, 0)
    ));
    let candidates = dom::descendant_elements(&dom::body(&doc).unwrap())
        .into_iter()
        .filter(|n| dom::is_any_tag(n, &["div", "section"]))
        .collect::<Vec<_>>();
    let opts = Options::default();

    let best = find_best_element(&candidates, 50.0, &opts).unwrap();
    assert!(dom::is_tag(&best, "div"));

    assert!(find_best_element(&candidates, 10_000.0, &opts).is_none());
}

#[test]
fn boilerplate_blocks_are_removed_in_one_batch() {
    let doc = dom::parse(
        r#"<body>
          <div class="sidebar-widget"><ul>
            <li><a href="/1">Popular one</a></li><li><a href="/2">Popular two</a></li>
          </ul></div>
          <div class="story"><p>The article body stays in place.</p></div>
          <aside id="newsletter">Subscribe to our newsletter for updates</aside>
          <footer>Copyright 2024, all rights reserved</footer>
        </body>"#,
    );
    let body = dom::body(&doc).unwrap();

    let removed = score_and_remove(&body, true, &Options::default()).unwrap();

    assert_eq!(removed, 3);
    let text = body.text().to_string();
    assert!(text.contains("The article body stays in place."));
    assert!(!text.contains("Popular"));
    assert!(!text.contains("Subscribe"));
    assert!(!text.contains("Copyright"));
}

#[test]
fn likely_content_is_never_removed() {
    let html = r#"<body>
        <div role="main"><a href="/a">Share</a> <a href="/b">Subscribe</a> <a href="/c">Menu</a></div>
        <div class="entry-nav"><a href="/1">Next</a> <a href="/2">Previous</a> <a href="/3">Home</a></div>
        <section><p>Cookie notice text that is quite long, with many words about privacy,
          terms, sign in, sign up, and other things that would normally look like a footer.</p>
          <p>Still more words so that the block counts as dense content here.</p></section>
        <nav><a href="/x">Login</a> <a href="/y">Register</a> <a href="/z">Menu</a></nav>
    </body>"#;
    let doc = dom::parse(html);
    let body = dom::body(&doc).unwrap();
    let opts = Options::default();

    let blocks = dom::query_all(&body, &opts.block_selector());
    let likely: Vec<_> = blocks
        .iter()
        .filter(|b| is_likely_content(b, &opts))
        .map(|b| b.id)
        .collect();
    assert_eq!(likely.len(), 3);

    score_and_remove(&body, false, &opts).unwrap();

    for id in likely {
        let node = blocks.iter().find(|b| b.id == id).unwrap();
        assert!(dom::is_within(node, &body));
    }
    assert_eq!(doc.select("nav").length(), 0);
}

#[test]
fn footnote_lists_are_exempt_from_removal() {
    let doc = dom::parse(
        r##"<body><div class="footnotes"><ol>
          <li id="fn:1"><a href="#a">Link</a> <a href="#b">Link</a></li>
        </ol></div></body>"##,
    );
    let body = dom::body(&doc).unwrap();
    let footnotes = *doc.select("div").nodes().first().unwrap();

    assert_eq!(score_non_content_block(&footnotes, &Options::default()), 0.0);
    assert_eq!(score_and_remove(&body, false, &Options::default()).unwrap(), 0);
}

#[test]
fn lead_summary_is_not_mistaken_for_an_ad() {
    let doc = dom::parse(r#"<body><div class="lead">A short summary of the whole story.</div><p>x</p></body>"#);
    let body = dom::body(&doc).unwrap();

    let removed = score_and_remove(&body, false, &Options::default()).unwrap();

    assert_eq!(removed, 0);
    assert_eq!(doc.select("div.lead").length(), 1);
}

#[test]
fn prose_links_next_to_a_plain_list_are_kept() {
    let doc = dom::parse(
        r#"<body><div><ul><li>plain item</li></ul> some prose text here with
          <a href="/1">one</a> <a href="/2">two</a> <a href="/3">three</a> <a href="/4">four</a></div></body>"#,
    );
    let body = dom::body(&doc).unwrap();

    assert_eq!(score_and_remove(&body, false, &Options::default()).unwrap(), 0);
    assert!(body.text().contains("plain item"));
}
