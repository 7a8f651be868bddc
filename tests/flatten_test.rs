use page_distill::standardize::flatten_wrapper_elements;
use page_distill::{dom, Options};

fn flatten(html: &str) -> String {
    let doc = dom::parse(&format!("<body>{html}</body>"));
    let body = dom::body(&doc).unwrap();
    flatten_wrapper_elements(&body, &Options::default()).unwrap();
    doc.select("body").inner_html().to_string()
}

#[test]
fn wrapper_divs_collapse_to_paragraphs() {
    assert_eq!(
        flatten(r#"<div class="wrapper"><div><p>Hello</p><p>World</p></div></div>"#),
        "<p>Hello</p><p>World</p>"
    );
}

#[test]
fn deep_layout_nesting_is_removed() {
    let html = r#"<main><div class="grid"><div class="row"><div class="col-8"><div class="inner">
        <p>One</p></div></div></div></div></main>"#;

    let out = flatten(html);

    assert!(!out.contains("grid"));
    assert!(!out.contains("inner"));
    assert!(out.contains("<p>One</p>"));
}

#[test]
fn semantic_containers_are_preserved() {
    let html = r#"<div class="bibliography"><p>Ref</p></div><div role="navigation"><p>Nav</p></div><div><blockquote>Quote</blockquote></div>"#;

    assert_eq!(flatten(html), html);
}

#[test]
fn wrapper_inside_text_block_is_unwrapped() {
    assert_eq!(
        flatten("<p>lead</p><section>intro <div><p>a</p></div></section>"),
        "<p>lead</p><section>intro <p>a</p></section>"
    );
}

#[test]
fn flatten_is_idempotent() {
    let fixtures = [
        r#"<div class="wrapper"><div><p>Hello</p><p>World</p></div></div>"#,
        r#"<article><header><div><h2>T</h2></div></header><div class="body"><div>text <b>b</b></div><ul><li>x</li></ul></div></article>"#,
        r#"<div><div><div></div></div><span>s</span></div><section><div>t</div><table><tr><td>c</td></tr></table></section>"#,
    ];

    for fixture in fixtures {
        let doc = dom::parse(&format!("<body>{fixture}</body>"));
        let body = dom::body(&doc).unwrap();
        let opts = Options::default();

        flatten_wrapper_elements(&body, &opts).unwrap();
        let once = doc.select("body").inner_html().to_string();

        let second = flatten_wrapper_elements(&body, &opts).unwrap();
        assert_eq!(second, 0, "second run changed {fixture}");
        assert_eq!(doc.select("body").inner_html().to_string(), once);
    }
}
