//! Compiled regex patterns and keyword vocabularies for scoring and cleanup.
//!
//! All patterns are compiled once at startup using `LazyLock`.
//! Patterns are organized by the pass that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Scoring Patterns
// =============================================================================

/// Matches a month-name date such as "March 3, 2024" or "Jan 12 2023".
pub static MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}\b")
        .expect("MONTH_DATE regex")
});

/// Matches bylines: "By Jane Doe", "written by ...", "Author: ...".
pub static BYLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:by|written by|author:)\s+[A-Za-z\s]+\b").expect("BYLINE regex")
});

/// Class/id substrings that mark a block as likely content.
pub const CONTENT_INDICATORS: &[&str] = &[
    "admonition", "article", "content", "entry", "image", "img", "font", "figure",
    "figcaption", "pre", "main", "post", "story", "table",
];

/// Class substrings that earn the content-class bonus in `score_element`.
pub const CONTENT_CLASS_HINTS: &[&str] = &["content", "article", "post"];

/// Roles that mark a block as likely content.
pub const CONTENT_ROLES: &[&str] = &["article", "main", "contentinfo"];

/// Lower-cased phrases typical of navigation and site chrome.
pub const NAVIGATION_INDICATORS: &[&str] = &[
    "advertisement", "all rights reserved", "banner", "cookie", "comments", "copyright",
    "follow me", "follow us", "footer", "header", "homepage", "login", "menu",
    "more articles", "more like this", "most read", "nav", "navigation", "newsletter",
    "newsletter signup", "popular", "privacy", "recommended", "register", "related",
    "responses", "share", "sidebar", "sign in", "sign up", "signup", "social",
    "sponsored", "subscribe", "terms", "trending",
];

/// Class/id substrings typical of non-content blocks.
pub const NON_CONTENT_PATTERNS: &[&str] = &[
    "banner", "cookie", "copyright", "footer", "header", "homepage", "menu", "nav",
    "newsletter", "popular", "privacy", "recommended", "related", "rights", "share",
    "sidebar", "social", "sponsored", "subscribe", "terms", "trending", "widget",
];

/// Matches `ad`, `ads` or `advert*` as a whole class/id token, so words
/// like "lead", "header" or "download" do not count as ads.
pub static AD_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[\s_-])ad(?:s|vert\w*)?(?:$|[\s_-])").expect("AD_TOKEN regex")
});

// =============================================================================
// Flattening Patterns
// =============================================================================

/// Class names that mark a block as semantic (never flattened).
pub static SEMANTIC_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:article|main|content|footnote|reference|bibliography)")
        .expect("SEMANTIC_CLASS regex")
});

/// Class names of pure layout wrappers.
pub static WRAPPER_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:wrapper|container|layout|row|col|grid|flex|outer|inner|content-area)")
        .expect("WRAPPER_CLASS regex")
});

/// Roles that make a block semantic.
pub const SEMANTIC_ROLES: &[&str] = &["article", "main", "navigation", "banner", "contentinfo"];

// =============================================================================
// Element Rule Patterns
// =============================================================================

/// Matches an ordered-list label such as "1)".
pub static ORDERED_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\)").expect("ORDERED_LABEL regex")
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches runs of whitespace for heading comparison.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

/// Matches runs of non-breaking spaces.
pub static NBSP_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\u{a0}+").expect("NBSP_RUN regex")
});

/// Matches text made only of zero-width or invisible characters.
pub static INVISIBLE_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[\u{200c}\u{200b}\u{200d}\u{200e}\u{200f}\u{feff}]*$").expect("INVISIBLE_ONLY regex")
});

/// Matches 3+ consecutive newlines.
pub static MULTIPLE_NEWLINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("MULTIPLE_NEWLINES regex")
});

/// Matches leading newlines/tabs.
pub static LEADING_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\n\r\t]+").expect("LEADING_BREAKS regex")
});

/// Matches trailing newlines/tabs.
pub static TRAILING_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\n\r\t]+$").expect("TRAILING_BREAKS regex")
});

/// Matches a newline padded by spaces or tabs.
pub static PADDED_NEWLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]*\n[ \t]*").expect("PADDED_NEWLINE regex")
});

/// Matches 3+ consecutive spaces or tabs.
pub static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]{3,}").expect("SPACE_RUN regex")
});

/// Matches a node made only of spaces.
pub static ALL_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ +$").expect("ALL_SPACES regex")
});

/// Matches whitespace before punctuation.
pub static SPACE_BEFORE_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+([,.!?:;])").expect("SPACE_BEFORE_PUNCT regex")
});

/// Matches zero-width joiners and directional marks.
pub static ZERO_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{200c}\u{200b}\u{200d}\u{200e}\u{200f}\u{feff}]+").expect("ZERO_WIDTH regex")
});

/// Matches repeated non-breaking spaces.
pub static REPEATED_NBSP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("\u{a0}{2,}").expect("REPEATED_NBSP regex")
});

/// Matches boundary text a block element may drop (includes spaces).
pub static BLOCK_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[\n\r\t \u{200c}\u{200b}\u{200d}\u{200e}\u{200f}\u{feff}\u{a0}]*$")
        .expect("BLOCK_BOUNDARY regex")
});

/// Matches boundary text an inline element may drop (never spaces).
pub static INLINE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[\n\r\t\u{200c}\u{200b}\u{200d}\u{200e}\u{200f}\u{feff}]*$")
        .expect("INLINE_BOUNDARY regex")
});

/// Matches content starting with closing punctuation.
pub static STARTS_WITH_CLOSING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[,.!?:;)\]]").expect("STARTS_WITH_CLOSING regex")
});

/// Matches content ending with opening punctuation.
pub static ENDS_WITH_OPENING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[,.!?:;(\[]\s*$").expect("ENDS_WITH_OPENING regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_date_matches_long_and_short_months() {
        assert!(MONTH_DATE.is_match("Published March 3, 2024"));
        assert!(MONTH_DATE.is_match("jan 12 2023"));
        assert!(!MONTH_DATE.is_match("2024-03-03"));
    }

    #[test]
    fn byline_matches_common_forms() {
        assert!(BYLINE.is_match("Story by Jane Doe"));
        assert!(BYLINE.is_match("Author: Someone"));
        assert!(!BYLINE.is_match("nearby"));
    }

    #[test]
    fn wrapper_class_matches_layout_names() {
        assert!(WRAPPER_CLASS.is_match("page-wrapper"));
        assert!(WRAPPER_CLASS.is_match("Grid-Item"));
        assert!(!WRAPPER_CLASS.is_match("lede"));
    }

    #[test]
    fn ordered_label_requires_leading_numeral() {
        assert!(ORDERED_LABEL.is_match("1) first"));
        assert!(ORDERED_LABEL.is_match("12)"));
        assert!(!ORDERED_LABEL.is_match("• item"));
    }

    #[test]
    fn space_before_punct_is_stripped() {
        assert_eq!(SPACE_BEFORE_PUNCT.replace_all("hello , world !", "$1"), "hello, world!");
    }
}
