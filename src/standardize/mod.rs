//! Content Standardization
//!
//! Canonicalizes an already-chosen content subtree into a small vocabulary
//! of tags. The pipeline is an ordered list of passes over the same tree:
//!
//! ```text
//! spaces → comments → headings → footnotes → element rules
//!   → flatten → attributes → empty elements → trailing headings
//!   → flatten → extra <br> → empty lines
//! ```
//!
//! Debug mode keeps the structure inspectable and only runs the attribute,
//! trailing-heading and `<br>` passes after the element rules.
//!
//! Passes are independent cleanups. One that fails (an invalid injected
//! selector, a fixed-point loop that hit its cap) is logged and skipped, and
//! the rest still run.

mod attributes;
mod cleanup;
mod flatten;
mod footnotes;
mod headings;
mod rules;
mod spaces;
mod whitespace;

pub use attributes::strip_unwanted_attributes;
pub use cleanup::{
    remove_comments, remove_empty_elements, remove_trailing_headings, strip_extra_br_elements,
};
pub use flatten::{flatten_wrapper_elements, Flattener};
pub use footnotes::standardize_footnotes;
pub use headings::{normalize_text, standardize_headings};
pub use rules::{
    apply_rules, standardize_elements, RuleAction, StandardizationRule, Transform, RULES,
};
pub use spaces::standardize_spaces;
pub use whitespace::{normalize_text_payload, remove_empty_lines};

use tracing::{debug, warn};

use crate::dom::NodeRef;
use crate::error::Result;
use crate::options::Options;

/// What a standardization run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardizeReport {
    /// Passes that ran, with their mutation counts, in execution order.
    pub passes: Vec<(&'static str, usize)>,
    /// Passes that failed and were skipped, with the error message.
    pub skipped: Vec<(&'static str, String)>,
}

impl StandardizeReport {
    /// Sum of mutations over all passes that ran.
    #[must_use]
    pub fn total_mutations(&self) -> usize {
        self.passes.iter().map(|(_, n)| n).sum()
    }

    /// True when every pass ran.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn run<F>(&mut self, name: &'static str, pass: F)
    where
        F: FnOnce() -> Result<usize>,
    {
        match pass() {
            Ok(count) => {
                debug!(pass = name, mutations = count, "standardize pass");
                self.passes.push((name, count));
            }
            Err(e) => {
                warn!(pass = name, error = %e, "standardize pass skipped");
                self.skipped.push((name, e.to_string()));
            }
        }
    }
}

/// Standardize the content subtree under `root` in place.
///
/// `title` is the resolved page title, used to drop a duplicate opening
/// heading. `debug` selects the structure-preserving variant.
///
/// # Example
///
/// ```
/// use page_distill::{dom, standardize_content, Options};
///
/// let doc = dom::parse("<body><div class=\"wrapper\"><h1>Title</h1><p>Body</p></div></body>");
/// let body = dom::body(&doc).unwrap();
///
/// let report = standardize_content(&body, "Title", false, &Options::default());
///
/// assert!(report.is_complete());
/// assert_eq!(doc.select("body").inner_html().to_string(), "<p>Body</p>");
/// ```
pub fn standardize_content(
    root: &NodeRef,
    title: &str,
    debug: bool,
    options: &Options,
) -> StandardizeReport {
    let mut report = StandardizeReport::default();

    report.run("standardize_spaces", || Ok(standardize_spaces(root)));
    report.run("remove_comments", || Ok(remove_comments(root)));
    report.run("standardize_headings", || {
        Ok(standardize_headings(root, title, options))
    });
    report.run("standardize_footnotes", || standardize_footnotes(root, options));
    report.run("standardize_elements", || Ok(standardize_elements(root, options)));

    if debug {
        report.run("strip_unwanted_attributes", || {
            Ok(strip_unwanted_attributes(root, true, options))
        });
        report.run("remove_trailing_headings", || Ok(remove_trailing_headings(root)));
        report.run("strip_extra_br_elements", || Ok(strip_extra_br_elements(root)));
        return report;
    }

    report.run("flatten_wrapper_elements", || flatten_wrapper_elements(root, options));
    report.run("strip_unwanted_attributes", || {
        Ok(strip_unwanted_attributes(root, false, options))
    });
    report.run("remove_empty_elements", || remove_empty_elements(root, options));
    report.run("remove_trailing_headings", || Ok(remove_trailing_headings(root)));
    report.run("flatten_wrapper_elements", || flatten_wrapper_elements(root, options));
    report.run("strip_extra_br_elements", || Ok(strip_extra_br_elements(root)));
    report.run("remove_empty_lines", || Ok(remove_empty_lines(root, options)));

    report
}
