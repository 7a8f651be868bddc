//! Error types for page-distill.
//!
//! Most of the engine is infallible by construction: missing selector matches
//! yield empty results and malformed numeric attributes read as zero. The
//! variants below cover the few places where injected configuration or a
//! broken loop invariant can genuinely go wrong.

/// Error type for scoring, standardization and extractor dispatch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An injected CSS selector failed to compile.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// An extractor URL pattern failed to compile as a regex.
    #[error("invalid extractor pattern: {0}")]
    InvalidPattern(String),

    /// A fixed-point pass exceeded its iteration cap.
    ///
    /// Every iteration of such a pass removes a node or reduces nesting, so
    /// hitting the cap means a classification rule undid another's work.
    #[error("{pass} did not reach a fixed point after {iterations} iterations")]
    FixedPointNotReached {
        /// Name of the pass that looped.
        pass: &'static str,
        /// Iterations performed before giving up.
        iterations: usize,
    },

    /// Options could not be loaded from JSON.
    #[error("invalid options: {0}")]
    Config(String),
}

/// Result type alias for page-distill operations.
pub type Result<T> = std::result::Result<T, Error>;
