//! Error types for feature extraction.

use thiserror::Error;

/// Errors raised while building chapter inputs or selecting extracters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// Two extracters registered under the same key.
    #[error("extracter already registered: {key}")]
    DuplicateExtracter { key: String },

    /// A requested key has no registered extracter.
    #[error("unknown extracter: {key}")]
    UnknownExtracter { key: String },

    /// Quote flags and quote span lists disagree on paragraph count.
    #[error("{flags} quote flags but {spans} quote span lists")]
    LengthMismatch { flags: usize, spans: usize },

    /// A paragraph's flat start/end list has odd length.
    #[error("paragraph {paragraph}: quote span list has odd length {len}")]
    OddSpanList { paragraph: usize, len: usize },

    /// A quote span ends before it starts.
    #[error("paragraph {paragraph}: quote span [{start}, {end}] is inverted")]
    InvertedSpan {
        paragraph: usize,
        start: usize,
        end: usize,
    },
}

/// Result type for feature operations.
pub type FeatureResult<T> = Result<T, FeatureError>;
