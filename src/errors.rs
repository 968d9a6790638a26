//! Error types for co-occurrence extraction.

use thiserror::Error;

/// Errors that can occur while building co-occurrence artifacts.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// An alias file entry that does not follow the `_name)` convention.
    #[error("malformed alias entry at line {line}: {content:?}")]
    MalformedAlias { line: usize, content: String },

    /// The reranker had nothing meaningful to weight.
    #[error(transparent)]
    Rerank(#[from] RerankError),
}

/// Errors produced by the term-weighting reranker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RerankError {
    /// Too few rows or no columns to weight.
    #[error("degenerate co-occurrence matrix ({rows} rows x {columns} columns)")]
    DegenerateMatrix { rows: usize, columns: usize },
}

/// Result type for co-occurrence operations.
pub type NarrativeResult<T> = Result<T, NarrativeError>;
