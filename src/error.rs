//! Crate-wide error type.

/// The error type for every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid grammar text: {0}")]
    /// The grammar text violates the documented production-line syntax.
    InvalidGrammarText(String),
    #[error("invalid regex: {0}")]
    /// The regex text is malformed or uses an undocumented operator.
    InvalidRegex(String),
    #[error("invalid graph: node {0} referenced by a start/final filter does not exist")]
    /// A start/final node filter referenced a node absent from the graph.
    InvalidGraph(usize),
    #[error("dimension mismatch: {0}")]
    /// An internal sparse boolean matrix operation saw incompatible shapes.
    DimensionMismatch(String),
    #[error("query was cancelled before a fixed point was reached")]
    /// The caller's cancel token fired between fixed-point sweeps.
    Cancelled,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
