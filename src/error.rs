//! Error types shared by the solvers and execution policies.

/// Errors surfaced by solver configuration and search.
///
/// A search never returns partial results: it either yields a single legal
/// move or fails with one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Rejected solver configuration, reported synchronously by the setter.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The game collaborator broke its contract (for example, it reported no
    /// legal moves from a non-terminal state). The in-progress search is
    /// aborted because the tree statistics can no longer be trusted.
    #[error("game contract violation: {0}")]
    ContractViolation(String),

    /// `search()` was called on a state with no legal moves. Callers are
    /// expected to check for terminal states before asking for a move.
    #[error("no legal moves at the root state")]
    EmptyRoot,

    /// A parallel search worker failed; the merge step did not run.
    #[error("search worker {index} failed: {source}")]
    Worker {
        /// Index of the failing worker.
        index: usize,
        /// The error raised by that worker.
        #[source]
        source: Box<SearchError>,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SearchError>;
