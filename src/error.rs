//! Error types for query construction, chain wiring and database access.

use thiserror::Error;

/// Result type for browser operations.
pub type BrowserResult<T> = Result<T, BrowserError>;

/// Failures raised while building or running linked list queries.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Table or column name outside the identifier allowlist.
    #[error("invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Stage index that does not exist in the chain.
    #[error("unknown stage index {0}")]
    UnknownStage(usize),

    /// Rejected upstream/downstream link.
    #[error("invalid link from stage {upstream} to stage {downstream}: {reason}")]
    InvalidLink {
        upstream: usize,
        downstream: usize,
        reason: &'static str,
    },

    /// A non-root stage was configured without the column its upstream filters on.
    #[error("stage {0} follows another stage but has no link_column")]
    MissingLinkColumn(usize),

    /// Query preparation or execution failure reported by SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
