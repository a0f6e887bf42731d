//! Error taxonomy for the workflow engine.
//!
//! These errors never cross the orchestrator boundary: every public
//! dispatch entry point converts them into an `ActionResult` failure.
//! The variant decides whether that conversion also appends an audit
//! activity record.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or invalid action configuration, detected before any
    /// side effect is performed.
    #[error("{0}")]
    Validation(String),

    /// A referenced client/task/document/template/user is absent.
    #[error("{0}")]
    NotFound(String),

    /// A referenced record belongs to a different client than the one
    /// that triggered the workflow.
    #[error("{0}")]
    Ownership(String),

    /// The data store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Encrypt/decrypt failure on client contact fields.
    #[error("encryption error: {0}")]
    Crypto(String),

    /// An outbound call (webhook, SMTP) failed.
    #[error("{0}")]
    External(String),

    /// Anything unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Whether converting this failure into an `ActionResult` should
    /// also leave an audit activity. Failures caught before any side
    /// effect (bad config, missing or foreign records) do not.
    pub fn audit_on_failure(&self) -> bool {
        !matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::Ownership(_)
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the persistence layer. "Not found" is not an
/// error; lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("corrupt record: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
