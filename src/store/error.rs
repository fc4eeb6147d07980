//! Error types for store adapters and units of work.

use crate::error::EntityRef;
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store adapters.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// An insert collided with an existing document.
    #[error("duplicate {0}")]
    Duplicate(EntityRef),

    /// A write targeted a document that does not exist.
    #[error("missing {0}")]
    Missing(EntityRef),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// A unit of work could not be committed and none of its writes applied.
///
/// The underlying cause is logged where the commit fails and deliberately
/// not carried to callers.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("transaction aborted during {operation}")]
pub struct TransactionAborted {
    operation: &'static str,
}

impl TransactionAborted {
    /// Creates the error for the named operation.
    #[must_use]
    pub const fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    /// Returns the operation whose unit of work was aborted.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }
}
