//! Atomic boundary around multi-owner mutations.

use super::{AtomicWriter, TransactionAborted, UnitOfWork};
use std::sync::Arc;

/// Runs a unit of work so that it commits or rolls back as a whole.
///
/// The work closure performs the in-memory list and field mutations and
/// stages the resulting writes. An error from the closure discards the
/// staged writes untouched; a failed commit is logged with its cause and
/// reported as [`TransactionAborted`]. Aborts are never retried here.
pub struct TransactionalMover<W>
where
    W: AtomicWriter,
{
    writer: Arc<W>,
}

impl<W> Clone for TransactionalMover<W>
where
    W: AtomicWriter,
{
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
        }
    }
}

impl<W> TransactionalMover<W>
where
    W: AtomicWriter,
{
    /// Creates a mover committing through `writer`.
    #[must_use]
    pub const fn new(writer: Arc<W>) -> Self {
        Self { writer }
    }

    /// Runs `work` and commits what it staged as one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns the closure's own error unchanged, or
    /// [`TransactionAborted`] (converted into `E`) when the commit fails.
    pub async fn run_atomic<T, E, F>(&self, operation: &'static str, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut UnitOfWork) -> Result<T, E>,
        E: From<TransactionAborted>,
    {
        let mut unit = UnitOfWork::new();
        let output = work(&mut unit)?;
        if unit.is_empty() {
            return Ok(output);
        }

        let writes = unit.len();
        if let Err(err) = self.writer.commit(unit).await {
            tracing::error!(operation, writes, error = %err, "unit of work aborted");
            return Err(TransactionAborted::new(operation).into());
        }

        tracing::debug!(operation, writes, "unit of work committed");
        Ok(output)
    }
}
