//! Commit-deferred side effects.
//!
//! Actions never perform outbound work directly. They register [`Operation`]
//! values against the transaction's [`UnitOfWork`]; the operations fire in
//! registration order only after the caller has committed the primary state
//! change. Operations are descriptions of work, not work itself: the same
//! discipline as effect values returned from a reducer.

use crate::error::DeliveryError;
use smallvec::SmallVec;
use tracing::{debug, error};

/// A side effect deferred until the surrounding transaction commits.
pub trait Operation: Send + Sync {
    /// Stable operation kind, used for logging and test assertions.
    fn kind(&self) -> &'static str;

    /// Execute the deferred work. Called exactly once, after commit.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] when the work fails. The failure is
    /// logged by the unit-of-work and isolated from sibling operations; it
    /// never reaches the original caller, since the transaction has already
    /// concluded.
    fn on_post_commit(&self) -> Result<(), DeliveryError>;
}

/// A transaction-scoped registry of deferred operations.
///
/// Two-phase protocol: phase 1 (synchronous action execution) registers
/// operations; phase 2 runs them, in registration order, when [`commit`]
/// is called after the primary persistence change succeeded. Dropping the
/// unit-of-work without committing discards every registered operation, so
/// a failed transaction leaks no partial effects.
///
/// [`commit`]: UnitOfWork::commit
#[derive(Default)]
pub struct UnitOfWork {
    operations: SmallVec<[Box<dyn Operation>; 4]>,
}

impl UnitOfWork {
    /// Create an empty unit-of-work.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation to run after commit.
    pub fn register(&mut self, operation: Box<dyn Operation>) {
        debug!(kind = operation.kind(), "registered post-commit operation");
        self.operations.push(operation);
    }

    /// The operations registered so far, in registration order.
    #[must_use]
    pub fn operations(&self) -> &[Box<dyn Operation>] {
        &self.operations
    }

    /// Run every registered operation in registration order.
    ///
    /// Call this only after the primary state change has been persisted.
    /// A failing operation is logged and does not prevent later operations
    /// from running, and it cannot roll back the committed change.
    pub fn commit(self) {
        for operation in &self.operations {
            if let Err(err) = operation.on_post_commit() {
                error!(kind = operation.kind(), %err, "post-commit operation failed");
            }
        }
    }

    /// Discard every registered operation without running any of them.
    pub fn rollback(self) {
        debug!(
            discarded = self.operations.len(),
            "unit of work rolled back"
        );
    }
}
