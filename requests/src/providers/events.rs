//! Request event log interface and the in-memory implementation.
//!
//! The event log records timeline entries (comments, state changes) for a
//! request. Only the comment entry type is produced by this crate: the
//! audit comment appended when a guest request is accepted.

use record_access_core::{Identity, RequestId, Result, UnitOfWork};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Type of a request timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    /// A comment on the request timeline.
    Comment,
}

/// A recorded timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEvent {
    /// The request this entry belongs to.
    pub request_id: RequestId,
    /// Author; `"system"` for entries created by the system identity.
    pub author: String,
    /// Entry content (HTML for comments).
    pub content: String,
    /// Entry type.
    pub event_type: EventType,
    /// Whether a notification should be sent for this entry.
    pub notify: bool,
}

/// The event log service consumed by access-request actions.
pub trait EventLogService: Send + Sync {
    /// Append an entry to a request's timeline.
    ///
    /// The unit-of-work is passed through so implementations can defer
    /// their own notification side effects behind the same commit.
    ///
    /// # Errors
    ///
    /// Returns a [`record_access_core::RequestError`] when the entry
    /// cannot be appended.
    fn create(
        &self,
        identity: &Identity,
        request_id: RequestId,
        content: &str,
        event_type: EventType,
        uow: &mut UnitOfWork,
        notify: bool,
    ) -> Result<()>;
}

/// In-memory event log for tests and development.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<RequestEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty event log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded entries, in creation order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned, which only happens after a
    /// panic on another thread.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn events(&self) -> Vec<RequestEvent> {
        self.events.lock().expect("event lock poisoned").clone()
    }
}

impl EventLogService for InMemoryEventLog {
    #[allow(clippy::expect_used)] // lock poisoning only follows a prior panic
    fn create(
        &self,
        identity: &Identity,
        request_id: RequestId,
        content: &str,
        event_type: EventType,
        _uow: &mut UnitOfWork,
        notify: bool,
    ) -> Result<()> {
        let author = if identity.is_system() {
            "system".to_string()
        } else {
            identity.user_id().unwrap_or("anonymous").to_string()
        };
        self.events.lock().expect("event lock poisoned").push(RequestEvent {
            request_id,
            author,
            content: content.to_string(),
            event_type,
            notify,
        });
        Ok(())
    }
}
