//! Post-commit operations registered by the accept actions.

use crate::providers::{EmailMessage, Mailer, Notification, NotificationDispatcher, RecordService};
use record_access_core::{DeliveryError, Operation};
use std::sync::Arc;

/// Marks a record's parent aggregate dirty and schedules a search-index
/// update.
///
/// Registered once per accept; the idempotent reindex leaves serialization
/// of concurrent accepts on the same parent to the record service's own
/// persistence layer.
pub struct ParentReindexOp {
    records: Arc<dyn RecordService>,
    parent_id: String,
}

impl ParentReindexOp {
    /// Create a reindex operation for the given parent aggregate.
    #[must_use]
    pub fn new(records: Arc<dyn RecordService>, parent_id: impl Into<String>) -> Self {
        Self {
            records,
            parent_id: parent_id.into(),
        }
    }
}

impl Operation for ParentReindexOp {
    fn kind(&self) -> &'static str {
        "parent-reindex"
    }

    fn on_post_commit(&self) -> Result<(), DeliveryError> {
        self.records.reindex_parent(&self.parent_id)
    }
}

/// Dispatches a templated notification after commit.
pub struct NotificationOp {
    dispatcher: Arc<dyn NotificationDispatcher>,
    notification: Notification,
}

impl NotificationOp {
    /// Create a notification operation.
    #[must_use]
    pub fn new(dispatcher: Arc<dyn NotificationDispatcher>, notification: Notification) -> Self {
        Self {
            dispatcher,
            notification,
        }
    }

    /// The notification this operation will dispatch.
    #[must_use]
    pub const fn notification(&self) -> &Notification {
        &self.notification
    }
}

impl Operation for NotificationOp {
    fn kind(&self) -> &'static str {
        "notification"
    }

    fn on_post_commit(&self) -> Result<(), DeliveryError> {
        self.dispatcher.dispatch(&self.notification)
    }
}

/// Sends a single rendered email after commit.
///
/// A lower-level fallback next to [`NotificationOp`] for callers that have
/// already rendered subject and bodies and only need delivery to one
/// receiver, from the process-wide configured sender address.
pub struct EmailOp {
    mailer: Arc<dyn Mailer>,
    message: EmailMessage,
}

impl EmailOp {
    /// Create an email operation addressed to a single receiver.
    #[must_use]
    pub fn new(
        mailer: Arc<dyn Mailer>,
        receiver: impl Into<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            message: EmailMessage {
                sender: sender.into(),
                recipient: receiver.into(),
                subject: subject.into(),
                html_body: html_body.into(),
                body: body.into(),
            },
        }
    }
}

impl Operation for EmailOp {
    fn kind(&self) -> &'static str {
        "email"
    }

    fn on_post_commit(&self) -> Result<(), DeliveryError> {
        self.mailer.send(&self.message)
    }
}
