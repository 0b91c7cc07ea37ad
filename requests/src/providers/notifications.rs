//! Notification building and dispatch.
//!
//! Notifications are built per request variant and handed to a dispatcher
//! that owns template rendering and channel fan-out (in-app, email). The
//! dispatcher is only ever invoked post-commit, from a registered
//! operation.

use record_access_core::{AccessRequest, DeliveryError, EntityRef, RequestId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::info;

/// Notification template selected by request variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationTemplate {
    /// A guest access request was accepted; carries the access URL.
    GuestAccessRequestAccept,
    /// A user access request was accepted.
    UserAccessRequestAccept,
}

/// A templated notification ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Template to render.
    pub template: NotificationTemplate,
    /// The request the notification is about.
    pub request_id: RequestId,
    /// The principal to notify.
    pub recipient: EntityRef,
    /// Template context values.
    pub context: BTreeMap<String, String>,
}

impl Notification {
    /// Build the guest-acceptance notification, parameterized with the
    /// freshly minted access URL.
    #[must_use]
    pub fn guest_access_request_accept(request: &AccessRequest, access_url: &str) -> Self {
        let mut context = BTreeMap::new();
        context.insert("access_url".to_string(), access_url.to_string());
        if let Some(title) = request.title() {
            context.insert("request_title".to_string(), title.to_string());
        }
        Self {
            template: NotificationTemplate::GuestAccessRequestAccept,
            request_id: request.id,
            recipient: request.created_by.clone(),
            context,
        }
    }

    /// Build the user-acceptance notification.
    #[must_use]
    pub fn user_access_request_accept(request: &AccessRequest) -> Self {
        let mut context = BTreeMap::new();
        if let Some(title) = request.title() {
            context.insert("request_title".to_string(), title.to_string());
        }
        Self {
            template: NotificationTemplate::UserAccessRequestAccept,
            request_id: request.id,
            recipient: request.created_by.clone(),
            context,
        }
    }
}

/// Dispatches built notifications to their delivery channels.
pub trait NotificationDispatcher: Send + Sync {
    /// Dispatch one notification.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Notification`] when the notification cannot
    /// be handed to the delivery subsystem. Retrying is that subsystem's
    /// concern, never this crate's.
    fn dispatch(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Dispatcher that records notifications for inspection.
///
/// Used by tests to assert what would have been sent, and by development
/// setups that only want a log line.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingDispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The notifications dispatched so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned, which only happens after a
    /// panic on another thread.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("notification lock poisoned").clone()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    #[allow(clippy::expect_used)] // lock poisoning only follows a prior panic
    fn dispatch(&self, notification: &Notification) -> Result<(), DeliveryError> {
        info!(
            request_id = %notification.request_id,
            template = ?notification.template,
            "notification dispatched"
        );
        self.sent
            .lock()
            .expect("notification lock poisoned")
            .push(notification.clone());
        Ok(())
    }
}
