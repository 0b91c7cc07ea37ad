//! The access-request entity and its lifecycle states.

use crate::reference::EntityRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new request id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a request.
///
/// Transitions are monotonic and one-directional; the terminal states admit
/// no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestState {
    /// Freshly created, not yet confirmed by the requester.
    Created,
    /// Confirmed by the requester, awaiting a decision.
    Submitted,
    /// Approved by the receiver; the access artifact has been minted.
    Accepted,
    /// Rejected by the receiver.
    Declined,
    /// Withdrawn by the requester.
    Cancelled,
    /// Timed out without a decision.
    Expired,
}

impl RequestState {
    /// Whether this state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Accepted | Self::Declined | Self::Cancelled | Self::Expired
        )
    }
}

/// The raw payload mapping carried by a request.
pub type Payload = BTreeMap<String, String>;

/// An access request for a record.
///
/// Two concrete variants exist, discriminated by `type_id`: requests from
/// authenticated users and requests from anonymous guests. The variant
/// determines the payload schema and the accept behavior, not the entity
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRequest {
    /// Unique request id.
    pub id: RequestId,
    /// Immutable variant discriminator.
    pub type_id: &'static str,
    /// Current lifecycle state.
    pub state: RequestState,
    /// The requesting principal. Never absent for either variant.
    pub created_by: EntityRef,
    /// The user or community holding decision authority.
    pub receiver: EntityRef,
    /// The record this request concerns. Never absent.
    pub topic: EntityRef,
    /// Variant-specific payload, validated against the variant's schema.
    pub payload: Payload,
    /// Display title, copied from the topic at submission time.
    title: Option<String>,
}

impl AccessRequest {
    /// Create a request in the `Created` state.
    #[must_use]
    pub fn new(
        type_id: &'static str,
        created_by: EntityRef,
        receiver: EntityRef,
        topic: EntityRef,
        payload: Payload,
    ) -> Self {
        Self {
            id: RequestId::new(),
            type_id,
            state: RequestState::Created,
            created_by,
            receiver,
            topic,
            payload,
            title: None,
        }
    }

    /// The stamped display title, if the request has been submitted.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Stamp the display title from the topic's current title.
    ///
    /// The title is populated exactly once; later calls are ignored so the
    /// request's display name stays decoupled from subsequent record edits.
    pub fn stamp_title(&mut self, title: impl Into<String>) {
        if self.title.is_none() {
            self.title = Some(title.into());
        }
    }

    /// The origin tag recorded on access artifacts minted for this request.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("request:{}", self.id)
    }
}
