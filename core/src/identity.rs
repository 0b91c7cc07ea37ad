//! Identity and capability model.
//!
//! Every call that depends on who is acting takes an [`Identity`] parameter
//! explicitly. There is no ambient "current identity" anywhere in the
//! framework; callers thread it through.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A capability an identity provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// The session belongs to an authenticated user.
    AuthenticatedUser,

    /// The caller may set access-management payload fields such as the
    /// secret-link expiration.
    ManageAccessOptions,

    /// Unrestricted internal identity used for privileged service calls.
    System,
}

/// The acting identity for an operation.
///
/// An identity is either a resolved user, the internal system identity, or
/// an anonymous guest, distinguished by its capability set rather than by
/// subtype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Resolved user id, when the identity belongs to a named user.
    user_id: Option<String>,
    /// Capabilities this identity provides.
    capabilities: BTreeSet<Capability>,
}

impl Identity {
    /// The internal system identity; provides every capability.
    #[must_use]
    pub fn system() -> Self {
        Self {
            user_id: None,
            capabilities: BTreeSet::from([
                Capability::AuthenticatedUser,
                Capability::ManageAccessOptions,
                Capability::System,
            ]),
        }
    }

    /// An authenticated user identity.
    #[must_use]
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            capabilities: BTreeSet::from([Capability::AuthenticatedUser]),
        }
    }

    /// An anonymous guest identity with no capabilities.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            user_id: None,
            capabilities: BTreeSet::new(),
        }
    }

    /// Add a capability to this identity.
    #[must_use]
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Resolved user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Whether this identity provides the given capability.
    #[must_use]
    pub fn provides(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Whether this is the internal system identity.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.capabilities.contains(&Capability::System)
    }
}
