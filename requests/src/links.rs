//! Link-context resolution.
//!
//! Computes the UI path prefix spliced into generated request links.
//! This is a pure function of the request variant and the evaluating
//! identity; the identity is always passed explicitly, never read from
//! ambient state.

use record_access_core::{Capability, Identity};
use serde::{Deserialize, Serialize};

use crate::registry::{GUEST_ACCESS_REQUEST_TYPE_ID, USER_ACCESS_REQUEST_TYPE_ID};

/// The two access-request variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestVariant {
    /// Request from an authenticated user.
    User,
    /// Request from an anonymous guest.
    Guest,
}

impl RequestVariant {
    /// Variant for a stored type discriminator.
    #[must_use]
    pub fn from_type_id(type_id: &str) -> Option<Self> {
        match type_id {
            USER_ACCESS_REQUEST_TYPE_ID => Some(Self::User),
            GUEST_ACCESS_REQUEST_TYPE_ID => Some(Self::Guest),
            _ => None,
        }
    }
}

/// The UI prefix for links to a request of the given variant.
///
/// User-variant links always use `/access`. Guest-variant links use `/me`
/// when the evaluating identity carries the authenticated-user capability,
/// so a still-logged-in guest-flow participant sees a personalized path;
/// anonymous and third-party viewers get `/access`.
#[must_use]
pub fn ui_prefix(variant: RequestVariant, identity: Option<&Identity>) -> &'static str {
    match variant {
        RequestVariant::User => "/access",
        RequestVariant::Guest => match identity {
            Some(identity) if identity.provides(Capability::AuthenticatedUser) => "/me",
            _ => "/access",
        },
    }
}

/// Splice the variant prefix onto a base UI path.
#[must_use]
pub fn ui_path(base_ui: &str, variant: RequestVariant, identity: Option<&Identity>) -> String {
    format!("{base_ui}{}", ui_prefix(variant, identity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_variant_always_uses_access() {
        let authenticated = Identity::user("7");
        assert_eq!(ui_prefix(RequestVariant::User, None), "/access");
        assert_eq!(ui_prefix(RequestVariant::User, Some(&authenticated)), "/access");
    }

    #[test]
    fn guest_variant_personalizes_for_authenticated_viewers() {
        let authenticated = Identity::user("7");
        let anonymous = Identity::guest();

        assert_eq!(ui_prefix(RequestVariant::Guest, Some(&authenticated)), "/me");
        assert_eq!(ui_prefix(RequestVariant::Guest, Some(&anonymous)), "/access");
        assert_eq!(ui_prefix(RequestVariant::Guest, None), "/access");
    }

    #[test]
    fn ui_path_splices_prefix() {
        assert_eq!(
            ui_path("https://repo.example.org", RequestVariant::User, None),
            "https://repo.example.org/access"
        );
    }

    #[test]
    fn variant_from_type_id() {
        assert_eq!(
            RequestVariant::from_type_id("user-access-request"),
            Some(RequestVariant::User)
        );
        assert_eq!(
            RequestVariant::from_type_id("guest-access-request"),
            Some(RequestVariant::Guest)
        );
        assert_eq!(RequestVariant::from_type_id("something-else"), None);
    }
}
