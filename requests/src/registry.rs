//! The two access-request type declarations.

use crate::actions::{GuestAcceptAction, SubmitAction, UserAcceptAction};
use crate::environment::RequestEnvironment;
use record_access_core::{
    ActionHandler, ActionName, Capability, DefaultAction, FieldSpec, PayloadSchema, RefType,
    RequestType, RequestTypeRegistry, UnknownKeys,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Type discriminator for requests from authenticated users.
pub const USER_ACCESS_REQUEST_TYPE_ID: &str = "user-access-request";

/// Type discriminator for requests from anonymous guests.
pub const GUEST_ACCESS_REQUEST_TYPE_ID: &str = "guest-access-request";

/// Validator for the guest `secret_link_expiration` field.
///
/// The value must parse as an integer of at least zero; zero is valid and
/// means the link never expires. Non-numeric strings and negative integers
/// fail with the same user-facing reason.
fn validate_expiration_days(value: &str) -> Result<(), String> {
    match value.parse::<i64>() {
        Ok(days) if days >= 0 => Ok(()),
        _ => Err("Not a valid number of days.".to_string()),
    }
}

fn default_actions() -> HashMap<ActionName, Arc<dyn ActionHandler>> {
    let mut actions: HashMap<ActionName, Arc<dyn ActionHandler>> = HashMap::new();
    for action in [
        ActionName::Create,
        ActionName::Delete,
        ActionName::Cancel,
        ActionName::Decline,
        ActionName::Expire,
    ] {
        actions.insert(action, Arc::new(DefaultAction::new(action)));
    }
    actions
}

/// Declaration of the user-origin access request.
///
/// Open payload schema: unknown keys are dropped during load and ignored
/// downstream.
#[must_use]
pub fn user_access_request_type(env: &RequestEnvironment) -> RequestType {
    let mut actions = default_actions();
    actions.insert(ActionName::Submit, Arc::new(SubmitAction::new(env.clone())));
    actions.insert(
        ActionName::Accept,
        Arc::new(UserAcceptAction::new(env.clone())),
    );

    RequestType::new(
        USER_ACCESS_REQUEST_TYPE_ID,
        &[RefType::User],
        &[RefType::User, RefType::Community],
        &[RefType::Record],
        PayloadSchema::new(UnknownKeys::Drop)
            .field("permission", FieldSpec::text(true))
            .field("message", FieldSpec::text(false)),
        actions,
    )
}

/// Declaration of the guest-origin access request.
///
/// Closed payload schema: unknown keys are rejected. Setting the
/// secret-link expiration requires the manage-access-options capability;
/// callers without it have the field silently dropped.
#[must_use]
pub fn guest_access_request_type(env: &RequestEnvironment) -> RequestType {
    let mut actions = default_actions();
    actions.insert(ActionName::Submit, Arc::new(SubmitAction::new(env.clone())));
    actions.insert(
        ActionName::Accept,
        Arc::new(GuestAcceptAction::new(env.clone())),
    );

    RequestType::new(
        GUEST_ACCESS_REQUEST_TYPE_ID,
        &[RefType::Email],
        &[RefType::User, RefType::Community],
        &[RefType::Record],
        PayloadSchema::new(UnknownKeys::Reject)
            .field("permission", FieldSpec::text(true))
            .field("email", FieldSpec::email(true))
            .field("full_name", FieldSpec::text(true))
            .field("token", FieldSpec::text(true))
            .field("message", FieldSpec::text(true))
            .field(
                "secret_link_expiration",
                FieldSpec::text(true)
                    .with_validator(validate_expiration_days)
                    .load_gated_by(Capability::ManageAccessOptions),
            )
            .field("consent_to_share_personal_data", FieldSpec::text(true)),
        actions,
    )
}

/// Registry holding both access-request declarations, consumed by the host
/// framework's dispatcher.
#[must_use]
pub fn access_request_registry(env: &RequestEnvironment) -> RequestTypeRegistry {
    let mut registry = RequestTypeRegistry::new();
    registry.register(user_access_request_type(env));
    registry.register(guest_access_request_type(env));
    registry
}
