//! Request type declarations and action dispatch.

use crate::actions::{ActionHandler, ActionName};
use crate::error::{RequestError, Result};
use crate::identity::Identity;
use crate::payload::PayloadSchema;
use crate::reference::{EntityRef, RefType};
use crate::request::{AccessRequest, Payload};
use crate::transitions;
use crate::uow::UnitOfWork;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Declaration of one request variant.
///
/// A request type fixes the variant's discriminator, the reference types it
/// accepts for each participant slot, its payload schema, and the mapping
/// from action names to concrete handlers.
pub struct RequestType {
    type_id: &'static str,
    allowed_creator_ref_types: &'static [RefType],
    allowed_receiver_ref_types: &'static [RefType],
    allowed_topic_ref_types: &'static [RefType],
    payload_schema: PayloadSchema,
    available_actions: HashMap<ActionName, Arc<dyn ActionHandler>>,
}

impl RequestType {
    /// Declare a request type.
    #[must_use]
    pub fn new(
        type_id: &'static str,
        allowed_creator_ref_types: &'static [RefType],
        allowed_receiver_ref_types: &'static [RefType],
        allowed_topic_ref_types: &'static [RefType],
        payload_schema: PayloadSchema,
        available_actions: HashMap<ActionName, Arc<dyn ActionHandler>>,
    ) -> Self {
        Self {
            type_id,
            allowed_creator_ref_types,
            allowed_receiver_ref_types,
            allowed_topic_ref_types,
            payload_schema,
            available_actions,
        }
    }

    /// The variant discriminator.
    #[must_use]
    pub const fn type_id(&self) -> &'static str {
        self.type_id
    }

    /// The payload schema for this variant.
    #[must_use]
    pub const fn payload_schema(&self) -> &PayloadSchema {
        &self.payload_schema
    }

    /// The handler registered for `action`, if any.
    #[must_use]
    pub fn action(&self, action: ActionName) -> Option<&Arc<dyn ActionHandler>> {
        self.available_actions.get(&action)
    }

    fn check_ref(slot: &str, allowed: &[RefType], reference: &EntityRef) -> Result<()> {
        if allowed.contains(&reference.ref_type()) {
            Ok(())
        } else {
            Err(RequestError::validation(
                slot,
                format!(
                    "reference type '{}' is not allowed here",
                    reference.ref_type().as_str()
                ),
            ))
        }
    }
}

/// The set of declared request types, consulted by the dispatcher.
#[derive(Default)]
pub struct RequestTypeRegistry {
    types: HashMap<&'static str, RequestType>,
}

impl RequestTypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request type declaration.
    pub fn register(&mut self, request_type: RequestType) {
        self.types.insert(request_type.type_id(), request_type);
    }

    /// Look up a declaration by discriminator.
    #[must_use]
    pub fn get(&self, type_id: &str) -> Option<&RequestType> {
        self.types.get(type_id)
    }

    /// Build a new request of the given type in the `Created` state.
    ///
    /// Reference types are checked against the declaration and the raw
    /// payload is loaded through the variant's schema on behalf of
    /// `identity`, so a malformed request never enters the state machine.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Validation`] for an unknown type id, a
    /// disallowed reference type, or a payload that fails its schema.
    pub fn new_request(
        &self,
        type_id: &str,
        identity: &Identity,
        created_by: EntityRef,
        receiver: EntityRef,
        topic: EntityRef,
        payload: &Payload,
    ) -> Result<AccessRequest> {
        let decl = self
            .get(type_id)
            .ok_or_else(|| RequestError::validation("type_id", "unknown request type"))?;

        RequestType::check_ref("created_by", decl.allowed_creator_ref_types, &created_by)?;
        RequestType::check_ref("receiver", decl.allowed_receiver_ref_types, &receiver)?;
        RequestType::check_ref("topic", decl.allowed_topic_ref_types, &topic)?;

        let loaded = decl.payload_schema.load(identity, payload)?;
        Ok(AccessRequest::new(
            decl.type_id(),
            created_by,
            receiver,
            topic,
            loaded,
        ))
    }

    /// Execute `action` on `request` on behalf of `identity`.
    ///
    /// Transition legality is checked against the request's current state
    /// before any variant-specific logic runs, then the variant's handler
    /// executes with the unit-of-work for side-effect registration.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::IllegalTransition`] when the state forbids
    /// the action, [`RequestError::Validation`] for an undeclared type or
    /// action, or whatever the handler itself raises.
    pub fn execute(
        &self,
        request: &mut AccessRequest,
        action: ActionName,
        identity: &Identity,
        uow: &mut UnitOfWork,
    ) -> Result<()> {
        let decl = self
            .get(request.type_id)
            .ok_or_else(|| RequestError::validation("type_id", "unknown request type"))?;
        let handler = decl
            .action(action)
            .ok_or_else(|| RequestError::validation("action", "action not available"))?;

        // Reject illegal transitions before any variant-specific logic.
        if !transitions::permits(request.state, action) {
            return Err(RequestError::IllegalTransition {
                action,
                state: request.state,
            });
        }

        if let Err(err) = handler.execute(request, identity, uow) {
            // User errors are expected traffic; log them below error level.
            if err.is_user_error() {
                warn!(request_id = %request.id, action = %action, %err, "request action rejected");
            }
            return Err(err);
        }
        info!(
            request_id = %request.id,
            type_id = request.type_id,
            action = %action,
            state = ?request.state,
            "request action executed"
        );
        Ok(())
    }
}
