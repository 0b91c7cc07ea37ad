//! Payload schemas and validation.
//!
//! Each request variant declares a schema: field kinds, required flags, an
//! unknown-key policy, optional per-field validators, and optional per-field
//! load capabilities. Loading a raw payload through the schema normalizes it
//! before a request ever enters the state machine.

use crate::error::{RequestError, Result};
use crate::identity::{Capability, Identity};
use crate::request::Payload;
use std::collections::BTreeMap;

/// Value kind of a payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-text string.
    Text,
    /// Email address; checked for basic address shape.
    Email,
}

/// Per-field validator, returning a user-facing reason on failure.
pub type FieldValidator = fn(&str) -> std::result::Result<(), String>;

/// Declaration of a single payload field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    kind: FieldKind,
    required: bool,
    load_capability: Option<Capability>,
    validator: Option<FieldValidator>,
}

impl FieldSpec {
    /// A free-text field.
    #[must_use]
    pub const fn text(required: bool) -> Self {
        Self {
            kind: FieldKind::Text,
            required,
            load_capability: None,
            validator: None,
        }
    }

    /// An email field.
    #[must_use]
    pub const fn email(required: bool) -> Self {
        Self {
            kind: FieldKind::Email,
            required,
            load_capability: None,
            validator: None,
        }
    }

    /// Attach a validator run against the raw value.
    #[must_use]
    pub const fn with_validator(mut self, validator: FieldValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Gate loading of this field behind a capability.
    ///
    /// A caller lacking the capability has the field silently dropped from
    /// the payload; this is field-level authorization, distinct from
    /// record-level permission checks, and never a hard error.
    #[must_use]
    pub const fn load_gated_by(mut self, capability: Capability) -> Self {
        self.load_capability = Some(capability);
        self
    }
}

/// Policy for payload keys not declared in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Closed schema: unknown keys fail validation.
    Reject,
    /// Open schema: unknown keys are dropped during load.
    Drop,
}

/// A payload schema for one request variant.
#[derive(Debug, Clone)]
pub struct PayloadSchema {
    fields: BTreeMap<&'static str, FieldSpec>,
    unknown: UnknownKeys,
}

impl PayloadSchema {
    /// Build a schema with the given unknown-key policy.
    #[must_use]
    pub const fn new(unknown: UnknownKeys) -> Self {
        Self {
            fields: BTreeMap::new(),
            unknown,
        }
    }

    /// Declare a field.
    #[must_use]
    pub fn field(mut self, name: &'static str, spec: FieldSpec) -> Self {
        self.fields.insert(name, spec);
        self
    }

    /// Load and validate a raw payload on behalf of `identity`.
    ///
    /// Returns the normalized payload: load-gated fields the identity may
    /// not set are dropped, unknown keys are rejected or dropped per the
    /// schema policy, and every surviving value passes its kind check and
    /// field validator.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Validation`] for an unknown key on a closed
    /// schema, a missing required field, a malformed email, or a field
    /// validator failure.
    pub fn load(&self, identity: &Identity, raw: &Payload) -> Result<Payload> {
        let mut loaded = Payload::new();

        for (key, value) in raw {
            let Some(spec) = self.fields.get(key.as_str()) else {
                match self.unknown {
                    UnknownKeys::Reject => {
                        return Err(RequestError::validation(key, "unknown field"));
                    }
                    UnknownKeys::Drop => continue,
                }
            };

            // Field-level authorization: silently drop, never a hard error.
            if let Some(capability) = spec.load_capability {
                if !identity.provides(capability) {
                    continue;
                }
            }

            if spec.kind == FieldKind::Email && !is_email(value) {
                return Err(RequestError::validation(key, "not a valid email address"));
            }
            if let Some(validate) = spec.validator {
                if let Err(reason) = validate(value) {
                    return Err(RequestError::validation(key, reason));
                }
            }
            loaded.insert(key.clone(), value.clone());
        }

        for (name, spec) in &self.fields {
            let gated_out = spec
                .load_capability
                .is_some_and(|capability| !identity.provides(capability));
            if spec.required && !gated_out && !loaded.contains_key(*name) {
                return Err(RequestError::validation(*name, "missing required field"));
            }
        }

        Ok(loaded)
    }
}

/// Minimal email-shape check: non-empty local part and a dotted domain.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
}
