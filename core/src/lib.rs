//! # Record Access Core
//!
//! Core traits and types for the record access-request framework.
//!
//! This crate provides the generic request machinery that the
//! `record-access-requests` crate builds its two access-request variants on:
//!
//! - **Request entity**: [`request::AccessRequest`] with its lifecycle
//!   states and typed participant references
//! - **Transitions**: the legal-transition table and the default action
//!   handlers that apply it
//! - **Payload schemas**: per-variant field declarations with validators
//!   and field-level load permissions
//! - **Unit-of-work**: commit-deferred [`uow::Operation`] registration,
//!   fired in order only after the primary transaction commits
//! - **Identity**: explicit capability-based identities threaded through
//!   every call, with no ambient "current identity"
//!
//! ## Architecture principles
//!
//! - Explicit side effects: actions register operation values, the caller
//!   commits
//! - Dependency injection via traits ([`environment::Clock`], the provider
//!   traits in the domain crate)
//! - Errors propagate with `?` during phase 1 and are logged, never
//!   re-raised, during phase 2

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::SmallVec;

pub mod actions;
pub mod environment;
pub mod error;
pub mod identity;
pub mod payload;
pub mod reference;
pub mod registry;
pub mod request;
pub mod transitions;
pub mod uow;

pub use actions::{ActionHandler, ActionName, DefaultAction};
pub use environment::{Clock, SystemClock};
pub use error::{DeliveryError, RequestError, Result};
pub use identity::{Capability, Identity};
pub use payload::{FieldKind, FieldSpec, PayloadSchema, UnknownKeys};
pub use reference::{EntityRef, RefType};
pub use registry::{RequestType, RequestTypeRegistry};
pub use request::{AccessRequest, Payload, RequestId, RequestState};
pub use uow::{Operation, UnitOfWork};
