//! # Record Access Requests
//!
//! Access requests for records: the lifecycle engine that grants
//! time-bounded or permanent access to a protected record on behalf of an
//! authenticated user or an anonymous guest.
//!
//! Two request variants exist, built on the `record-access-core`
//! framework:
//!
//! - **User access request**: an authenticated user asks for access; on
//!   accept, a permanent permission grant naming that user is minted.
//! - **Guest access request**: an anonymous guest identified by email asks
//!   for access; on accept, a tokenized secret link is minted, optionally
//!   expiring after a payload-declared number of days (zero means never),
//!   and an audit comment carrying the access URL is appended to the
//!   request timeline.
//!
//! Accepting is atomic: the artifact is minted and the parent reindex,
//! notification dispatch, and any email delivery are registered against
//! the transaction's unit-of-work, firing in order only after the caller
//! commits the primary state change. A failure before commit leaves no
//! partial effect.
//!
//! ## Example
//!
//! ```
//! use record_access_core::{ActionName, EntityRef, Identity, Payload, UnitOfWork};
//! use record_access_requests::environment::RequestEnvironment;
//! use record_access_requests::registry::access_request_registry;
//!
//! let env = RequestEnvironment::in_memory();
//! let registry = access_request_registry(&env);
//!
//! let payload = Payload::from([("permission".to_string(), "view".to_string())]);
//! let request = registry.new_request(
//!     "user-access-request",
//!     &Identity::user("1001"),
//!     EntityRef::User("1001".to_string()),
//!     EntityRef::User("2002".to_string()),
//!     EntityRef::Record("rec-1".to_string()),
//!     &payload,
//! );
//! assert!(request.is_ok());
//! ```

pub mod actions;
pub mod config;
pub mod environment;
pub mod issuer;
pub mod links;
pub mod operations;
pub mod providers;
pub mod registry;

#[cfg(test)]
mod tests;

pub use actions::{GuestAcceptAction, SubmitAction, UserAcceptAction};
pub use config::AccessConfig;
pub use environment::RequestEnvironment;
pub use issuer::{ArtifactIssuer, IssuedSecretLink};
pub use links::{RequestVariant, ui_path, ui_prefix};
pub use operations::{EmailOp, NotificationOp, ParentReindexOp};
pub use registry::{
    GUEST_ACCESS_REQUEST_TYPE_ID, USER_ACCESS_REQUEST_TYPE_ID, access_request_registry,
};
