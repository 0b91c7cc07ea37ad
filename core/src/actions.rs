//! Action names and the handler seam.
//!
//! Every lifecycle action is a handler implementing [`ActionHandler`].
//! Framework defaults cover the pure state flips; request variants override
//! individual actions (submit, accept) with strategy objects that do their
//! side work and then delegate to the default transition.

use crate::error::Result;
use crate::identity::Identity;
use crate::request::AccessRequest;
use crate::transitions;
use crate::uow::UnitOfWork;
use serde::{Deserialize, Serialize};

/// Name of a lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionName {
    /// Create the request in its initial state.
    Create,
    /// Confirm the request and stamp its title.
    Submit,
    /// Remove a not-yet-submitted request.
    Delete,
    /// Approve the request and mint the access artifact.
    Accept,
    /// Reject the request.
    Decline,
    /// Withdraw the request.
    Cancel,
    /// Time the request out.
    Expire,
}

impl ActionName {
    /// Stable string form of the action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Submit => "submit",
            Self::Delete => "delete",
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Cancel => "cancel",
            Self::Expire => "expire",
        }
    }
}

impl std::fmt::Display for ActionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle action implementation.
///
/// `execute` runs during phase 1 of the transaction: it may resolve
/// references, derive data, and register operations on the unit-of-work,
/// and it must delegate the actual state flip to
/// [`transitions::apply`]. Any error must be returned before the first
/// unit-of-work registration so a failed action leaves no partial effect.
pub trait ActionHandler: Send + Sync {
    /// Execute the action on behalf of `identity`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::RequestError`] on validation failure,
    /// resolution failure, or an illegal transition.
    fn execute(
        &self,
        request: &mut AccessRequest,
        identity: &Identity,
        uow: &mut UnitOfWork,
    ) -> Result<()>;
}

/// Framework-default action: the pure state transition, nothing else.
///
/// `create` and `delete` carry no variant behavior anywhere, and
/// `cancel`/`decline`/`expire` use this default for both request variants.
#[derive(Debug, Clone, Copy)]
pub struct DefaultAction {
    action: ActionName,
}

impl DefaultAction {
    /// A default handler for the given action.
    #[must_use]
    pub const fn new(action: ActionName) -> Self {
        Self { action }
    }
}

impl ActionHandler for DefaultAction {
    fn execute(
        &self,
        request: &mut AccessRequest,
        _identity: &Identity,
        _uow: &mut UnitOfWork,
    ) -> Result<()> {
        transitions::apply(request, self.action)
    }
}
