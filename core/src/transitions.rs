//! The legal-transition table for request states.

use crate::actions::ActionName;
use crate::error::{RequestError, Result};
use crate::request::{AccessRequest, RequestState};

/// Whether `action` is legal for a request in `state`.
#[must_use]
pub const fn permits(state: RequestState, action: ActionName) -> bool {
    matches!(
        (state, action),
        (
            RequestState::Created,
            ActionName::Create | ActionName::Submit | ActionName::Delete
        )
            | (
                RequestState::Submitted,
                ActionName::Accept
                    | ActionName::Decline
                    | ActionName::Cancel
                    | ActionName::Expire
            )
    )
}

/// The state an action transitions into, when it produces one.
///
/// `Create` leaves the initial state in place and `Delete` removes the
/// request instead of moving it, so neither yields a target state.
#[must_use]
pub const fn target(action: ActionName) -> Option<RequestState> {
    match action {
        ActionName::Submit => Some(RequestState::Submitted),
        ActionName::Accept => Some(RequestState::Accepted),
        ActionName::Decline => Some(RequestState::Declined),
        ActionName::Cancel => Some(RequestState::Cancelled),
        ActionName::Expire => Some(RequestState::Expired),
        ActionName::Create | ActionName::Delete => None,
    }
}

/// Apply `action` to the request, flipping its state.
///
/// # Errors
///
/// Returns [`RequestError::IllegalTransition`] when the request's current
/// state does not permit the action.
pub fn apply(request: &mut AccessRequest, action: ActionName) -> Result<()> {
    if !permits(request.state, action) {
        return Err(RequestError::IllegalTransition {
            action,
            state: request.state,
        });
    }
    if let Some(next) = target(action) {
        request.state = next;
    }
    Ok(())
}
