//! Variant-specific lifecycle actions.
//!
//! Both variants share the framework defaults for create, delete, cancel,
//! decline, and expire; only submit and accept carry behavior of their own.
//! Each override does its side work, registers its deferred operations, and
//! then delegates the state flip to the default transition logic, so the
//! commit-gated ordering is: resolve and validate, register, transition,
//! and only after the caller commits do the operations fire.

use crate::environment::RequestEnvironment;
use crate::issuer::ArtifactIssuer;
use crate::operations::{NotificationOp, ParentReindexOp};
use crate::providers::{EventType, Notification, Record};
use record_access_core::{
    AccessRequest, ActionHandler, ActionName, EntityRef, Identity, RequestError, Result,
    UnitOfWork, transitions,
};
use std::sync::Arc;

/// The record id a request's topic points at.
fn topic_record_id(request: &AccessRequest) -> Result<&str> {
    match &request.topic {
        EntityRef::Record(id) => Ok(id),
        other => Err(RequestError::resolution(format!(
            "topic {other} is not a record"
        ))),
    }
}

/// Resolve the topic record with elevated privilege.
///
/// Acceptance must work for receivers who can decide the request but hold
/// no direct rights on the record itself, so the lookup runs as the system
/// identity.
fn resolve_topic(env: &RequestEnvironment, request: &AccessRequest) -> Result<Record> {
    let record_id = topic_record_id(request)?;
    env.records.read(&Identity::system(), record_id)
}

/// Submit action shared by both variants.
///
/// Stamps the request title from the topic's current display title before
/// delegating to the default transition. The stamp happens exactly once;
/// the title stays decoupled from later record edits.
pub struct SubmitAction {
    env: RequestEnvironment,
}

impl SubmitAction {
    /// Creates a new `SubmitAction`.
    #[must_use]
    pub const fn new(env: RequestEnvironment) -> Self {
        Self { env }
    }
}

impl ActionHandler for SubmitAction {
    fn execute(
        &self,
        request: &mut AccessRequest,
        _identity: &Identity,
        _uow: &mut UnitOfWork,
    ) -> Result<()> {
        let record = resolve_topic(&self.env, request)?;
        request.stamp_title(record.title);
        transitions::apply(request, ActionName::Submit)
    }
}

/// Accept action for guest access requests.
///
/// Mints a secret link, registers the parent reindex and the guest
/// notification, flips the state, and appends one audit comment carrying
/// the access URL. The comment is authored by the system identity with
/// notifications suppressed, so the guest is never notified twice.
pub struct GuestAcceptAction {
    env: RequestEnvironment,
}

impl GuestAcceptAction {
    /// Creates a new `GuestAcceptAction`.
    #[must_use]
    pub const fn new(env: RequestEnvironment) -> Self {
        Self { env }
    }
}

impl ActionHandler for GuestAcceptAction {
    fn execute(
        &self,
        request: &mut AccessRequest,
        _identity: &Identity,
        uow: &mut UnitOfWork,
    ) -> Result<()> {
        let record = resolve_topic(&self.env, request)?;
        let issued = ArtifactIssuer::new(Arc::clone(&self.env.records)).issue_secret_link(
            request,
            &record,
            self.env.clock.today(),
        )?;

        uow.register(Box::new(ParentReindexOp::new(
            Arc::clone(&self.env.records),
            record.parent_id.clone(),
        )));
        uow.register(Box::new(NotificationOp::new(
            Arc::clone(&self.env.notifications),
            Notification::guest_access_request_accept(request, &issued.access_url),
        )));

        transitions::apply(request, ActionName::Accept)?;

        let content = format!(
            "Click <a href=\"{}\">here</a> to access the record.",
            issued.access_url
        );
        self.env.events.create(
            &Identity::system(),
            request.id,
            &content,
            EventType::Comment,
            uow,
            false,
        )
    }
}

/// Accept action for user access requests.
///
/// Resolves the creator and topic, issues a permanent grant, and registers
/// the parent reindex and user notification. No audit comment is appended:
/// the grantee holds standing access the moment the accept commits and
/// needs no access-URL instructions.
pub struct UserAcceptAction {
    env: RequestEnvironment,
}

impl UserAcceptAction {
    /// Creates a new `UserAcceptAction`.
    #[must_use]
    pub const fn new(env: RequestEnvironment) -> Self {
        Self { env }
    }
}

impl ActionHandler for UserAcceptAction {
    fn execute(
        &self,
        request: &mut AccessRequest,
        _identity: &Identity,
        uow: &mut UnitOfWork,
    ) -> Result<()> {
        let record = resolve_topic(&self.env, request)?;
        ArtifactIssuer::new(Arc::clone(&self.env.records)).issue_grant(request, &record)?;

        uow.register(Box::new(ParentReindexOp::new(
            Arc::clone(&self.env.records),
            record.parent_id,
        )));
        uow.register(Box::new(NotificationOp::new(
            Arc::clone(&self.env.notifications),
            Notification::user_access_request_accept(request),
        )));

        transitions::apply(request, ActionName::Accept)
    }
}
