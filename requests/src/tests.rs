//! Scenario tests for the access-request lifecycle.
//!
//! These drive the registry end to end with in-memory providers and a
//! fixed clock: create, submit, and decide requests, then commit (or drop)
//! the unit-of-work and assert on minted artifacts, timeline comments,
//! dispatched notifications, and reindex scheduling.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use crate::config::AccessConfig;
use crate::environment::RequestEnvironment;
use crate::operations::EmailOp;
use crate::providers::{
    ConsoleMailer, EmailMessage, InMemoryEventLog, InMemoryRecordService, Mailer,
    NotificationTemplate, Record, RecordingDispatcher,
};
use crate::registry::{
    GUEST_ACCESS_REQUEST_TYPE_ID, USER_ACCESS_REQUEST_TYPE_ID, access_request_registry,
};
use record_access_core::{
    AccessRequest, ActionName, Capability, EntityRef, Identity, Payload, RequestError,
    RequestState, RequestTypeRegistry, UnitOfWork,
};
use record_access_testing::{identities, test_clock};
use std::sync::Arc;

struct Harness {
    records: Arc<InMemoryRecordService>,
    events: Arc<InMemoryEventLog>,
    notifications: Arc<RecordingDispatcher>,
    registry: RequestTypeRegistry,
}

const RECORD_ID: &str = "rec-1";
const PARENT_ID: &str = "parent-1";
const SELF_HTML: &str = "https://repo.example.org/records/rec-1";

fn harness() -> Harness {
    let records = Arc::new(InMemoryRecordService::new());
    records.insert(Record {
        id: RECORD_ID.to_string(),
        parent_id: PARENT_ID.to_string(),
        title: "Signal dataset".to_string(),
        self_html: SELF_HTML.to_string(),
    });

    let events = Arc::new(InMemoryEventLog::new());
    let notifications = Arc::new(RecordingDispatcher::new());
    let env = RequestEnvironment::new(
        Arc::clone(&records) as _,
        Arc::clone(&events) as _,
        Arc::clone(&notifications) as _,
        Arc::new(ConsoleMailer::new()),
        Arc::new(test_clock()),
        AccessConfig::default(),
    );

    Harness {
        records,
        events,
        notifications,
        registry: access_request_registry(&env),
    }
}

fn guest_payload(expiration_days: &str) -> Payload {
    Payload::from([
        ("permission".to_string(), "view".to_string()),
        ("email".to_string(), "ada@example.org".to_string()),
        ("full_name".to_string(), "Ada Lovelace".to_string()),
        ("token".to_string(), "request-token".to_string()),
        ("message".to_string(), "Please let me in.".to_string()),
        (
            "secret_link_expiration".to_string(),
            expiration_days.to_string(),
        ),
        (
            "consent_to_share_personal_data".to_string(),
            "true".to_string(),
        ),
    ])
}

fn user_payload() -> Payload {
    Payload::from([("permission".to_string(), "view".to_string())])
}

/// Identity permitted to set the secret-link expiration field.
fn access_manager() -> Identity {
    Identity::guest().with_capability(Capability::ManageAccessOptions)
}

fn new_guest_request(harness: &Harness, payload: &Payload) -> AccessRequest {
    harness
        .registry
        .new_request(
            GUEST_ACCESS_REQUEST_TYPE_ID,
            &access_manager(),
            EntityRef::Email("ada@example.org".to_string()),
            EntityRef::User("2002".to_string()),
            EntityRef::Record(RECORD_ID.to_string()),
            payload,
        )
        .expect("guest request payload is valid")
}

fn new_user_request(harness: &Harness) -> AccessRequest {
    harness
        .registry
        .new_request(
            USER_ACCESS_REQUEST_TYPE_ID,
            &identities::requester(),
            EntityRef::User("1001".to_string()),
            EntityRef::User("2002".to_string()),
            EntityRef::Record(RECORD_ID.to_string()),
            &user_payload(),
        )
        .expect("user request payload is valid")
}

fn submit(harness: &Harness, request: &mut AccessRequest) {
    let mut uow = UnitOfWork::new();
    harness
        .registry
        .execute(request, ActionName::Submit, &Identity::guest(), &mut uow)
        .expect("submit succeeds");
    uow.commit();
}

/// Submit and accept, committing both transactions.
fn accept(harness: &Harness, request: &mut AccessRequest) {
    submit(harness, request);
    let mut uow = UnitOfWork::new();
    harness
        .registry
        .execute(request, ActionName::Accept, &identities::receiver(), &mut uow)
        .expect("accept succeeds");
    uow.commit();
}

// ============================================================================
// Guest accept
// ============================================================================

#[test]
fn guest_accept_mints_link_expiring_after_declared_days() {
    let harness = harness();
    let mut request = new_guest_request(&harness, &guest_payload("7"));
    accept(&harness, &mut request);

    assert_eq!(request.state, RequestState::Accepted);
    let links = harness.records.links();
    assert_eq!(links.len(), 1);
    let (record_id, link) = &links[0];
    assert_eq!(record_id, RECORD_ID);
    assert_eq!(link.data.permission, "view");
    assert_eq!(
        link.data.description,
        "Requested by guest: Ada Lovelace (ada@example.org)"
    );
    assert_eq!(link.data.origin, format!("request:{}", request.id));
    // Fixed clock is 2025-01-01; seven days later, date only.
    assert_eq!(link.data.expires_at, Some("2025-01-08".parse().unwrap()));
}

#[test]
fn guest_accept_zero_days_mints_link_without_expiration() {
    let harness = harness();
    let mut request = new_guest_request(&harness, &guest_payload("0"));
    accept(&harness, &mut request);

    let links = harness.records.links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].1.data.expires_at, None);
}

#[test]
fn guest_accept_access_url_is_self_link_with_token() {
    let harness = harness();
    let mut request = new_guest_request(&harness, &guest_payload("7"));
    accept(&harness, &mut request);

    let link = &harness.records.links()[0].1;
    let sent = harness.notifications.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].template, NotificationTemplate::GuestAccessRequestAccept);
    assert_eq!(
        sent[0].context.get("access_url"),
        Some(&format!("{SELF_HTML}?token={}", link.token))
    );
}

#[test]
fn guest_accept_appends_exactly_one_unnotified_comment_with_the_url() {
    let harness = harness();
    let mut request = new_guest_request(&harness, &guest_payload("7"));
    accept(&harness, &mut request);

    let events = harness.events.events();
    assert_eq!(events.len(), 1);
    let comment = &events[0];
    assert_eq!(comment.request_id, request.id);
    assert_eq!(comment.author, "system");
    assert!(!comment.notify, "the audit comment never notifies again");

    let token = &harness.records.links()[0].1.token;
    assert_eq!(
        comment.content,
        format!("Click <a href=\"{SELF_HTML}?token={token}\">here</a> to access the record.")
    );
}

#[test]
fn guest_accept_without_expiration_capability_falls_back_to_never() {
    let harness = harness();
    // A plain guest lacks manage-access-options, so the expiration field
    // is silently dropped during payload load.
    let request = harness
        .registry
        .new_request(
            GUEST_ACCESS_REQUEST_TYPE_ID,
            &Identity::guest(),
            EntityRef::Email("ada@example.org".to_string()),
            EntityRef::User("2002".to_string()),
            EntityRef::Record(RECORD_ID.to_string()),
            &guest_payload("7"),
        )
        .expect("gated field is dropped, not an error");
    assert!(!request.payload.contains_key("secret_link_expiration"));

    let mut request = request;
    accept(&harness, &mut request);
    assert_eq!(harness.records.links()[0].1.data.expires_at, None);
}

// ============================================================================
// User accept
// ============================================================================

#[test]
fn user_accept_creates_grant_for_the_creator() {
    let harness = harness();
    let mut request = new_user_request(&harness);
    accept(&harness, &mut request);

    assert_eq!(request.state, RequestState::Accepted);
    let grants = harness.records.grants();
    assert_eq!(grants.len(), 1);
    let (record_id, grant) = &grants[0];
    assert_eq!(record_id, RECORD_ID);
    assert_eq!(grant.permission, "view");
    assert_eq!(grant.subject.subject_type, "user");
    assert_eq!(grant.subject.id, "1001");
    assert_eq!(grant.origin, format!("request:{}", request.id));

    // No secret link and no access URL for a user grant.
    assert!(harness.records.links().is_empty());
}

#[test]
fn grant_subject_serializes_with_a_type_discriminator() {
    let harness = harness();
    let mut request = new_user_request(&harness);
    accept(&harness, &mut request);

    let subject = &harness.records.grants()[0].1.subject;
    assert_eq!(
        serde_json::to_value(subject).expect("grant subject serializes"),
        serde_json::json!({ "type": "user", "id": "1001" })
    );
}

#[test]
fn user_accept_never_appends_a_comment() {
    let harness = harness();
    let mut request = new_user_request(&harness);
    accept(&harness, &mut request);

    assert!(harness.events.events().is_empty());
    let sent = harness.notifications.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].template, NotificationTemplate::UserAccessRequestAccept);
}

// ============================================================================
// Submit and the title stamp
// ============================================================================

#[test]
fn submit_stamps_title_from_topic() {
    let harness = harness();
    let mut request = new_user_request(&harness);
    assert_eq!(request.title(), None);

    submit(&harness, &mut request);
    assert_eq!(request.state, RequestState::Submitted);
    assert_eq!(request.title(), Some("Signal dataset"));
}

#[test]
fn stamped_title_survives_later_record_edits() {
    let harness = harness();
    let mut request = new_user_request(&harness);
    submit(&harness, &mut request);

    // The record gets renamed after submission.
    harness.records.insert(Record {
        id: RECORD_ID.to_string(),
        parent_id: PARENT_ID.to_string(),
        title: "Signal dataset (v2)".to_string(),
        self_html: SELF_HTML.to_string(),
    });

    let mut uow = UnitOfWork::new();
    harness
        .registry
        .execute(&mut request, ActionName::Accept, &identities::receiver(), &mut uow)
        .expect("accept succeeds");
    uow.commit();

    assert_eq!(request.title(), Some("Signal dataset"));
}

#[test]
fn submit_fails_when_topic_cannot_be_resolved() {
    let harness = harness();
    let mut request = harness
        .registry
        .new_request(
            USER_ACCESS_REQUEST_TYPE_ID,
            &identities::requester(),
            EntityRef::User("1001".to_string()),
            EntityRef::User("2002".to_string()),
            EntityRef::Record("missing".to_string()),
            &user_payload(),
        )
        .expect("payload is valid");

    let mut uow = UnitOfWork::new();
    let err = harness
        .registry
        .execute(&mut request, ActionName::Submit, &identities::requester(), &mut uow)
        .expect_err("unresolvable topic fails submit");
    assert!(matches!(err, RequestError::Resolution { .. }));
    assert_eq!(request.state, RequestState::Created);
}

// ============================================================================
// Commit gating
// ============================================================================

#[test]
fn accept_side_effects_fire_only_after_commit_in_order() {
    let harness = harness();
    let mut request = new_guest_request(&harness, &guest_payload("7"));
    submit(&harness, &mut request);

    let mut uow = UnitOfWork::new();
    harness
        .registry
        .execute(&mut request, ActionName::Accept, &identities::receiver(), &mut uow)
        .expect("accept succeeds");

    // Registered but not yet fired.
    let kinds: Vec<_> = uow.operations().iter().map(|op| op.kind()).collect();
    assert_eq!(kinds, vec!["parent-reindex", "notification"]);
    assert!(harness.records.reindexed().is_empty());
    assert!(harness.notifications.sent().is_empty());

    uow.commit();
    assert_eq!(harness.records.reindexed(), vec![PARENT_ID.to_string()]);
    assert_eq!(harness.notifications.sent().len(), 1);
}

#[test]
fn rollback_discards_accept_side_effects() {
    let harness = harness();
    let mut request = new_guest_request(&harness, &guest_payload("7"));
    submit(&harness, &mut request);

    let mut uow = UnitOfWork::new();
    harness
        .registry
        .execute(&mut request, ActionName::Accept, &identities::receiver(), &mut uow)
        .expect("accept succeeds");
    uow.rollback();

    assert!(harness.records.reindexed().is_empty());
    assert!(harness.notifications.sent().is_empty());
}

#[test]
fn failed_resolution_during_accept_registers_nothing() {
    let harness = harness();
    let mut request = new_guest_request(&harness, &guest_payload("7"));
    submit(&harness, &mut request);

    // The record disappears between submission and the decision.
    let events = Arc::new(InMemoryEventLog::new());
    let notifications = Arc::new(RecordingDispatcher::new());
    let env = RequestEnvironment::new(
        Arc::new(InMemoryRecordService::new()),
        Arc::clone(&events) as _,
        Arc::clone(&notifications) as _,
        Arc::new(ConsoleMailer::new()),
        Arc::new(test_clock()),
        AccessConfig::default(),
    );
    let registry = access_request_registry(&env);

    let mut uow = UnitOfWork::new();
    let err = registry
        .execute(&mut request, ActionName::Accept, &identities::receiver(), &mut uow)
        .expect_err("unresolvable record fails accept");
    assert!(matches!(err, RequestError::Resolution { .. }));

    assert!(uow.operations().is_empty(), "no partial registrations");
    assert!(events.events().is_empty());
    assert_eq!(request.state, RequestState::Submitted);
    uow.commit();
    assert!(notifications.sent().is_empty());
}

// ============================================================================
// Validation and transitions
// ============================================================================

#[test]
fn guest_payload_rejects_invalid_expiration_days() {
    let harness = harness();
    for bad in ["-1", "abc", ""] {
        let err = harness
            .registry
            .new_request(
                GUEST_ACCESS_REQUEST_TYPE_ID,
                &access_manager(),
                EntityRef::Email("ada@example.org".to_string()),
                EntityRef::User("2002".to_string()),
                EntityRef::Record(RECORD_ID.to_string()),
                &guest_payload(bad),
            )
            .expect_err("invalid expiration days must fail");
        assert_eq!(
            err,
            RequestError::validation("secret_link_expiration", "Not a valid number of days.")
        );
    }
}

#[test]
fn guest_payload_rejects_unknown_keys() {
    let harness = harness();
    let mut payload = guest_payload("7");
    payload.insert("favourite_color".to_string(), "teal".to_string());

    let err = harness
        .registry
        .new_request(
            GUEST_ACCESS_REQUEST_TYPE_ID,
            &access_manager(),
            EntityRef::Email("ada@example.org".to_string()),
            EntityRef::User("2002".to_string()),
            EntityRef::Record(RECORD_ID.to_string()),
            &payload,
        )
        .expect_err("closed schema rejects unknown keys");
    assert_eq!(err, RequestError::validation("favourite_color", "unknown field"));
}

#[test]
fn user_payload_drops_unknown_keys() {
    let harness = harness();
    let mut payload = user_payload();
    payload.insert("favourite_color".to_string(), "teal".to_string());

    let request = harness
        .registry
        .new_request(
            USER_ACCESS_REQUEST_TYPE_ID,
            &identities::requester(),
            EntityRef::User("1001".to_string()),
            EntityRef::User("2002".to_string()),
            EntityRef::Record(RECORD_ID.to_string()),
            &payload,
        )
        .expect("open schema tolerates unknown keys");
    assert!(!request.payload.contains_key("favourite_color"));
}

#[test]
fn terminal_requests_reject_further_actions() {
    let harness = harness();
    let mut request = new_user_request(&harness);
    submit(&harness, &mut request);

    let mut uow = UnitOfWork::new();
    harness
        .registry
        .execute(&mut request, ActionName::Decline, &identities::receiver(), &mut uow)
        .expect("decline succeeds");
    uow.commit();

    let mut uow = UnitOfWork::new();
    let err = harness
        .registry
        .execute(&mut request, ActionName::Accept, &identities::receiver(), &mut uow)
        .expect_err("accept after decline is illegal");
    assert_eq!(
        err,
        RequestError::IllegalTransition {
            action: ActionName::Accept,
            state: RequestState::Declined,
        }
    );
    assert!(uow.operations().is_empty(), "handler never ran");
}

// ============================================================================
// Direct email operation
// ============================================================================

#[derive(Default)]
struct RecordingMailer {
    sent: std::sync::Mutex<Vec<EmailMessage>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &EmailMessage) -> Result<(), record_access_core::DeliveryError> {
        self.sent.lock().expect("mailer lock poisoned").push(message.clone());
        Ok(())
    }
}

#[test]
fn email_op_sends_on_commit_from_the_configured_sender() {
    let config = AccessConfig::default();
    let mailer = Arc::new(RecordingMailer::default());

    let mut uow = UnitOfWork::new();
    uow.register(Box::new(EmailOp::new(
        Arc::clone(&mailer) as Arc<dyn Mailer>,
        "ada@example.org",
        "Access granted",
        "<p>You have been granted access.</p>",
        "You have been granted access.",
        config.mail_default_sender.clone(),
    )));

    assert!(mailer.sent.lock().expect("mailer lock poisoned").is_empty());
    uow.commit();

    let sent = mailer.sent.lock().expect("mailer lock poisoned");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].sender, config.mail_default_sender);
    assert_eq!(sent[0].recipient, "ada@example.org");
}
