//! Collaborator interfaces consumed by the access-request actions.
//!
//! Each provider is a trait plus at least one implementation: an in-memory
//! or console variant for tests and development, and a real transport where
//! one belongs to this crate (SMTP).

pub mod events;
pub mod mailer;
pub mod notifications;
pub mod records;

pub use events::{EventLogService, EventType, InMemoryEventLog, RequestEvent};
pub use mailer::{ConsoleMailer, EmailMessage, Mailer, SmtpMailer};
pub use notifications::{
    Notification, NotificationDispatcher, NotificationTemplate, RecordingDispatcher,
};
pub use records::{
    GrantData, GrantSubject, InMemoryRecordService, Record, RecordService, SecretLink,
    SecretLinkData,
};
