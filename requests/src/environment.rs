//! Environment dependencies for access-request actions.

use crate::config::AccessConfig;
use crate::providers::{
    ConsoleMailer, EventLogService, InMemoryEventLog, InMemoryRecordService, Mailer,
    NotificationDispatcher, RecordingDispatcher, RecordService,
};
use record_access_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Injected dependencies for the access-request actions.
///
/// All collaborators are trait objects so tests can substitute in-memory
/// implementations and a fixed clock.
#[derive(Clone)]
pub struct RequestEnvironment {
    /// Record service (read, grants, secret links, reindex).
    pub records: Arc<dyn RecordService>,
    /// Request timeline event log.
    pub events: Arc<dyn EventLogService>,
    /// Notification dispatch.
    pub notifications: Arc<dyn NotificationDispatcher>,
    /// Email transport for direct email operations.
    pub mailer: Arc<dyn Mailer>,
    /// Clock for expiration-date computation.
    pub clock: Arc<dyn Clock>,
    /// Engine configuration.
    pub config: AccessConfig,
}

impl RequestEnvironment {
    /// Creates a new `RequestEnvironment`.
    #[must_use]
    pub fn new(
        records: Arc<dyn RecordService>,
        events: Arc<dyn EventLogService>,
        notifications: Arc<dyn NotificationDispatcher>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        config: AccessConfig,
    ) -> Self {
        Self {
            records,
            events,
            notifications,
            mailer,
            clock,
            config,
        }
    }

    /// An environment wired to in-memory providers and the system clock.
    ///
    /// Intended for development setups and doc examples; tests usually
    /// build their own so they keep handles to the concrete providers.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRecordService::new()),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(RecordingDispatcher::new()),
            Arc::new(ConsoleMailer::new()),
            Arc::new(SystemClock),
            AccessConfig::default(),
        )
    }
}
