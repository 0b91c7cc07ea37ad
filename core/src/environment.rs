//! Environment traits injected into actions.

use chrono::{DateTime, Utc};

/// Clock trait - abstracts time operations for testability.
///
/// Production code uses a system clock; tests inject a fixed clock so that
/// expiration dates are deterministic.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Get the current calendar date (no time component).
    ///
    /// Secret-link expirations are computed from calendar dates only.
    fn today(&self) -> chrono::NaiveDate {
        self.now().date_naive()
    }
}

/// System clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
