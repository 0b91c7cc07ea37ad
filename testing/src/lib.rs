//! # Record Access Testing
//!
//! Testing utilities and fixtures for the record access-request crates.
//!
//! This crate provides:
//! - A deterministic [`FixedClock`] implementation of the core `Clock` trait
//! - Canned identities for the roles that appear in access-request tests
//!
//! ## Example
//!
//! ```
//! use record_access_testing::{mocks::FixedClock, test_clock};
//! use record_access_core::Clock;
//!
//! let clock = test_clock();
//! assert_eq!(clock.now(), clock.now());
//! ```

use chrono::{DateTime, Utc};
use record_access_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making expiration-date assertions
    /// reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use record_access_testing::mocks::FixedClock;
    /// use record_access_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now()); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC).
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Canned identities for access-request tests.
pub mod identities {
    use record_access_core::{Capability, Identity};

    /// The requesting user in user-variant scenarios.
    #[must_use]
    pub fn requester() -> Identity {
        Identity::user("1001")
    }

    /// The deciding receiver.
    #[must_use]
    pub fn receiver() -> Identity {
        Identity::user("2002").with_capability(Capability::ManageAccessOptions)
    }

    /// A still-logged-in participant of a guest flow.
    #[must_use]
    pub fn authenticated_viewer() -> Identity {
        Identity::user("3003")
    }

    /// An anonymous guest.
    #[must_use]
    pub fn anonymous() -> Identity {
        Identity::guest()
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
