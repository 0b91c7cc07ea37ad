//! Entity references used by requests.
//!
//! A request never holds an ownership pointer to the entities it concerns;
//! it keeps typed references that collaborating services resolve on demand.

use serde::{Deserialize, Serialize};

/// The reference types a request slot may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefType {
    /// A registered user, referenced by user id.
    User,
    /// A community holding decision authority.
    Community,
    /// An email address standing in for an unauthenticated guest.
    Email,
    /// A record (the protected resource).
    Record,
}

impl RefType {
    /// Stable string form of the reference type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Community => "community",
            Self::Email => "email",
            Self::Record => "record",
        }
    }
}

/// A typed reference to an external entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    /// Reference to a user by id.
    User(String),
    /// Reference to a community by id.
    Community(String),
    /// Reference to a guest by email address.
    Email(String),
    /// Reference to a record by id.
    Record(String),
}

impl EntityRef {
    /// The type of this reference.
    #[must_use]
    pub const fn ref_type(&self) -> RefType {
        match self {
            Self::User(_) => RefType::User,
            Self::Community(_) => RefType::Community,
            Self::Email(_) => RefType::Email,
            Self::Record(_) => RefType::Record,
        }
    }

    /// The referenced id or address.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::User(id) | Self::Community(id) | Self::Email(id) | Self::Record(id) => id,
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.ref_type().as_str(), self.id())
    }
}
