//! Record service interface and the in-memory implementation.
//!
//! The real record store, its permission checks, and its search indexer
//! live outside this crate; actions only see this trait. The in-memory
//! implementation backs tests and development setups.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::NaiveDate;
use rand::RngCore;
use record_access_core::{DeliveryError, Identity, RequestError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// Snapshot of a record as seen by the request engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record id.
    pub id: String,
    /// Id of the parent aggregate that owns all versions of this record.
    pub parent_id: String,
    /// Current display title.
    pub title: String,
    /// Canonical self link of the record's landing page.
    pub self_html: String,
}

/// Subject of a permission grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSubject {
    /// Subject type; always `"user"` for grants minted here.
    #[serde(rename = "type")]
    pub subject_type: String,
    /// Subject id.
    pub id: String,
}

/// Data for a permanent permission grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantData {
    /// Granted permission level.
    pub permission: String,
    /// The user receiving the grant.
    pub subject: GrantSubject,
    /// Origin tag referencing the request that caused this grant.
    pub origin: String,
}

/// Data for a tokenized secret link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretLinkData {
    /// Permission level the link grants.
    pub permission: String,
    /// Free-text description shown to the record owner.
    pub description: String,
    /// Origin tag referencing the request that caused this link.
    pub origin: String,
    /// Expiration date; `None` means the link never expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDate>,
}

/// A minted secret link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretLink {
    /// The capability token carried in access URLs.
    pub token: String,
    /// The link data as stored.
    pub data: SecretLinkData,
}

/// The record service consumed by access-request actions.
///
/// `read` is privilege-checked by the implementation; grant and link
/// creation are invoked with the system identity by the issuer (the accept
/// action has already authorized the deciding identity).
pub trait RecordService: Send + Sync {
    /// Read a record snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Resolution`] when the record does not exist
    /// or the identity may not read it.
    fn read(&self, identity: &Identity, id: &str) -> Result<Record>;

    /// Create a permanent permission grant on a record.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Resolution`] when the record does not exist.
    fn create_grant(&self, identity: &Identity, record_id: &str, data: GrantData) -> Result<()>;

    /// Create a tokenized secret link on a record.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Resolution`] when the record does not exist.
    fn create_secret_link(
        &self,
        identity: &Identity,
        record_id: &str,
        data: SecretLinkData,
    ) -> Result<SecretLink>;

    /// Mark the parent aggregate dirty and schedule a search-index update.
    ///
    /// Only ever called post-commit, from a registered operation.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Reindex`] when the index update cannot be
    /// scheduled.
    fn reindex_parent(&self, parent_id: &str) -> std::result::Result<(), DeliveryError>;
}

/// Mint a URL-safe secret-link token.
#[must_use]
pub fn mint_token() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// In-memory record service for tests and development.
///
/// Stores records, minted grants, minted secret links, and the parent ids
/// that have been reindexed, all inspectable from tests.
#[derive(Default)]
pub struct InMemoryRecordService {
    records: Mutex<HashMap<String, Record>>,
    grants: Mutex<Vec<(String, GrantData)>>,
    links: Mutex<Vec<(String, SecretLink)>>,
    reindexed: Mutex<Vec<String>>,
}

impl InMemoryRecordService {
    /// Create an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned, which only happens after a
    /// panic on another thread.
    #[allow(clippy::expect_used)]
    pub fn insert(&self, record: Record) {
        self.records
            .lock()
            .expect("record lock poisoned")
            .insert(record.id.clone(), record);
    }

    /// Grants minted so far, as `(record_id, data)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn grants(&self) -> Vec<(String, GrantData)> {
        self.grants.lock().expect("grant lock poisoned").clone()
    }

    /// Secret links minted so far, as `(record_id, link)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn links(&self) -> Vec<(String, SecretLink)> {
        self.links.lock().expect("link lock poisoned").clone()
    }

    /// Parent ids that have been reindexed, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn reindexed(&self) -> Vec<String> {
        self.reindexed.lock().expect("reindex lock poisoned").clone()
    }
}

#[allow(clippy::expect_used)] // lock poisoning only follows a prior panic
impl RecordService for InMemoryRecordService {
    fn read(&self, _identity: &Identity, id: &str) -> Result<Record> {
        self.records
            .lock()
            .expect("record lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| RequestError::resolution(format!("record:{id}")))
    }

    fn create_grant(&self, _identity: &Identity, record_id: &str, data: GrantData) -> Result<()> {
        if !self
            .records
            .lock()
            .expect("record lock poisoned")
            .contains_key(record_id)
        {
            return Err(RequestError::resolution(format!("record:{record_id}")));
        }
        info!(record_id, origin = %data.origin, "grant created");
        self.grants
            .lock()
            .expect("grant lock poisoned")
            .push((record_id.to_string(), data));
        Ok(())
    }

    fn create_secret_link(
        &self,
        _identity: &Identity,
        record_id: &str,
        data: SecretLinkData,
    ) -> Result<SecretLink> {
        if !self
            .records
            .lock()
            .expect("record lock poisoned")
            .contains_key(record_id)
        {
            return Err(RequestError::resolution(format!("record:{record_id}")));
        }
        let link = SecretLink {
            token: mint_token(),
            data,
        };
        info!(record_id, origin = %link.data.origin, "secret link created");
        self.links
            .lock()
            .expect("link lock poisoned")
            .push((record_id.to_string(), link.clone()));
        Ok(link)
    }

    fn reindex_parent(&self, parent_id: &str) -> std::result::Result<(), DeliveryError> {
        self.reindexed
            .lock()
            .expect("reindex lock poisoned")
            .push(parent_id.to_string());
        Ok(())
    }
}
