//! Access-artifact issuance.
//!
//! Mints the durable artifact when a request is accepted: a tokenized
//! secret link for guest requests, a permanent grant for user requests.
//! Issuance always runs with the system identity, independent of the
//! deciding identity's own permissions, so a receiver with community-level
//! authority can approve a request without holding grant-management rights
//! on the record. The action has already authorized the accept invocation
//! before this step runs.

use crate::providers::{GrantData, GrantSubject, Record, RecordService, SecretLinkData};
use chrono::{Days, NaiveDate};
use record_access_core::{AccessRequest, EntityRef, Identity, RequestError, Result};
use std::sync::Arc;
use tracing::info;

/// A minted secret link together with its externally resolvable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSecretLink {
    /// URL granting access to the record, carrying the link token.
    pub access_url: String,
    /// The link token itself.
    pub token: String,
    /// Expiration date; `None` means the link never expires.
    pub expires_at: Option<NaiveDate>,
}

/// Issues access artifacts against the record service.
pub struct ArtifactIssuer {
    records: Arc<dyn RecordService>,
}

impl ArtifactIssuer {
    /// Create an issuer over the given record service.
    #[must_use]
    pub fn new(records: Arc<dyn RecordService>) -> Self {
        Self { records }
    }

    /// Issue a secret link for an accepted guest request.
    ///
    /// The expiration is computed from calendar dates only: `today` plus
    /// the payload's `secret_link_expiration` days, omitted entirely when
    /// the value is zero (zero means the link never expires). A missing
    /// value behaves as zero. The description embeds the guest's declared
    /// name and email as captured in the payload at submission time, so
    /// later identity changes never alter it.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Validation`] for a missing or malformed
    /// payload field and [`RequestError::Resolution`] when the record
    /// service rejects the link creation.
    pub fn issue_secret_link(
        &self,
        request: &AccessRequest,
        record: &Record,
        today: NaiveDate,
    ) -> Result<IssuedSecretLink> {
        let permission = required_field(request, "permission")?;
        let full_name = required_field(request, "full_name")?;
        let email = required_field(request, "email")?;

        // The description can be edited by the record owner later, so it
        // is stored as plain text rather than rendered from a template.
        let data = SecretLinkData {
            permission: permission.to_string(),
            description: format!("Requested by guest: {full_name} ({email})"),
            origin: request.origin(),
            expires_at: expiration_date(request, today)?,
        };

        let link = self
            .records
            .create_secret_link(&Identity::system(), &record.id, data)?;
        let access_url = format!("{}?token={}", record.self_html, link.token);

        info!(
            request_id = %request.id,
            record_id = %record.id,
            expires_at = ?link.data.expires_at,
            "secret link issued"
        );
        Ok(IssuedSecretLink {
            access_url,
            token: link.token,
            expires_at: link.data.expires_at,
        })
    }

    /// Issue a permanent grant for an accepted user request.
    ///
    /// The creator reference is resolved to a concrete user identity; the
    /// grant names that user as subject and never expires.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Resolution`] when the creator is not a user
    /// reference or the record service rejects the grant, and
    /// [`RequestError::Validation`] for a missing permission field.
    pub fn issue_grant(&self, request: &AccessRequest, record: &Record) -> Result<()> {
        let EntityRef::User(creator_id) = &request.created_by else {
            return Err(RequestError::resolution(format!(
                "creator {} is not a user",
                request.created_by
            )));
        };
        let permission = required_field(request, "permission")?;

        let data = GrantData {
            permission: permission.to_string(),
            subject: GrantSubject {
                subject_type: "user".to_string(),
                id: creator_id.clone(),
            },
            origin: request.origin(),
        };
        self.records
            .create_grant(&Identity::system(), &record.id, data)?;

        info!(
            request_id = %request.id,
            record_id = %record.id,
            subject_id = %creator_id,
            "grant issued"
        );
        Ok(())
    }
}

fn required_field<'a>(request: &'a AccessRequest, field: &str) -> Result<&'a str> {
    request
        .payload
        .get(field)
        .map(String::as_str)
        .ok_or_else(|| RequestError::validation(field, "missing required field"))
}

/// The link expiration date, or `None` for a never-expiring link.
fn expiration_date(request: &AccessRequest, today: NaiveDate) -> Result<Option<NaiveDate>> {
    let raw = request
        .payload
        .get("secret_link_expiration")
        .map_or("0", String::as_str);
    let days: u64 = raw
        .parse()
        .map_err(|_| RequestError::validation("secret_link_expiration", "Not a valid number of days."))?;
    if days == 0 {
        return Ok(None);
    }
    today
        .checked_add_days(Days::new(days))
        .map(Some)
        .ok_or_else(|| {
            RequestError::validation("secret_link_expiration", "Not a valid number of days.")
        })
}
