//! API identifier records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{RegistryError, RegistryResult};

/// A stored API identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiIdRecord {
    /// The identifier handed out to the customer.
    pub api_id: Uuid,
    /// Owner of the identifier.
    pub customer_id: String,
    /// Cleared when the identifier is revoked.
    pub valid: bool,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Time of the last change.
    pub modified: DateTime<Utc>,
}

impl ApiIdRecord {
    /// A fresh, valid record for `customer_id` created at `now`.
    #[must_use]
    pub fn issue(customer_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            api_id: Uuid::new_v4(),
            customer_id: customer_id.into(),
            valid: true,
            created: now,
            modified: now,
        }
    }

    /// Mark the record revoked at `now`.
    pub fn revoke(&mut self, now: DateTime<Utc>) {
        self.valid = false;
        self.modified = now;
    }
}

/// The public view of a record. The owning customer is not echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIdResponse {
    /// Hyphenated UUID.
    pub api_id: String,
    /// Whether the identifier may still be used.
    pub valid: bool,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Time of the last change.
    pub modified: DateTime<Utc>,
}

impl From<&ApiIdRecord> for ApiIdResponse {
    fn from(record: &ApiIdRecord) -> Self {
        Self {
            api_id: record.api_id.to_string(),
            valid: record.valid,
            created: record.created,
            modified: record.modified,
        }
    }
}

/// Parse a textual API identifier.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidApiId`] if `value` is not a UUID.
pub fn parse_api_id(value: &str) -> RegistryResult<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| RegistryError::InvalidApiId(value.to_owned()))
}
