use chrono::{DateTime, Utc};
use serde::Serialize;

use lettly_core::serde::to_rfc3339_ms;
use lettly_domain::id::{AccountId, IdentityId};
use lettly_domain::role::Role;

/// Person record an account is promoted from, as supplied by the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub email_verified: bool,
}

impl Identity {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_owned()
    }
}

/// One role-history row. `role` is the role held before the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub role: Role,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub changed_at: DateTime<Utc>,
    pub changed_by: AccountId,
    pub reason: Option<String>,
}

/// Outbox event for async delivery to the notifier (e.g. "you were suspended" email).
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEvent {
    pub id: uuid::Uuid,
    pub account_id: AccountId,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Length of the random part of an external id.
pub const EXTERNAL_ID_LEN: usize = 8;

/// Default prefix of generated external ids.
pub const DEFAULT_EXTERNAL_ID_PREFIX: &str = "ADM";

/// How many fresh external ids to try before giving up on creation.
pub const DEFAULT_EXTERNAL_ID_ATTEMPTS: u32 = 5;

/// bcrypt work factor for account credentials.
pub const DEFAULT_CREDENTIAL_COST: u32 = bcrypt::DEFAULT_COST;

/// bcrypt's accepted cost range.
pub const MIN_CREDENTIAL_COST: u32 = 4;
pub const MAX_CREDENTIAL_COST: u32 = 31;
