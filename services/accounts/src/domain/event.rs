//! Lifecycle events emitted by account transitions.
//!
//! The core never notifies anyone itself: each event becomes an
//! [`OutboxEvent`] written in the same transaction as the account update, and
//! an external notifier consumes the outbox.

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use lettly_domain::id::AccountId;
use lettly_domain::role::Role;

use crate::domain::account::Account;
use crate::domain::types::OutboxEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum LifecycleEvent {
    #[serde(rename = "account_created")]
    Created {
        role: Role,
        actor: Option<AccountId>,
    },
    #[serde(rename = "account_activated")]
    Activated { actor: AccountId },
    #[serde(rename = "role_changed")]
    RoleChanged {
        from: Role,
        to: Role,
        actor: AccountId,
        reason: Option<String>,
    },
    #[serde(rename = "account_suspended")]
    Suspended { actor: AccountId, reason: String },
    #[serde(rename = "suspension_lifted")]
    SuspensionLifted { actor: AccountId },
    #[serde(rename = "account_deactivated")]
    Deactivated { actor: AccountId, reason: String },
    #[serde(rename = "account_reactivated")]
    Reactivated { actor: AccountId },
    #[serde(rename = "access_revoked")]
    AccessRevoked { actor: AccountId, reason: String },
    #[serde(rename = "access_restored")]
    AccessRestored { actor: AccountId },
}

impl LifecycleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "account_created",
            Self::Activated { .. } => "account_activated",
            Self::RoleChanged { .. } => "role_changed",
            Self::Suspended { .. } => "account_suspended",
            Self::SuspensionLifted { .. } => "suspension_lifted",
            Self::Deactivated { .. } => "account_deactivated",
            Self::Reactivated { .. } => "account_reactivated",
            Self::AccessRevoked { .. } => "access_revoked",
            Self::AccessRestored { .. } => "access_restored",
        }
    }

    /// Build the outbox row for this event against the account as written.
    ///
    /// The idempotency key includes the account version, so replaying the
    /// same write cannot enqueue a second notification.
    pub fn to_outbox(&self, account: &Account) -> OutboxEvent {
        let kind = self.kind();
        OutboxEvent {
            id: Uuid::new_v4(),
            account_id: account.id(),
            kind: kind.to_owned(),
            payload: json!({
                "event": self,
                "account_id": account.id(),
                "external_id": account.external_id(),
                "identity_id": account.identity_id(),
                "email": account.email(),
                "display_name": account.display_name(),
            }),
            idempotency_key: format!("{kind}:{}:{}", account.id(), account.version()),
        }
    }
}
