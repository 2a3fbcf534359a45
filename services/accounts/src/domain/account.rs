//! The privileged account and its lifecycle state machine.
//!
//! Every transition validates first and only then mutates, so a failed call
//! leaves the account exactly as it was. Transitions return the
//! [`LifecycleEvent`] to enqueue; persistence is the caller's job.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use lettly_core::serde::{opt_to_rfc3339_ms, to_rfc3339_ms};
use lettly_domain::id::{AccountId, ExternalId, IdentityId};
use lettly_domain::permission::Permission;
use lettly_domain::role::{self, AccessLevel, Resolution, Role};

use crate::domain::credential::{self, CredentialHash};
use crate::domain::event::LifecycleEvent;
use crate::domain::types::{HistoryEntry, Identity};
use crate::error::AccountsServiceError;

/// Derived lifecycle status. Deactivation outranks suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Activated,
    Suspended,
    Deactivated,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Activated => "activated",
            Self::Suspended => "suspended",
            Self::Deactivated => "deactivated",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who did something, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stamp {
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub at: DateTime<Utc>,
    pub by: AccountId,
}

/// Latest suspension. Kept after the suspension is lifted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suspension {
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub at: DateTime<Utc>,
    pub by: AccountId,
    pub reason: String,
    pub lifted: Option<Stamp>,
}

/// Latest deactivation. Kept after reactivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deactivation {
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub at: DateTime<Utc>,
    pub by: AccountId,
    pub reason: String,
    pub reactivated: Option<Stamp>,
}

/// Input for [`Account::new`].
pub struct NewAccount<'a> {
    pub id: AccountId,
    pub identity: &'a Identity,
    pub external_id: ExternalId,
    pub role: Role,
    pub credential: Option<CredentialHash>,
    pub now: DateTime<Utc>,
}

/// Account snapshot. Serializes without the credential hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub(crate) id: AccountId,
    pub(crate) identity_id: IdentityId,
    pub(crate) external_id: ExternalId,
    pub(crate) display_name: String,
    pub(crate) email: String,
    pub(crate) role: Role,
    pub(crate) access_level: AccessLevel,
    pub(crate) permissions: BTreeSet<Permission>,
    pub(crate) access_revoked: bool,
    pub(crate) activation: Option<Stamp>,
    pub(crate) suspended: bool,
    pub(crate) suspension: Option<Suspension>,
    pub(crate) deactivated: bool,
    pub(crate) deactivation: Option<Deactivation>,
    #[serde(rename = "credential_present", serialize_with = "is_present")]
    pub(crate) credential: Option<CredentialHash>,
    #[serde(serialize_with = "opt_to_rfc3339_ms")]
    pub(crate) onboarded_at: Option<DateTime<Utc>>,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) version: i64,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub(crate) created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub(crate) updated_at: DateTime<Utc>,
}

fn is_present<S: Serializer>(credential: &Option<CredentialHash>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_bool(credential.is_some())
}

fn non_empty_reason(reason: &str) -> Result<String, AccountsServiceError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AccountsServiceError::EmptyReason);
    }
    Ok(reason.to_owned())
}

impl Account {
    /// A fresh, pending account with permissions resolved from `role`.
    pub fn new(input: NewAccount<'_>) -> Self {
        let Resolution {
            permissions,
            access_level,
        } = role::resolve(input.role);
        Self {
            id: input.id,
            identity_id: input.identity.id,
            external_id: input.external_id,
            display_name: input.identity.display_name(),
            email: input.identity.email.clone(),
            role: input.role,
            access_level,
            permissions,
            access_revoked: false,
            activation: None,
            suspended: false,
            suspension: None,
            deactivated: false,
            deactivation: None,
            credential: input.credential,
            onboarded_at: None,
            history: Vec::new(),
            version: 0,
            created_at: input.now,
            updated_at: input.now,
        }
    }

    // ── accessors ────────────────────────────────────────────────────────────

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    pub fn external_id(&self) -> &ExternalId {
        &self.external_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_access_revoked(&self) -> bool {
        self.access_revoked
    }

    pub fn is_activated(&self) -> bool {
        self.activation.is_some()
    }

    pub fn activation(&self) -> Option<&Stamp> {
        self.activation.as_ref()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn suspension(&self) -> Option<&Suspension> {
        self.suspension.as_ref()
    }

    /// The account that imposed the latest suspension.
    ///
    /// Callers use this to decide who may lift it; see
    /// [`crate::usecase::policy::ensure_may_lift_suspension`].
    pub fn suspended_by(&self) -> Option<AccountId> {
        self.suspension.as_ref().map(|s| s.by)
    }

    pub fn is_deactivated(&self) -> bool {
        self.deactivated
    }

    pub fn deactivation(&self) -> Option<&Deactivation> {
        self.deactivation.as_ref()
    }

    pub fn credential(&self) -> Option<&CredentialHash> {
        self.credential.as_ref()
    }

    pub fn credential_present(&self) -> bool {
        self.credential.is_some()
    }

    pub fn is_onboarded(&self) -> bool {
        self.onboarded_at.is_some()
    }

    pub fn onboarded_at(&self) -> Option<DateTime<Utc>> {
        self.onboarded_at
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn status(&self) -> AccountStatus {
        if self.deactivated {
            AccountStatus::Deactivated
        } else if self.suspended {
            AccountStatus::Suspended
        } else if self.activation.is_some() {
            AccountStatus::Activated
        } else {
            AccountStatus::Pending
        }
    }

    fn expect_status(
        &self,
        action: &'static str,
        allowed: &[AccountStatus],
    ) -> Result<(), AccountsServiceError> {
        let status = self.status();
        if allowed.contains(&status) {
            Ok(())
        } else {
            Err(AccountsServiceError::InvalidTransition { action, status })
        }
    }

    // ── derived state ────────────────────────────────────────────────────────

    /// Bring `permissions` and `access_level` back in line with `role`.
    ///
    /// Revoked accounts resolve to nothing. Returns `true` if anything changed.
    pub fn sync_permissions(&mut self) -> bool {
        let Resolution {
            permissions,
            access_level,
        } = if self.access_revoked {
            Resolution::none()
        } else {
            role::resolve(self.role)
        };
        if self.permissions == permissions && self.access_level == access_level {
            return false;
        }
        self.permissions = permissions;
        self.access_level = access_level;
        true
    }

    /// Stamp a successful write: bumps the version and `updated_at`.
    pub fn mark_written(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }

    // ── transitions ──────────────────────────────────────────────────────────

    /// pending → activated.
    pub fn activate(
        &mut self,
        actor: AccountId,
        now: DateTime<Utc>,
    ) -> Result<LifecycleEvent, AccountsServiceError> {
        self.expect_status("activate", &[AccountStatus::Pending])?;
        self.activation = Some(Stamp { at: now, by: actor });
        Ok(LifecycleEvent::Activated { actor })
    }

    /// activated → suspended. `activated` stays set.
    pub fn suspend(
        &mut self,
        actor: AccountId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<LifecycleEvent, AccountsServiceError> {
        let reason = non_empty_reason(reason)?;
        self.expect_status("suspend", &[AccountStatus::Activated])?;
        self.suspended = true;
        self.suspension = Some(Suspension {
            at: now,
            by: actor,
            reason: reason.clone(),
            lifted: None,
        });
        Ok(LifecycleEvent::Suspended { actor, reason })
    }

    /// suspended → activated.
    ///
    /// Does not check that `actor` is the suspender; that rule belongs to the
    /// caller.
    pub fn lift_suspension(
        &mut self,
        actor: AccountId,
        now: DateTime<Utc>,
    ) -> Result<LifecycleEvent, AccountsServiceError> {
        self.expect_status("lift suspension of", &[AccountStatus::Suspended])?;
        self.suspended = false;
        if let Some(suspension) = self.suspension.as_mut() {
            suspension.lifted = Some(Stamp { at: now, by: actor });
        }
        Ok(LifecycleEvent::SuspensionLifted { actor })
    }

    /// activated | suspended → deactivated.
    pub fn deactivate(
        &mut self,
        actor: AccountId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<LifecycleEvent, AccountsServiceError> {
        let reason = non_empty_reason(reason)?;
        self.expect_status(
            "deactivate",
            &[AccountStatus::Activated, AccountStatus::Suspended],
        )?;
        self.deactivated = true;
        self.deactivation = Some(Deactivation {
            at: now,
            by: actor,
            reason: reason.clone(),
            reactivated: None,
        });
        Ok(LifecycleEvent::Deactivated { actor, reason })
    }

    /// deactivated → activated. Also clears a pending suspension; the
    /// deactivation and suspension records stay for audit.
    pub fn reactivate(
        &mut self,
        actor: AccountId,
        now: DateTime<Utc>,
    ) -> Result<LifecycleEvent, AccountsServiceError> {
        self.expect_status("reactivate", &[AccountStatus::Deactivated])?;
        let stamp = Stamp { at: now, by: actor };
        self.deactivated = false;
        if let Some(deactivation) = self.deactivation.as_mut() {
            deactivation.reactivated = Some(stamp);
        }
        if self.suspended {
            self.suspended = false;
            if let Some(suspension) = self.suspension.as_mut() {
                suspension.lifted = Some(stamp);
            }
        }
        Ok(LifecycleEvent::Reactivated { actor })
    }

    /// Change the role, recording the previous role in `history`.
    pub fn assign_role(
        &mut self,
        role: Role,
        actor: AccountId,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<LifecycleEvent, AccountsServiceError> {
        if role == self.role {
            return Err(AccountsServiceError::RoleUnchanged);
        }
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_owned);
        let from = self.role;
        self.history.push(HistoryEntry {
            role: from,
            changed_at: now,
            changed_by: actor,
            reason: reason.clone(),
        });
        self.role = role;
        self.sync_permissions();
        Ok(LifecycleEvent::RoleChanged {
            from,
            to: role,
            actor,
            reason,
        })
    }

    /// Strip every permission while keeping the role, e.g. when the identity
    /// is being demoted back to a regular user.
    pub fn revoke_access(
        &mut self,
        actor: AccountId,
        reason: &str,
    ) -> Result<LifecycleEvent, AccountsServiceError> {
        let reason = non_empty_reason(reason)?;
        if self.access_revoked {
            return Err(AccountsServiceError::AccessAlreadyRevoked);
        }
        self.access_revoked = true;
        self.sync_permissions();
        Ok(LifecycleEvent::AccessRevoked { actor, reason })
    }

    pub fn restore_access(
        &mut self,
        actor: AccountId,
    ) -> Result<LifecycleEvent, AccountsServiceError> {
        if !self.access_revoked {
            return Err(AccountsServiceError::AccessNotRevoked);
        }
        self.access_revoked = false;
        self.sync_permissions();
        Ok(LifecycleEvent::AccessRestored { actor })
    }

    pub fn complete_onboarding(&mut self, now: DateTime<Utc>) -> Result<(), AccountsServiceError> {
        if self.onboarded_at.is_some() {
            return Err(AccountsServiceError::AlreadyOnboarded);
        }
        self.onboarded_at = Some(now);
        Ok(())
    }

    /// Replace the stored credential with an already-computed hash.
    pub fn set_credential(&mut self, hash: CredentialHash) {
        self.credential = Some(hash);
    }

    pub fn verify_credential(&self, candidate: &str) -> bool {
        credential::verify_credential(candidate, self.credential.as_ref())
    }
}
