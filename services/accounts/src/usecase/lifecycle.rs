//! Status transitions: activate, suspend, lift, deactivate, reactivate, and
//! access revocation. Each use case is a thin shell over the matching
//! [`Account`] transition.

use lettly_domain::id::{AccountId, IdentityId};

use crate::domain::account::Account;
use crate::domain::repository::AccountRepository;
use crate::error::AccountsServiceError;
use crate::usecase::transition;

/// Target account plus the acting account.
pub struct ActorInput {
    pub identity_id: IdentityId,
    pub actor: AccountId,
}

/// Same as [`ActorInput`] for transitions that require a reason.
pub struct ReasonedInput {
    pub identity_id: IdentityId,
    pub actor: AccountId,
    pub reason: String,
}

// ── Activate ─────────────────────────────────────────────────────────────────

pub struct ActivateAccountUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> ActivateAccountUseCase<A> {
    pub async fn execute(&self, input: ActorInput) -> Result<Account, AccountsServiceError> {
        transition::apply(&self.accounts, input.identity_id, "activate", |account, now| {
            account.activate(input.actor, now).map(Some)
        })
        .await
    }
}

// ── Suspend ──────────────────────────────────────────────────────────────────

pub struct SuspendAccountUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> SuspendAccountUseCase<A> {
    pub async fn execute(&self, input: ReasonedInput) -> Result<Account, AccountsServiceError> {
        transition::apply(&self.accounts, input.identity_id, "suspend", |account, now| {
            account.suspend(input.actor, &input.reason, now).map(Some)
        })
        .await
    }
}

// ── LiftSuspension ───────────────────────────────────────────────────────────

/// Lifts a suspension for any actor.
///
/// Only the suspender should be allowed to do this; callers enforce it with
/// [`crate::usecase::policy::ensure_may_lift_suspension`] before executing.
pub struct LiftSuspensionUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> LiftSuspensionUseCase<A> {
    pub async fn execute(&self, input: ActorInput) -> Result<Account, AccountsServiceError> {
        transition::apply(
            &self.accounts,
            input.identity_id,
            "lift_suspension",
            |account, now| account.lift_suspension(input.actor, now).map(Some),
        )
        .await
    }
}

// ── Deactivate ───────────────────────────────────────────────────────────────

pub struct DeactivateAccountUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> DeactivateAccountUseCase<A> {
    pub async fn execute(&self, input: ReasonedInput) -> Result<Account, AccountsServiceError> {
        transition::apply(&self.accounts, input.identity_id, "deactivate", |account, now| {
            account.deactivate(input.actor, &input.reason, now).map(Some)
        })
        .await
    }
}

// ── Reactivate ───────────────────────────────────────────────────────────────

pub struct ReactivateAccountUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> ReactivateAccountUseCase<A> {
    pub async fn execute(&self, input: ActorInput) -> Result<Account, AccountsServiceError> {
        transition::apply(&self.accounts, input.identity_id, "reactivate", |account, now| {
            account.reactivate(input.actor, now).map(Some)
        })
        .await
    }
}

// ── RevokeAccess / RestoreAccess ─────────────────────────────────────────────

pub struct RevokeAccessUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> RevokeAccessUseCase<A> {
    pub async fn execute(&self, input: ReasonedInput) -> Result<Account, AccountsServiceError> {
        transition::apply(&self.accounts, input.identity_id, "revoke_access", |account, _| {
            account.revoke_access(input.actor, &input.reason).map(Some)
        })
        .await
    }
}

pub struct RestoreAccessUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> RestoreAccessUseCase<A> {
    pub async fn execute(&self, input: ActorInput) -> Result<Account, AccountsServiceError> {
        transition::apply(&self.accounts, input.identity_id, "restore_access", |account, _| {
            account.restore_access(input.actor).map(Some)
        })
        .await
    }
}
