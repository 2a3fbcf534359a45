//! Caller-side standing checks.
//!
//! The lifecycle use cases apply any transition they are asked to. Request
//! handlers decide whether the acting account may ask, using the data the
//! account exposes.

use lettly_domain::id::AccountId;
use lettly_domain::permission::Permission;

use crate::domain::account::Account;
use crate::error::AccountsServiceError;

/// Only the account that imposed a suspension may lift it.
pub fn ensure_may_lift_suspension(
    target: &Account,
    actor: AccountId,
) -> Result<(), AccountsServiceError> {
    match target.suspended_by() {
        Some(suspender) if suspender == actor => Ok(()),
        _ => Err(AccountsServiceError::NotSuspender),
    }
}

/// The acting account must currently hold `permission`.
pub fn ensure_permission(
    actor: &Account,
    permission: Permission,
) -> Result<(), AccountsServiceError> {
    if actor.has_permission(permission) {
        Ok(())
    } else {
        Err(AccountsServiceError::MissingPermission(permission))
    }
}
