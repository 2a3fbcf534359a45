use chrono::{DateTime, Utc};
use tracing::info;

use lettly_domain::id::IdentityId;

use crate::domain::account::Account;
use crate::domain::event::LifecycleEvent;
use crate::domain::repository::AccountRepository;
use crate::error::AccountsServiceError;

/// Load → mutate → save for a single account.
///
/// `mutate` either applies fully and optionally yields an event, or fails and
/// nothing is written. Permissions are re-synced before the write so a stale
/// or empty set never reaches storage.
pub(crate) async fn apply<A, F>(
    accounts: &A,
    identity_id: IdentityId,
    operation: &'static str,
    mutate: F,
) -> Result<Account, AccountsServiceError>
where
    A: AccountRepository,
    F: FnOnce(&mut Account, DateTime<Utc>) -> Result<Option<LifecycleEvent>, AccountsServiceError>,
{
    let result = apply_inner(accounts, identity_id, operation, mutate).await;
    if let Err(ref e) = result {
        e.log_internal(operation);
    }
    result
}

async fn apply_inner<A, F>(
    accounts: &A,
    identity_id: IdentityId,
    operation: &'static str,
    mutate: F,
) -> Result<Account, AccountsServiceError>
where
    A: AccountRepository,
    F: FnOnce(&mut Account, DateTime<Utc>) -> Result<Option<LifecycleEvent>, AccountsServiceError>,
{
    let mut account = accounts
        .find_by_identity(identity_id)
        .await?
        .ok_or(AccountsServiceError::AccountNotFound)?;
    let expected_version = account.version();
    let now = Utc::now();

    let event = mutate(&mut account, now)?;
    account.sync_permissions();
    account.mark_written(now);

    let outbox: Vec<_> = event.iter().map(|e| e.to_outbox(&account)).collect();
    accounts.save(&account, expected_version, &outbox).await?;

    info!(
        account_id = %account.id(),
        external_id = %account.external_id(),
        operation,
        version = account.version(),
        status = %account.status(),
        "account updated"
    );
    Ok(account)
}
