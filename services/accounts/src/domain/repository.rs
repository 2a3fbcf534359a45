#![allow(async_fn_in_trait)]

use lettly_domain::id::{AccountId, ExternalId, IdentityId};

use crate::domain::account::Account;
use crate::domain::types::{Identity, OutboxEvent};
use crate::error::AccountsServiceError;

/// Port for looking up person records in the identity store.
pub trait IdentityPort: Send + Sync {
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, AccountsServiceError>;
}

/// Repository for privileged accounts.
///
/// Implementations must enforce uniqueness of `identity_id` and `external_id`
/// and write account, new history rows and outbox events atomically.
pub trait AccountRepository: Send + Sync {
    /// Load by account id, e.g. the acting account for a permission check.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountsServiceError>;

    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Account>, AccountsServiceError>;

    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<Account>, AccountsServiceError>;

    async fn external_id_exists(
        &self,
        external_id: &ExternalId,
    ) -> Result<bool, AccountsServiceError>;

    /// Insert a new account with its outbox events (same transaction).
    ///
    /// Fails with `AccountAlreadyExists` if the identity already has an
    /// account, `ExternalIdTaken` if the external id is in use.
    async fn insert(
        &self,
        account: &Account,
        events: &[OutboxEvent],
    ) -> Result<(), AccountsServiceError>;

    /// Persist an updated account if it is still at `expected_version`.
    ///
    /// Appends history entries not yet stored and writes the outbox events
    /// in the same transaction. Fails with `VersionConflict` when another
    /// writer got there first.
    async fn save(
        &self,
        account: &Account,
        expected_version: i64,
        events: &[OutboxEvent],
    ) -> Result<(), AccountsServiceError>;
}
