use anyhow::Context as _;

use lettly_domain::id::IdentityId;

use crate::domain::account::Account;
use crate::domain::credential::{self, CredentialHash};
use crate::domain::repository::AccountRepository;
use crate::error::AccountsServiceError;
use crate::usecase::transition;

/// Hash on the blocking pool; bcrypt at cost 12 takes a few hundred ms.
pub(crate) async fn hash_in_background(
    plaintext: String,
    cost: u32,
) -> Result<CredentialHash, AccountsServiceError> {
    tokio::task::spawn_blocking(move || credential::hash_credential(&plaintext, cost))
        .await
        .context("credential hashing task")?
}

// ── SetCredential ────────────────────────────────────────────────────────────

pub struct SetCredentialInput {
    pub identity_id: IdentityId,
    pub credential: String,
}

pub struct SetCredentialUseCase<A: AccountRepository> {
    pub accounts: A,
    pub cost: u32,
}

impl<A: AccountRepository> SetCredentialUseCase<A> {
    pub async fn execute(&self, input: SetCredentialInput) -> Result<Account, AccountsServiceError> {
        // Hash before loading so the account is held for as short as possible.
        let hash = hash_in_background(input.credential, self.cost).await?;
        transition::apply(&self.accounts, input.identity_id, "set_credential", |account, _| {
            account.set_credential(hash);
            Ok(None)
        })
        .await
    }
}

// ── VerifyCredential ─────────────────────────────────────────────────────────

pub struct VerifyCredentialInput {
    pub identity_id: IdentityId,
    pub candidate: String,
}

pub struct VerifyCredentialUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> VerifyCredentialUseCase<A> {
    /// `Ok(false)` for a wrong candidate or an account without a credential.
    pub async fn execute(&self, input: VerifyCredentialInput) -> Result<bool, AccountsServiceError> {
        let account = self
            .accounts
            .find_by_identity(input.identity_id)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)?;
        let Some(stored) = account.credential().cloned() else {
            return Ok(false);
        };
        let candidate = input.candidate;
        let matched = tokio::task::spawn_blocking(move || {
            credential::verify_credential(&candidate, Some(&stored))
        })
        .await
        .context("credential verification task")?;
        Ok(matched)
    }
}
