use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use lettly_accounts::config::AccountSettings;
use lettly_accounts::domain::account::Account;
use lettly_accounts::domain::repository::{AccountRepository, IdentityPort};
use lettly_accounts::domain::types::{Identity, OutboxEvent};
use lettly_accounts::error::AccountsServiceError;
use lettly_accounts::usecase::account::{CreateAccountInput, CreateAccountUseCase};
use lettly_domain::id::{AccountId, ExternalId, IdentityId};

// ── MockAccountRepo ──────────────────────────────────────────────────────────

/// In-memory account store with the same uniqueness and version rules as the
/// database repository. Clones share state.
#[derive(Clone, Default)]
pub struct MockAccountRepo {
    pub accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
    pub outbox: Arc<Mutex<Vec<OutboxEvent>>>,
    /// Number of upcoming `external_id_exists` checks that report a collision.
    pub collisions: Arc<Mutex<u32>>,
}

impl MockAccountRepo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_collisions(count: u32) -> Self {
        let repo = Self::default();
        *repo.collisions.lock().unwrap() = count;
        repo
    }

    /// Returns a shared handle to the outbox for post-execution inspection.
    pub fn outbox_handle(&self) -> Arc<Mutex<Vec<OutboxEvent>>> {
        Arc::clone(&self.outbox)
    }

    pub fn outbox_kinds(&self) -> Vec<String> {
        self.outbox
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.kind.clone())
            .collect()
    }

    pub fn stored(&self, identity_id: IdentityId) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.identity_id() == identity_id)
            .cloned()
    }
}

impl AccountRepository for MockAccountRepo {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountsServiceError> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Account>, AccountsServiceError> {
        Ok(self.stored(identity_id))
    }

    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<Account>, AccountsServiceError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.external_id() == external_id)
            .cloned())
    }

    async fn external_id_exists(
        &self,
        external_id: &ExternalId,
    ) -> Result<bool, AccountsServiceError> {
        let mut collisions = self.collisions.lock().unwrap();
        if *collisions > 0 {
            *collisions -= 1;
            return Ok(true);
        }
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .any(|a| a.external_id() == external_id))
    }

    async fn insert(
        &self,
        account: &Account,
        events: &[OutboxEvent],
    ) -> Result<(), AccountsServiceError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .values()
            .any(|a| a.identity_id() == account.identity_id())
        {
            return Err(AccountsServiceError::AccountAlreadyExists);
        }
        if accounts
            .values()
            .any(|a| a.external_id() == account.external_id())
        {
            return Err(AccountsServiceError::ExternalIdTaken);
        }
        accounts.insert(account.id(), account.clone());
        self.outbox.lock().unwrap().extend_from_slice(events);
        Ok(())
    }

    async fn save(
        &self,
        account: &Account,
        expected_version: i64,
        events: &[OutboxEvent],
    ) -> Result<(), AccountsServiceError> {
        let mut accounts = self.accounts.lock().unwrap();
        let current = accounts
            .get(&account.id())
            .ok_or(AccountsServiceError::AccountNotFound)?;
        if current.version() != expected_version {
            return Err(AccountsServiceError::VersionConflict);
        }
        accounts.insert(account.id(), account.clone());
        self.outbox.lock().unwrap().extend_from_slice(events);
        Ok(())
    }
}

// ── MockIdentityPort ─────────────────────────────────────────────────────────

pub struct MockIdentityPort {
    pub identities: Vec<Identity>,
}

impl MockIdentityPort {
    pub fn new(identities: Vec<Identity>) -> Self {
        Self { identities }
    }

    pub fn empty() -> Self {
        Self { identities: vec![] }
    }
}

impl IdentityPort for MockIdentityPort {
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, AccountsServiceError> {
        Ok(self.identities.iter().find(|i| i.id == id).cloned())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_identity() -> Identity {
    Identity {
        id: IdentityId(Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap()),
        first_name: "Ada".to_owned(),
        last_name: "Byron".to_owned(),
        email: "ada@example.com".to_owned(),
        phone: None,
        email_verified: true,
    }
}

pub fn other_identity() -> Identity {
    Identity {
        id: IdentityId(Uuid::parse_str("00000000-0000-0000-0000-000000000002").unwrap()),
        first_name: "Grace".to_owned(),
        last_name: "Hopper".to_owned(),
        email: "grace@example.com".to_owned(),
        phone: Some("+15550100".to_owned()),
        email_verified: true,
    }
}

/// Cheap bcrypt cost so credential tests stay fast.
pub fn test_settings() -> AccountSettings {
    AccountSettings {
        credential_cost: 4,
        ..AccountSettings::default()
    }
}

pub fn actor(n: u128) -> AccountId {
    AccountId(Uuid::from_u128(0xA000 + n))
}

/// Create an account for `identity` through the real use case.
pub async fn seed_account(
    repo: &MockAccountRepo,
    identity: &Identity,
    role: &str,
    credential: Option<&str>,
) -> Account {
    CreateAccountUseCase {
        identities: MockIdentityPort::new(vec![identity.clone()]),
        accounts: repo.clone(),
        settings: test_settings(),
    }
    .execute(CreateAccountInput {
        identity_id: identity.id,
        role: role.to_owned(),
        actor: Some(actor(0)),
        credential: credential.map(str::to_owned),
    })
    .await
    .unwrap()
}
