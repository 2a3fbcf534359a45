use chrono::Utc;
use rand::RngExt;
use tracing::{info, warn};
use uuid::Uuid;

use lettly_domain::id::{AccountId, ExternalId, IdentityId};
use lettly_domain::role::Role;

use crate::config::AccountSettings;
use crate::domain::account::{Account, AccountStatus, NewAccount};
use crate::domain::event::LifecycleEvent;
use crate::domain::repository::{AccountRepository, IdentityPort};
use crate::domain::types::EXTERNAL_ID_LEN;
use crate::error::AccountsServiceError;
use crate::usecase::credential::hash_in_background;

/// Uppercase alphanumerics without look-alikes (0/O, 1/I).
const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub(crate) fn generate_external_id(prefix: &str) -> ExternalId {
    let mut rng = rand::rng();
    let code: String = (0..EXTERNAL_ID_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    ExternalId::new(format!("{prefix}-{code}"))
}

/// Draw external ids until one is free.
async fn allocate_external_id<A: AccountRepository>(
    accounts: &A,
    settings: &AccountSettings,
) -> Result<ExternalId, AccountsServiceError> {
    for _ in 0..settings.external_id_attempts {
        let candidate = generate_external_id(&settings.external_id_prefix);
        if !accounts.external_id_exists(&candidate).await? {
            return Ok(candidate);
        }
        warn!(external_id = %candidate, "external id collision, retrying");
    }
    Err(AccountsServiceError::ExternalIdTaken)
}

fn parse_role(role: &str) -> Result<Role, AccountsServiceError> {
    Role::parse(role).map_err(|e| AccountsServiceError::InvalidRole(e.0))
}

// ── CreateAccount ────────────────────────────────────────────────────────────

pub struct CreateAccountInput {
    pub identity_id: IdentityId,
    pub role: String,
    /// Account performing the promotion; `None` for system-initiated creation.
    pub actor: Option<AccountId>,
    /// Initial plaintext credential, hashed before storage.
    pub credential: Option<String>,
}

pub struct CreateAccountUseCase<I, A>
where
    I: IdentityPort,
    A: AccountRepository,
{
    pub identities: I,
    pub accounts: A,
    pub settings: AccountSettings,
}

impl<I, A> CreateAccountUseCase<I, A>
where
    I: IdentityPort,
    A: AccountRepository,
{
    /// Promote an identity to a privileged account. The account starts pending.
    pub async fn execute(&self, input: CreateAccountInput) -> Result<Account, AccountsServiceError> {
        let result = self.create(input).await;
        if let Err(ref e) = result {
            e.log_internal("create_account");
        }
        result
    }

    async fn create(&self, input: CreateAccountInput) -> Result<Account, AccountsServiceError> {
        let role = parse_role(&input.role)?;

        let identity = self
            .identities
            .find_by_id(input.identity_id)
            .await?
            .ok_or(AccountsServiceError::IdentityNotFound)?;

        if self
            .accounts
            .find_by_identity(identity.id)
            .await?
            .is_some()
        {
            return Err(AccountsServiceError::AccountAlreadyExists);
        }

        let credential = match input.credential {
            Some(plaintext) => Some(hash_in_background(plaintext, self.settings.credential_cost).await?),
            None => None,
        };

        let external_id = allocate_external_id(&self.accounts, &self.settings).await?;
        let account = Account::new(NewAccount {
            id: AccountId(Uuid::now_v7()),
            identity: &identity,
            external_id,
            role,
            credential,
            now: Utc::now(),
        });

        let event = LifecycleEvent::Created {
            role,
            actor: input.actor,
        };
        self.accounts
            .insert(&account, &[event.to_outbox(&account)])
            .await?;

        info!(
            account_id = %account.id(),
            external_id = %account.external_id(),
            role = %role,
            "account created"
        );
        Ok(account)
    }
}

// ── BootstrapSuperAdmin ──────────────────────────────────────────────────────

pub struct BootstrapSuperAdminInput {
    pub identity_id: IdentityId,
    pub credential: String,
}

/// Ensure the designated identity owns an active, fully privileged account.
///
/// Idempotent: running it against an already-bootstrapped account changes
/// nothing. An existing account is promoted, restored and reactivated as
/// needed; its credential is only set when it has none.
pub struct BootstrapSuperAdminUseCase<I, A>
where
    I: IdentityPort,
    A: AccountRepository,
{
    pub identities: I,
    pub accounts: A,
    pub settings: AccountSettings,
}

impl<I, A> BootstrapSuperAdminUseCase<I, A>
where
    I: IdentityPort,
    A: AccountRepository,
{
    pub async fn execute(
        &self,
        input: BootstrapSuperAdminInput,
    ) -> Result<Account, AccountsServiceError> {
        let result = match self.accounts.find_by_identity(input.identity_id).await {
            Ok(Some(account)) => self.converge(account, input.credential).await,
            Ok(None) => self.create(input).await,
            Err(e) => Err(e),
        };
        if let Err(ref e) = result {
            e.log_internal("bootstrap_super_admin");
        }
        result
    }

    async fn create(&self, input: BootstrapSuperAdminInput) -> Result<Account, AccountsServiceError> {
        let identity = self
            .identities
            .find_by_id(input.identity_id)
            .await?
            .ok_or(AccountsServiceError::IdentityNotFound)?;
        let credential = hash_in_background(input.credential, self.settings.credential_cost).await?;
        let external_id = allocate_external_id(&self.accounts, &self.settings).await?;

        let now = Utc::now();
        let mut account = Account::new(NewAccount {
            id: AccountId(Uuid::now_v7()),
            identity: &identity,
            external_id,
            role: Role::SuperAdmin,
            credential: Some(credential),
            now,
        });
        // The bootstrap account activates itself; there is nobody else yet.
        let activated = account.activate(account.id(), now)?;
        let created = LifecycleEvent::Created {
            role: Role::SuperAdmin,
            actor: None,
        };
        let outbox = [created.to_outbox(&account), activated.to_outbox(&account)];
        self.accounts.insert(&account, &outbox).await?;

        info!(
            account_id = %account.id(),
            external_id = %account.external_id(),
            "super admin bootstrapped"
        );
        Ok(account)
    }

    async fn converge(
        &self,
        mut account: Account,
        credential: String,
    ) -> Result<Account, AccountsServiceError> {
        let needs_credential = !account.credential_present();
        let hash = if needs_credential {
            Some(hash_in_background(credential, self.settings.credential_cost).await?)
        } else {
            None
        };

        let expected_version = account.version();
        let actor = account.id();
        let now = Utc::now();
        let mut events = Vec::new();

        if account.role() != Role::SuperAdmin {
            events.push(account.assign_role(Role::SuperAdmin, actor, Some("bootstrap"), now)?);
        }
        if account.is_access_revoked() {
            events.push(account.restore_access(actor)?);
        }
        match account.status() {
            AccountStatus::Pending => events.push(account.activate(actor, now)?),
            AccountStatus::Suspended => events.push(account.lift_suspension(actor, now)?),
            AccountStatus::Deactivated => events.push(account.reactivate(actor, now)?),
            AccountStatus::Activated => {}
        }
        if let Some(hash) = hash {
            account.set_credential(hash);
        }
        let healed = account.sync_permissions();

        if events.is_empty() && !needs_credential && !healed {
            info!(account_id = %account.id(), "super admin already bootstrapped");
            return Ok(account);
        }

        account.mark_written(now);
        let outbox: Vec<_> = events.iter().map(|e| e.to_outbox(&account)).collect();
        self.accounts
            .save(&account, expected_version, &outbox)
            .await?;

        info!(
            account_id = %account.id(),
            external_id = %account.external_id(),
            changes = events.len(),
            "super admin account converged"
        );
        Ok(account)
    }
}

// ── GetAccount ───────────────────────────────────────────────────────────────

pub struct GetAccountUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> GetAccountUseCase<A> {
    pub async fn by_identity(&self, identity_id: IdentityId) -> Result<Account, AccountsServiceError> {
        self.accounts
            .find_by_identity(identity_id)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)
    }

    pub async fn by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Account, AccountsServiceError> {
        self.accounts
            .find_by_external_id(external_id)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)
    }
}
