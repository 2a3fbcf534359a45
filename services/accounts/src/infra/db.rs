use std::collections::BTreeSet;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
    TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use lettly_accounts_schema::{account_role_history, accounts, identities, outbox_events};
use lettly_domain::id::{AccountId, ExternalId, IdentityId};
use lettly_domain::permission::Permission;
use lettly_domain::role::{AccessLevel, Role};

use crate::domain::account::{Account, Deactivation, Stamp, Suspension};
use crate::domain::credential::CredentialHash;
use crate::domain::repository::{AccountRepository, IdentityPort};
use crate::domain::types::{HistoryEntry, Identity, OutboxEvent};
use crate::error::AccountsServiceError;

// ── Identity port ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIdentityPort {
    pub db: DatabaseConnection,
}

impl IdentityPort for DbIdentityPort {
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, AccountsServiceError> {
        let model = identities::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find identity by id")?;
        Ok(model.map(|m| Identity {
            id: IdentityId(m.id),
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            phone: m.phone,
            email_verified: m.email_verified,
        }))
    }
}

// ── Account repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl DbAccountRepository {
    async fn hydrate(
        &self,
        model: Option<accounts::Model>,
    ) -> Result<Option<Account>, AccountsServiceError> {
        let Some(model) = model else {
            return Ok(None);
        };
        // Rows past `role_change_count` belong to a later write than `model`.
        let history = account_role_history::Entity::find()
            .filter(account_role_history::Column::AccountId.eq(model.id))
            .filter(account_role_history::Column::Seq.lte(model.role_change_count))
            .order_by_asc(account_role_history::Column::Seq)
            .all(&self.db)
            .await
            .context("load role history")?;
        account_from_models(model, history).map(Some)
    }
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountsServiceError> {
        let model = accounts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find account by id")?;
        self.hydrate(model).await
    }

    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Account>, AccountsServiceError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::IdentityId.eq(identity_id.0))
            .one(&self.db)
            .await
            .context("find account by identity")?;
        self.hydrate(model).await
    }

    async fn find_by_external_id(
        &self,
        external_id: &ExternalId,
    ) -> Result<Option<Account>, AccountsServiceError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::ExternalId.eq(external_id.as_str()))
            .one(&self.db)
            .await
            .context("find account by external id")?;
        self.hydrate(model).await
    }

    async fn external_id_exists(
        &self,
        external_id: &ExternalId,
    ) -> Result<bool, AccountsServiceError> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::ExternalId.eq(external_id.as_str()))
            .count(&self.db)
            .await
            .context("check external id")?;
        Ok(count > 0)
    }

    async fn insert(
        &self,
        account: &Account,
        events: &[OutboxEvent],
    ) -> Result<(), AccountsServiceError> {
        let txn = self.db.begin().await.context("begin account insert")?;
        account_active_model(account)
            .insert(&txn)
            .await
            .map_err(unique_violation)?;
        insert_history(&txn, account, 0)
            .await
            .context("insert role history")?;
        insert_outbox_events(&txn, events)
            .await
            .context("insert outbox events")?;
        txn.commit().await.context("commit account insert")?;
        Ok(())
    }

    async fn save(
        &self,
        account: &Account,
        expected_version: i64,
        events: &[OutboxEvent],
    ) -> Result<(), AccountsServiceError> {
        let txn = self.db.begin().await.context("begin account save")?;

        let mut changes = account_active_model(account);
        changes.id = NotSet;
        changes.identity_id = NotSet;
        changes.external_id = NotSet;
        changes.created_at = NotSet;
        let result = accounts::Entity::update_many()
            .set(changes)
            .filter(accounts::Column::Id.eq(account.id().0))
            .filter(accounts::Column::Version.eq(expected_version))
            .exec(&txn)
            .await
            .context("update account")?;
        if result.rows_affected == 0 {
            // Dropping the transaction rolls it back.
            return Err(AccountsServiceError::VersionConflict);
        }

        let stored = account_role_history::Entity::find()
            .filter(account_role_history::Column::AccountId.eq(account.id().0))
            .count(&txn)
            .await
            .context("count role history")?;
        insert_history(&txn, account, stored as usize)
            .await
            .context("append role history")?;
        insert_outbox_events(&txn, events)
            .await
            .context("insert outbox events")?;
        txn.commit().await.context("commit account save")?;
        Ok(())
    }
}

fn unique_violation(err: DbErr) -> AccountsServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("external_id") => {
            AccountsServiceError::ExternalIdTaken
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => AccountsServiceError::AccountAlreadyExists,
        _ => AccountsServiceError::Internal(anyhow::Error::new(err).context("insert account")),
    }
}

async fn insert_history(
    txn: &DatabaseTransaction,
    account: &Account,
    skip: usize,
) -> Result<(), DbErr> {
    for (idx, entry) in account.history().iter().enumerate().skip(skip) {
        account_role_history::ActiveModel {
            id: Set(Uuid::now_v7()),
            account_id: Set(account.id().0),
            seq: Set(idx as i32 + 1),
            role: Set(entry.role.as_str().to_owned()),
            changed_at: Set(entry.changed_at),
            changed_by: Set(entry.changed_by.0),
            reason: Set(entry.reason.clone()),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn insert_outbox_events(
    txn: &DatabaseTransaction,
    events: &[OutboxEvent],
) -> Result<(), DbErr> {
    let now = Utc::now();
    for event in events {
        outbox_active_model(event, now).insert(txn).await?;
    }
    Ok(())
}

/// A fresh, undelivered outbox row. The retry columns start empty and are
/// owned by the notifier from here on.
fn outbox_active_model(event: &OutboxEvent, now: DateTime<Utc>) -> outbox_events::ActiveModel {
    outbox_events::ActiveModel {
        id: Set(event.id),
        account_id: Set(event.account_id.0),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
}

fn account_active_model(account: &Account) -> accounts::ActiveModel {
    let permissions: Vec<&str> = account.permissions().iter().map(|p| p.as_str()).collect();
    let activation = account.activation();
    let suspension = account.suspension();
    let lifted = suspension.and_then(|s| s.lifted.as_ref());
    let deactivation = account.deactivation();
    let reactivated = deactivation.and_then(|d| d.reactivated.as_ref());

    accounts::ActiveModel {
        id: Set(account.id().0),
        identity_id: Set(account.identity_id().0),
        external_id: Set(account.external_id().as_str().to_owned()),
        display_name: Set(account.display_name().to_owned()),
        email: Set(account.email().to_owned()),
        role: Set(account.role().as_str().to_owned()),
        access_level: Set(account.access_level().as_str().to_owned()),
        permissions: Set(serde_json::json!(permissions)),
        access_revoked: Set(account.is_access_revoked()),
        activated_at: Set(activation.map(|a| a.at)),
        activated_by: Set(activation.map(|a| a.by.0)),
        suspended: Set(account.is_suspended()),
        suspended_at: Set(suspension.map(|s| s.at)),
        suspended_by: Set(suspension.map(|s| s.by.0)),
        suspension_reason: Set(suspension.map(|s| s.reason.clone())),
        suspension_lifted_at: Set(lifted.map(|l| l.at)),
        suspension_lifted_by: Set(lifted.map(|l| l.by.0)),
        deactivated: Set(account.is_deactivated()),
        deactivated_at: Set(deactivation.map(|d| d.at)),
        deactivated_by: Set(deactivation.map(|d| d.by.0)),
        deactivation_reason: Set(deactivation.map(|d| d.reason.clone())),
        reactivated_at: Set(reactivated.map(|r| r.at)),
        reactivated_by: Set(reactivated.map(|r| r.by.0)),
        credential_hash: Set(account.credential().map(|c| c.as_str().to_owned())),
        onboarded_at: Set(account.onboarded_at()),
        role_change_count: Set(account.history().len() as i32),
        version: Set(account.version()),
        created_at: Set(account.created_at()),
        updated_at: Set(account.updated_at()),
    }
}

fn stamp(at: Option<DateTime<Utc>>, by: Option<Uuid>) -> Option<Stamp> {
    match (at, by) {
        (Some(at), Some(by)) => Some(Stamp {
            at,
            by: AccountId(by),
        }),
        _ => None,
    }
}

/// Rebuild an account from its row and ordered history rows.
///
/// An unrecognised role fails the load instead of granting anything. Stored
/// permissions are re-derived from the role, so drift never survives a load.
fn account_from_models(
    model: accounts::Model,
    history: Vec<account_role_history::Model>,
) -> Result<Account, AccountsServiceError> {
    let role = Role::parse(&model.role).map_err(|e| {
        warn!(account_id = %model.id, role = %e.0, "stored account has unknown role");
        anyhow::anyhow!("account {} has unknown role {:?}", model.id, e.0)
    })?;

    let access_level = AccessLevel::parse(&model.access_level).unwrap_or_else(|| {
        warn!(account_id = %model.id, access_level = %model.access_level, "unknown access level");
        AccessLevel::NoAccess
    });

    let mut permissions = BTreeSet::new();
    if let Some(names) = model.permissions.as_array() {
        for name in names.iter().filter_map(|v| v.as_str()) {
            match name.parse::<Permission>() {
                Ok(p) => {
                    permissions.insert(p);
                }
                Err(_) => warn!(account_id = %model.id, permission = name, "unknown stored permission"),
            }
        }
    }

    let history = history
        .into_iter()
        .filter(|h| h.seq <= model.role_change_count)
        .map(|h| -> Result<HistoryEntry, AccountsServiceError> {
            let role = Role::parse(&h.role)
                .with_context(|| format!("role history row {} has unknown role", h.id))?;
            Ok(HistoryEntry {
                role,
                changed_at: h.changed_at,
                changed_by: AccountId(h.changed_by),
                reason: h.reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let suspension = match (model.suspended_at, model.suspended_by) {
        (Some(at), Some(by)) => Some(Suspension {
            at,
            by: AccountId(by),
            reason: model.suspension_reason.unwrap_or_default(),
            lifted: stamp(model.suspension_lifted_at, model.suspension_lifted_by),
        }),
        _ => None,
    };
    let deactivation = match (model.deactivated_at, model.deactivated_by) {
        (Some(at), Some(by)) => Some(Deactivation {
            at,
            by: AccountId(by),
            reason: model.deactivation_reason.unwrap_or_default(),
            reactivated: stamp(model.reactivated_at, model.reactivated_by),
        }),
        _ => None,
    };

    let mut account = Account {
        id: AccountId(model.id),
        identity_id: IdentityId(model.identity_id),
        external_id: ExternalId::new(model.external_id),
        display_name: model.display_name,
        email: model.email,
        role,
        access_level,
        permissions,
        access_revoked: model.access_revoked,
        activation: stamp(model.activated_at, model.activated_by),
        suspended: model.suspended,
        suspension,
        deactivated: model.deactivated,
        deactivation,
        credential: model.credential_hash.map(CredentialHash::from_stored),
        onboarded_at: model.onboarded_at,
        history,
        version: model.version,
        created_at: model.created_at,
        updated_at: model.updated_at,
    };
    if account.sync_permissions() {
        warn!(account_id = %account.id(), "stored permissions out of date with role, re-derived");
    }
    Ok(account)
}
