use sea_orm::entity::prelude::*;

/// Outbox event for reliable async delivery of account lifecycle notifications.
///
/// The accounts service inserts rows with `attempts = 0`,
/// `next_attempt_at = created_at` and no `processed_at`/`failed_at`. The
/// external notifier owns the delivery columns after that: it polls rows
/// where both are null ordered by `next_attempt_at`, bumps `attempts` and
/// `last_error` on failure, and sets `processed_at` or `failed_at` when done.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "outbox_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Account the event is about; notifiers deliver per account in creation order.
    pub account_id: Uuid,
    pub kind: String,
    pub payload: Json,
    #[sea_orm(unique)]
    pub idempotency_key: String,
    /// Delivery tries so far. Notifier-owned.
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub next_attempt_at: chrono::DateTime<chrono::Utc>,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub failed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
