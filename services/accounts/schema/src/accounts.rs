use sea_orm::entity::prelude::*;

/// Privileged account owned by the accounts service.
///
/// `permissions` is a JSON array of permission wire names derived from `role`.
/// `version` is bumped on every write and guards concurrent updates.
/// `role_change_count` is the number of `account_role_history` rows written
/// up to and including this version.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub identity_id: Uuid,
    #[sea_orm(unique)]
    pub external_id: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub access_level: String,
    pub permissions: Json,
    pub access_revoked: bool,
    pub activated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub activated_by: Option<Uuid>,
    pub suspended: bool,
    pub suspended_at: Option<chrono::DateTime<chrono::Utc>>,
    pub suspended_by: Option<Uuid>,
    pub suspension_reason: Option<String>,
    pub suspension_lifted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub suspension_lifted_by: Option<Uuid>,
    pub deactivated: bool,
    pub deactivated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub deactivated_by: Option<Uuid>,
    pub deactivation_reason: Option<String>,
    pub reactivated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub reactivated_by: Option<Uuid>,
    pub credential_hash: Option<String>,
    pub onboarded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub role_change_count: i32,
    pub version: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_role_history::Entity")]
    RoleHistory,
    #[sea_orm(
        belongs_to = "super::identities::Entity",
        from = "Column::IdentityId",
        to = "super::identities::Column::Id"
    )]
    Identity,
}

impl Related<super::account_role_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleHistory.def()
    }
}

impl Related<super::identities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Identity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
