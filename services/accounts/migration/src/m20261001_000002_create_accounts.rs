use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // One identity maps to at most one account.
                    .col(
                        ColumnDef::new(Accounts::IdentityId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::ExternalId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::DisplayName).string().not_null())
                    .col(ColumnDef::new(Accounts::Email).string().not_null())
                    .col(ColumnDef::new(Accounts::Role).string().not_null())
                    .col(ColumnDef::new(Accounts::AccessLevel).string().not_null())
                    .col(ColumnDef::new(Accounts::Permissions).json_binary().not_null())
                    .col(
                        ColumnDef::new(Accounts::AccessRevoked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Accounts::ActivatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::ActivatedBy).uuid())
                    .col(
                        ColumnDef::new(Accounts::Suspended)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Accounts::SuspendedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::SuspendedBy).uuid())
                    .col(ColumnDef::new(Accounts::SuspensionReason).string())
                    .col(ColumnDef::new(Accounts::SuspensionLiftedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::SuspensionLiftedBy).uuid())
                    .col(
                        ColumnDef::new(Accounts::Deactivated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Accounts::DeactivatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::DeactivatedBy).uuid())
                    .col(ColumnDef::new(Accounts::DeactivationReason).string())
                    .col(ColumnDef::new(Accounts::ReactivatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::ReactivatedBy).uuid())
                    .col(ColumnDef::new(Accounts::CredentialHash).string())
                    .col(ColumnDef::new(Accounts::OnboardedAt).timestamp_with_time_zone())
                    // Role history rows that belong to this version of the row.
                    .col(
                        ColumnDef::new(Accounts::RoleChangeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Accounts::Table, Accounts::IdentityId)
                            .to(Identities::Table, Identities::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Accounts::Table)
                    .col(Accounts::Role)
                    .name("idx_accounts_role")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    IdentityId,
    ExternalId,
    DisplayName,
    Email,
    Role,
    AccessLevel,
    Permissions,
    AccessRevoked,
    ActivatedAt,
    ActivatedBy,
    Suspended,
    SuspendedAt,
    SuspendedBy,
    SuspensionReason,
    SuspensionLiftedAt,
    SuspensionLiftedBy,
    Deactivated,
    DeactivatedAt,
    DeactivatedBy,
    DeactivationReason,
    ReactivatedAt,
    ReactivatedBy,
    CredentialHash,
    RoleChangeCount,
    OnboardedAt,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Identities {
    Table,
    Id,
}
