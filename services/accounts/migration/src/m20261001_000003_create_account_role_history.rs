use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountRoleHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountRoleHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccountRoleHistory::AccountId).uuid().not_null())
                    .col(ColumnDef::new(AccountRoleHistory::Seq).integer().not_null())
                    .col(ColumnDef::new(AccountRoleHistory::Role).string().not_null())
                    .col(
                        ColumnDef::new(AccountRoleHistory::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccountRoleHistory::ChangedBy).uuid().not_null())
                    .col(ColumnDef::new(AccountRoleHistory::Reason).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(AccountRoleHistory::Table, AccountRoleHistory::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Ordering key for history reads; also rejects a second writer appending the same slot.
        manager
            .create_index(
                Index::create()
                    .table(AccountRoleHistory::Table)
                    .col(AccountRoleHistory::AccountId)
                    .col(AccountRoleHistory::Seq)
                    .unique()
                    .name("idx_account_role_history_account_seq")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountRoleHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AccountRoleHistory {
    Table,
    Id,
    AccountId,
    Seq,
    Role,
    ChangedAt,
    ChangedBy,
    Reason,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}
