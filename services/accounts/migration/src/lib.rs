use sea_orm_migration::prelude::*;

mod m20261001_000001_create_identities;
mod m20261001_000002_create_accounts;
mod m20261001_000003_create_account_role_history;
mod m20261001_000004_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_identities::Migration),
            Box::new(m20261001_000002_create_accounts::Migration),
            Box::new(m20261001_000003_create_account_role_history::Migration),
            Box::new(m20261001_000004_create_outbox_events::Migration),
        ]
    }
}
