use sea_orm::DatabaseConnection;

use crate::config::AccountSettings;
use crate::infra::db::{DbAccountRepository, DbIdentityPort};

/// Shared state the entry points build use cases from.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub settings: AccountSettings,
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn identity_port(&self) -> DbIdentityPort {
        DbIdentityPort {
            db: self.db.clone(),
        }
    }
}
