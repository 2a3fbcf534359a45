use serde::Deserialize;

use lettly_core::config::Config;

use crate::domain::types::{
    DEFAULT_CREDENTIAL_COST, DEFAULT_EXTERNAL_ID_ATTEMPTS, DEFAULT_EXTERNAL_ID_PREFIX,
    MAX_CREDENTIAL_COST, MIN_CREDENTIAL_COST,
};

/// Accounts service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AccountsConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// bcrypt work factor (default 12). Env var: `CREDENTIAL_HASH_COST`.
    #[serde(default = "default_credential_hash_cost")]
    pub credential_hash_cost: u32,
    /// Prefix of generated external ids (default "ADM"). Env var: `EXTERNAL_ID_PREFIX`.
    #[serde(default = "default_external_id_prefix")]
    pub external_id_prefix: String,
    /// Fresh external ids tried per creation (default 5). Env var: `EXTERNAL_ID_ATTEMPTS`.
    #[serde(default = "default_external_id_attempts")]
    pub external_id_attempts: u32,
}

impl Config for AccountsConfig {}

/// Settings that deserialize but cannot be used.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("CREDENTIAL_HASH_COST must be between 4 and 31, got {0}")]
    CredentialCostOutOfRange(u32),
}

fn default_credential_hash_cost() -> u32 {
    DEFAULT_CREDENTIAL_COST
}

fn default_external_id_prefix() -> String {
    DEFAULT_EXTERNAL_ID_PREFIX.to_owned()
}

fn default_external_id_attempts() -> u32 {
    DEFAULT_EXTERNAL_ID_ATTEMPTS
}

impl AccountsConfig {
    /// Validated use-case settings. Fails on a bcrypt cost outside 4..=31.
    pub fn settings(&self) -> Result<AccountSettings, ConfigError> {
        let cost = self.credential_hash_cost;
        if !(MIN_CREDENTIAL_COST..=MAX_CREDENTIAL_COST).contains(&cost) {
            return Err(ConfigError::CredentialCostOutOfRange(cost));
        }
        Ok(AccountSettings {
            credential_cost: cost,
            external_id_prefix: self.external_id_prefix.clone(),
            external_id_attempts: self.external_id_attempts.max(1),
        })
    }
}

/// Tunables the use cases need, split from connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSettings {
    pub credential_cost: u32,
    pub external_id_prefix: String,
    pub external_id_attempts: u32,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            credential_cost: DEFAULT_CREDENTIAL_COST,
            external_id_prefix: DEFAULT_EXTERNAL_ID_PREFIX.to_owned(),
            external_id_attempts: DEFAULT_EXTERNAL_ID_ATTEMPTS,
        }
    }
}
