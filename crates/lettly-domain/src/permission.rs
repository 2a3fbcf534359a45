//! Fine-grained capabilities granted to privileged accounts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single capability string.
///
/// Wire format: dotted `resource.action` (e.g. `users.suspend`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "users.read")]
    UsersRead,
    #[serde(rename = "users.verify")]
    UsersVerify,
    #[serde(rename = "users.suspend")]
    UsersSuspend,
    #[serde(rename = "users.deactivate")]
    UsersDeactivate,
    #[serde(rename = "users.message")]
    UsersMessage,
    #[serde(rename = "users.delete")]
    UsersDelete,
    #[serde(rename = "agents.read")]
    AgentsRead,
    #[serde(rename = "agents.verify")]
    AgentsVerify,
    #[serde(rename = "agents.suspend")]
    AgentsSuspend,
    #[serde(rename = "agents.deactivate")]
    AgentsDeactivate,
    #[serde(rename = "agents.message")]
    AgentsMessage,
    #[serde(rename = "agents.delete")]
    AgentsDelete,
    #[serde(rename = "properties.read")]
    PropertiesRead,
    #[serde(rename = "properties.create")]
    PropertiesCreate,
    #[serde(rename = "properties.update")]
    PropertiesUpdate,
    #[serde(rename = "properties.approve")]
    PropertiesApprove,
    #[serde(rename = "properties.delete")]
    PropertiesDelete,
    #[serde(rename = "admins.read")]
    AdminsRead,
    #[serde(rename = "admins.create")]
    AdminsCreate,
    #[serde(rename = "admins.manage")]
    AdminsManage,
    #[serde(rename = "reports.read")]
    ReportsRead,
    #[serde(rename = "settings.manage")]
    SettingsManage,
}

impl Permission {
    /// Every known permission; the super admin grant.
    pub const ALL: [Permission; 22] = [
        Self::UsersRead,
        Self::UsersVerify,
        Self::UsersSuspend,
        Self::UsersDeactivate,
        Self::UsersMessage,
        Self::UsersDelete,
        Self::AgentsRead,
        Self::AgentsVerify,
        Self::AgentsSuspend,
        Self::AgentsDeactivate,
        Self::AgentsMessage,
        Self::AgentsDelete,
        Self::PropertiesRead,
        Self::PropertiesCreate,
        Self::PropertiesUpdate,
        Self::PropertiesApprove,
        Self::PropertiesDelete,
        Self::AdminsRead,
        Self::AdminsCreate,
        Self::AdminsManage,
        Self::ReportsRead,
        Self::SettingsManage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UsersRead => "users.read",
            Self::UsersVerify => "users.verify",
            Self::UsersSuspend => "users.suspend",
            Self::UsersDeactivate => "users.deactivate",
            Self::UsersMessage => "users.message",
            Self::UsersDelete => "users.delete",
            Self::AgentsRead => "agents.read",
            Self::AgentsVerify => "agents.verify",
            Self::AgentsSuspend => "agents.suspend",
            Self::AgentsDeactivate => "agents.deactivate",
            Self::AgentsMessage => "agents.message",
            Self::AgentsDelete => "agents.delete",
            Self::PropertiesRead => "properties.read",
            Self::PropertiesCreate => "properties.create",
            Self::PropertiesUpdate => "properties.update",
            Self::PropertiesApprove => "properties.approve",
            Self::PropertiesDelete => "properties.delete",
            Self::AdminsRead => "admins.read",
            Self::AdminsCreate => "admins.create",
            Self::AdminsManage => "admins.manage",
            Self::ReportsRead => "reports.read",
            Self::SettingsManage => "settings.manage",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored permission string is not part of the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_owned()))
    }
}
