//! Privileged roles and the role → permission resolver.
//!
//! Every place that needs to branch on a role goes through [`resolve`], so the
//! dashboard and the account model cannot drift apart.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::permission::Permission;

/// Privileged account role.
///
/// Wire format: `admin`, `creator`, `superAdmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    Creator,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Self::Admin, Self::Creator, Self::SuperAdmin];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Creator => "creator",
            Self::SuperAdmin => "superAdmin",
        }
    }

    /// Parse a role from its wire name. Only the closed set is accepted.
    pub fn parse(s: &str) -> Result<Self, UnknownRole> {
        match s {
            "admin" => Ok(Self::Admin),
            "creator" => Ok(Self::Creator),
            "superAdmin" => Ok(Self::SuperAdmin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Coarse summary of a role's reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    FullAccess,
    LimitedAccess,
    NoAccess,
}

impl AccessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullAccess => "full_access",
            Self::LimitedAccess => "limited_access",
            Self::NoAccess => "no_access",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full_access" => Some(Self::FullAccess),
            "limited_access" => Some(Self::LimitedAccess),
            "no_access" => Some(Self::NoAccess),
            _ => None,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission set and access level a role resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub permissions: BTreeSet<Permission>,
    pub access_level: AccessLevel,
}

impl Resolution {
    /// The fail-closed resolution: nothing granted.
    pub fn none() -> Self {
        Self {
            permissions: BTreeSet::new(),
            access_level: AccessLevel::NoAccess,
        }
    }
}

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::UsersRead,
    Permission::UsersVerify,
    Permission::UsersSuspend,
    Permission::UsersDeactivate,
    Permission::UsersMessage,
    Permission::AgentsRead,
    Permission::AgentsVerify,
    Permission::AgentsSuspend,
    Permission::AgentsDeactivate,
    Permission::AgentsMessage,
    Permission::PropertiesRead,
    Permission::PropertiesApprove,
    Permission::ReportsRead,
];

const CREATOR_PERMISSIONS: &[Permission] = &[
    Permission::PropertiesRead,
    Permission::PropertiesCreate,
    Permission::PropertiesUpdate,
    Permission::UsersRead,
    Permission::AgentsRead,
    Permission::ReportsRead,
];

/// Resolve a role to its permission set and access level.
pub fn resolve(role: Role) -> Resolution {
    match role {
        Role::SuperAdmin => Resolution {
            permissions: Permission::ALL.into_iter().collect(),
            access_level: AccessLevel::FullAccess,
        },
        Role::Admin => Resolution {
            permissions: ADMIN_PERMISSIONS.iter().copied().collect(),
            access_level: AccessLevel::LimitedAccess,
        },
        Role::Creator => Resolution {
            permissions: CREATOR_PERMISSIONS.iter().copied().collect(),
            access_level: AccessLevel::LimitedAccess,
        },
    }
}

/// Resolve a raw role string. Unknown roles grant nothing.
///
/// An unknown role here is a configuration error upstream; callers should
/// report it rather than treat the empty result as a valid account.
pub fn resolve_str(role: &str) -> Resolution {
    match Role::parse(role) {
        Ok(role) => resolve(role),
        Err(_) => Resolution::none(),
    }
}
