use lettly_domain::permission::Permission;

use crate::domain::account::AccountStatus;

/// Broad failure classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input: bad role, empty reason, empty credential.
    Validation,
    /// The referenced account or identity does not exist.
    NotFound,
    /// Uniqueness violation, no-op transition or lost concurrent update.
    Conflict,
    /// The actor has no standing for the transition.
    UnauthorizedTransition,
    /// Storage failure; opaque to the caller.
    Persistence,
}

/// Accounts service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AccountsServiceError {
    #[error("invalid role: {0}")]
    InvalidRole(String),
    #[error("reason must not be empty")]
    EmptyReason,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("account not found")]
    AccountNotFound,
    #[error("identity not found")]
    IdentityNotFound,
    #[error("account already exists for identity")]
    AccountAlreadyExists,
    #[error("external id already taken")]
    ExternalIdTaken,
    #[error("role unchanged")]
    RoleUnchanged,
    #[error("cannot {action} an account that is {status}")]
    InvalidTransition {
        action: &'static str,
        status: AccountStatus,
    },
    #[error("account already onboarded")]
    AlreadyOnboarded,
    #[error("access already revoked")]
    AccessAlreadyRevoked,
    #[error("access is not revoked")]
    AccessNotRevoked,
    #[error("account was modified concurrently")]
    VersionConflict,
    #[error("only the suspending account may lift the suspension")]
    NotSuspender,
    #[error("actor lacks permission {0}")]
    MissingPermission(Permission),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccountsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::EmptyReason => "EMPTY_REASON",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::IdentityNotFound => "IDENTITY_NOT_FOUND",
            Self::AccountAlreadyExists => "ACCOUNT_ALREADY_EXISTS",
            Self::ExternalIdTaken => "EXTERNAL_ID_TAKEN",
            Self::RoleUnchanged => "ROLE_UNCHANGED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::AlreadyOnboarded => "ALREADY_ONBOARDED",
            Self::AccessAlreadyRevoked => "ACCESS_ALREADY_REVOKED",
            Self::AccessNotRevoked => "ACCESS_NOT_REVOKED",
            Self::VersionConflict => "VERSION_CONFLICT",
            Self::NotSuspender => "NOT_SUSPENDER",
            Self::MissingPermission(_) => "MISSING_PERMISSION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRole(_) | Self::EmptyReason | Self::InvalidCredential => {
                ErrorCategory::Validation
            }
            Self::AccountNotFound | Self::IdentityNotFound => ErrorCategory::NotFound,
            Self::AccountAlreadyExists
            | Self::ExternalIdTaken
            | Self::RoleUnchanged
            | Self::InvalidTransition { .. }
            | Self::AlreadyOnboarded
            | Self::AccessAlreadyRevoked
            | Self::AccessNotRevoked
            | Self::VersionConflict => ErrorCategory::Conflict,
            Self::NotSuspender | Self::MissingPermission(_) => {
                ErrorCategory::UnauthorizedTransition
            }
            Self::Internal(_) => ErrorCategory::Persistence,
        }
    }

    /// Log storage failures with their full cause chain. Other variants are
    /// expected outcomes and stay quiet.
    pub fn log_internal(&self, operation: &'static str) {
        if let Self::Internal(e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", operation, "internal error");
        }
    }
}
