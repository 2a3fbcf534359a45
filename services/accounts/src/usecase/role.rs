use lettly_domain::id::{AccountId, IdentityId};
use lettly_domain::role::Role;

use crate::domain::account::Account;
use crate::domain::repository::AccountRepository;
use crate::error::AccountsServiceError;
use crate::usecase::transition;

pub struct AssignRoleInput {
    pub identity_id: IdentityId,
    /// Target role wire name (`admin`, `creator`, `superAdmin`).
    pub role: String,
    pub actor: AccountId,
    pub reason: Option<String>,
}

pub struct AssignRoleUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> AssignRoleUseCase<A> {
    /// Change the account's role, re-deriving permissions and appending the
    /// previous role to its history.
    pub async fn execute(&self, input: AssignRoleInput) -> Result<Account, AccountsServiceError> {
        let role =
            Role::parse(&input.role).map_err(|e| AccountsServiceError::InvalidRole(e.0))?;
        transition::apply(&self.accounts, input.identity_id, "assign_role", |account, now| {
            account
                .assign_role(role, input.actor, input.reason.as_deref(), now)
                .map(Some)
        })
        .await
    }
}
