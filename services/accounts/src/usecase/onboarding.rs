use lettly_domain::id::IdentityId;

use crate::domain::account::Account;
use crate::domain::repository::AccountRepository;
use crate::error::AccountsServiceError;
use crate::usecase::transition;

pub struct CompleteOnboardingUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> CompleteOnboardingUseCase<A> {
    /// Mark the post-creation profile flow as finished. Fails on a second call.
    pub async fn execute(&self, identity_id: IdentityId) -> Result<Account, AccountsServiceError> {
        transition::apply(&self.accounts, identity_id, "complete_onboarding", |account, now| {
            account.complete_onboarding(now)?;
            Ok(None)
        })
        .await
    }
}
