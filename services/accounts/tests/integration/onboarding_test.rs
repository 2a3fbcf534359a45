use lettly_accounts::error::AccountsServiceError;
use lettly_accounts::usecase::onboarding::CompleteOnboardingUseCase;

use crate::helpers::{MockAccountRepo, seed_account, test_identity};

#[tokio::test]
async fn should_complete_onboarding_once() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    let created = seed_account(&repo, &identity, "creator", None).await;
    assert!(!created.is_onboarded());

    let uc = CompleteOnboardingUseCase {
        accounts: repo.clone(),
    };
    let account = uc.execute(identity.id).await.unwrap();
    assert!(account.is_onboarded());
    assert_eq!(account.version(), created.version() + 1);

    let again = uc.execute(identity.id).await;
    assert!(
        matches!(again, Err(AccountsServiceError::AlreadyOnboarded)),
        "expected AlreadyOnboarded, got {again:?}"
    );
}

#[tokio::test]
async fn should_not_enqueue_event_for_onboarding() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    seed_account(&repo, &identity, "admin", None).await;

    CompleteOnboardingUseCase {
        accounts: repo.clone(),
    }
    .execute(identity.id)
    .await
    .unwrap();

    assert_eq!(repo.outbox_kinds(), vec!["account_created"]);
}
