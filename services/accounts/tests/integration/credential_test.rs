use lettly_accounts::domain::credential::MAX_CREDENTIAL_BYTES;
use lettly_accounts::error::AccountsServiceError;
use lettly_accounts::usecase::credential::{
    SetCredentialInput, SetCredentialUseCase, VerifyCredentialInput, VerifyCredentialUseCase,
};
use lettly_accounts::usecase::lifecycle::{ActivateAccountUseCase, ActorInput};
use lettly_accounts::usecase::role::{AssignRoleInput, AssignRoleUseCase};
use lettly_domain::id::IdentityId;

use crate::helpers::{MockAccountRepo, actor, seed_account, test_identity, test_settings};

async fn verify(repo: &MockAccountRepo, identity_id: IdentityId, candidate: &str) -> bool {
    VerifyCredentialUseCase {
        accounts: repo.clone(),
    }
    .execute(VerifyCredentialInput {
        identity_id,
        candidate: candidate.to_owned(),
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn should_verify_credential_set_at_creation() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    let account = seed_account(&repo, &identity, "admin", Some("first secret")).await;

    assert!(account.credential_present());
    assert!(verify(&repo, identity.id, "first secret").await);
    assert!(!verify(&repo, identity.id, "wrong secret").await);
}

#[tokio::test]
async fn should_replace_credential_and_reject_the_old_one() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    seed_account(&repo, &identity, "admin", Some("first secret")).await;

    SetCredentialUseCase {
        accounts: repo.clone(),
        cost: test_settings().credential_cost,
    }
    .execute(SetCredentialInput {
        identity_id: identity.id,
        credential: "second secret".to_owned(),
    })
    .await
    .unwrap();

    assert!(verify(&repo, identity.id, "second secret").await);
    assert!(!verify(&repo, identity.id, "first secret").await);
}

#[tokio::test]
async fn should_return_false_when_no_credential_set() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    seed_account(&repo, &identity, "creator", None).await;

    assert!(!verify(&repo, identity.id, "").await);
    assert!(!verify(&repo, identity.id, "anything").await);
}

#[tokio::test]
async fn should_reject_empty_credential() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    let created = seed_account(&repo, &identity, "creator", None).await;

    let result = SetCredentialUseCase {
        accounts: repo.clone(),
        cost: test_settings().credential_cost,
    }
    .execute(SetCredentialInput {
        identity_id: identity.id,
        credential: String::new(),
    })
    .await;

    assert!(matches!(result, Err(AccountsServiceError::InvalidCredential)));
    assert_eq!(repo.stored(identity.id), Some(created));
}

#[tokio::test]
async fn should_keep_stored_hash_across_unrelated_writes() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    let created = seed_account(&repo, &identity, "admin", Some("stable secret")).await;
    let original = created.credential().unwrap().clone();

    ActivateAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ActorInput {
        identity_id: identity.id,
        actor: actor(1),
    })
    .await
    .unwrap();
    let account = AssignRoleUseCase {
        accounts: repo.clone(),
    }
    .execute(AssignRoleInput {
        identity_id: identity.id,
        role: "creator".to_owned(),
        actor: actor(1),
        reason: None,
    })
    .await
    .unwrap();

    assert_eq!(account.credential(), Some(&original));
    assert!(verify(&repo, identity.id, "stable secret").await);
}

async fn set(
    repo: &MockAccountRepo,
    identity_id: IdentityId,
    credential: String,
) -> Result<(), AccountsServiceError> {
    SetCredentialUseCase {
        accounts: repo.clone(),
        cost: test_settings().credential_cost,
    }
    .execute(SetCredentialInput {
        identity_id,
        credential,
    })
    .await
    .map(|_| ())
}

#[tokio::test]
async fn should_verify_72_byte_credential_and_reject_longer_lookalike() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    seed_account(&repo, &identity, "admin", None).await;
    let secret = "p".repeat(MAX_CREDENTIAL_BYTES);

    set(&repo, identity.id, secret.clone()).await.unwrap();

    assert!(verify(&repo, identity.id, &secret).await);
    assert!(!verify(&repo, identity.id, &format!("{secret}-original-tail")).await);
    assert!(!verify(&repo, identity.id, &format!("{secret}-COMPLETELY-DIFFERENT")).await);
    assert!(!verify(&repo, identity.id, &secret[..MAX_CREDENTIAL_BYTES - 1]).await);
}

#[tokio::test]
async fn should_reject_73_byte_credential_and_keep_the_old_one() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    let created = seed_account(&repo, &identity, "admin", Some("short secret")).await;

    let result = set(&repo, identity.id, "q".repeat(MAX_CREDENTIAL_BYTES + 1)).await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidCredential)),
        "expected InvalidCredential, got {result:?}"
    );
    assert_eq!(repo.stored(identity.id), Some(created));
    assert!(verify(&repo, identity.id, "short secret").await);
}

#[tokio::test]
async fn should_accept_whitespace_only_credential() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    seed_account(&repo, &identity, "creator", None).await;

    set(&repo, identity.id, "   ".to_owned()).await.unwrap();

    assert!(verify(&repo, identity.id, "   ").await);
    assert!(!verify(&repo, identity.id, "").await);
}
