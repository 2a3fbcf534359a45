use chrono::Utc;

use lettly_accounts::domain::account::AccountStatus;
use lettly_accounts::domain::repository::AccountRepository;
use lettly_accounts::error::AccountsServiceError;
use lettly_accounts::usecase::lifecycle::{
    ActivateAccountUseCase, ActorInput, DeactivateAccountUseCase, LiftSuspensionUseCase,
    ReactivateAccountUseCase, ReasonedInput, RestoreAccessUseCase, RevokeAccessUseCase,
    SuspendAccountUseCase,
};
use lettly_accounts::usecase::policy::ensure_may_lift_suspension;
use lettly_domain::id::{AccountId, IdentityId};
use lettly_domain::role::{self, AccessLevel, Role};

use crate::helpers::{MockAccountRepo, actor, seed_account, test_identity};

async fn activated(repo: &MockAccountRepo) -> IdentityId {
    let identity = test_identity();
    seed_account(repo, &identity, "admin", None).await;
    ActivateAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ActorInput {
        identity_id: identity.id,
        actor: actor(1),
    })
    .await
    .unwrap();
    identity.id
}

async fn suspend(repo: &MockAccountRepo, identity_id: IdentityId, by: AccountId) {
    SuspendAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ReasonedInput {
        identity_id,
        actor: by,
        reason: "policy violation".to_owned(),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn should_activate_pending_account_and_enqueue_event() {
    let repo = MockAccountRepo::empty();
    let identity_id = activated(&repo).await;

    let account = repo.stored(identity_id).unwrap();
    assert_eq!(account.status(), AccountStatus::Activated);
    assert_eq!(account.activation().unwrap().by, actor(1));
    assert_eq!(
        repo.outbox_kinds(),
        vec!["account_created", "account_activated"]
    );
}

#[tokio::test]
async fn should_reject_activating_twice() {
    let repo = MockAccountRepo::empty();
    let identity_id = activated(&repo).await;

    let result = ActivateAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ActorInput {
        identity_id,
        actor: actor(1),
    })
    .await;

    assert!(
        matches!(
            result,
            Err(AccountsServiceError::InvalidTransition {
                status: AccountStatus::Activated,
                ..
            })
        ),
        "expected InvalidTransition, got {result:?}"
    );
    assert_eq!(repo.outbox_kinds().len(), 2);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_account() {
    let result = ActivateAccountUseCase {
        accounts: MockAccountRepo::empty(),
    }
    .execute(ActorInput {
        identity_id: test_identity().id,
        actor: actor(1),
    })
    .await;
    assert!(matches!(result, Err(AccountsServiceError::AccountNotFound)));
}

#[tokio::test]
async fn should_record_suspender_for_caller_side_lift_check() {
    let repo = MockAccountRepo::empty();
    let identity_id = activated(&repo).await;
    let (a, b) = (actor(10), actor(11));
    suspend(&repo, identity_id, a).await;

    let account = repo.stored(identity_id).unwrap();
    assert_eq!(account.status(), AccountStatus::Suspended);
    assert_eq!(account.suspended_by(), Some(a));
    assert_eq!(account.suspension().unwrap().reason, "policy violation");
    assert!(matches!(
        ensure_may_lift_suspension(&account, b),
        Err(AccountsServiceError::NotSuspender)
    ));
    assert!(ensure_may_lift_suspension(&account, a).is_ok());
}

#[tokio::test]
async fn should_let_core_lift_suspension_for_any_actor() {
    let repo = MockAccountRepo::empty();
    let identity_id = activated(&repo).await;
    let (a, b) = (actor(10), actor(11));
    suspend(&repo, identity_id, a).await;

    let account = LiftSuspensionUseCase {
        accounts: repo.clone(),
    }
    .execute(ActorInput {
        identity_id,
        actor: b,
    })
    .await
    .unwrap();

    assert_eq!(account.status(), AccountStatus::Activated);
    let suspension = account.suspension().unwrap();
    assert_eq!(suspension.by, a);
    assert_eq!(suspension.lifted.unwrap().by, b);
}

#[tokio::test]
async fn should_reject_suspension_with_blank_reason() {
    let repo = MockAccountRepo::empty();
    let identity_id = activated(&repo).await;

    let result = SuspendAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ReasonedInput {
        identity_id,
        actor: actor(1),
        reason: "   ".to_owned(),
    })
    .await;

    assert!(matches!(result, Err(AccountsServiceError::EmptyReason)));
    assert_eq!(
        repo.stored(identity_id).unwrap().status(),
        AccountStatus::Activated
    );
}

#[tokio::test]
async fn should_reject_suspending_pending_account() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    seed_account(&repo, &identity, "creator", None).await;

    let result = SuspendAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ReasonedInput {
        identity_id: identity.id,
        actor: actor(1),
        reason: "spam".to_owned(),
    })
    .await;

    assert!(matches!(
        result,
        Err(AccountsServiceError::InvalidTransition {
            status: AccountStatus::Pending,
            ..
        })
    ));
}

#[tokio::test]
async fn should_preserve_deactivation_audit_after_reactivation() {
    let repo = MockAccountRepo::empty();
    let identity_id = activated(&repo).await;

    DeactivateAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ReasonedInput {
        identity_id,
        actor: actor(2),
        reason: "contract ended".to_owned(),
    })
    .await
    .unwrap();
    let account = ReactivateAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ActorInput {
        identity_id,
        actor: actor(3),
    })
    .await
    .unwrap();

    assert_eq!(account.status(), AccountStatus::Activated);
    assert!(!account.is_deactivated());
    let deactivation = account.deactivation().unwrap();
    assert_eq!(deactivation.by, actor(2));
    assert_eq!(deactivation.reason, "contract ended");
    assert_eq!(deactivation.reactivated.unwrap().by, actor(3));
    assert_eq!(
        repo.outbox_kinds(),
        vec![
            "account_created",
            "account_activated",
            "account_deactivated",
            "account_reactivated"
        ]
    );
}

#[tokio::test]
async fn should_deactivate_suspended_account_and_clear_suspension_on_reactivate() {
    let repo = MockAccountRepo::empty();
    let identity_id = activated(&repo).await;
    suspend(&repo, identity_id, actor(10)).await;

    let deactivated = DeactivateAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ReasonedInput {
        identity_id,
        actor: actor(2),
        reason: "repeat offender".to_owned(),
    })
    .await
    .unwrap();
    assert_eq!(deactivated.status(), AccountStatus::Deactivated);

    let reactivated = ReactivateAccountUseCase {
        accounts: repo.clone(),
    }
    .execute(ActorInput {
        identity_id,
        actor: actor(3),
    })
    .await
    .unwrap();
    assert_eq!(reactivated.status(), AccountStatus::Activated);
    assert!(!reactivated.is_suspended());
    assert_eq!(reactivated.suspended_by(), Some(actor(10)));
}

#[tokio::test]
async fn should_strip_and_restore_permissions_without_touching_role() {
    let repo = MockAccountRepo::empty();
    let identity_id = activated(&repo).await;

    let revoked = RevokeAccessUseCase {
        accounts: repo.clone(),
    }
    .execute(ReasonedInput {
        identity_id,
        actor: actor(1),
        reason: "demoted to regular user".to_owned(),
    })
    .await
    .unwrap();
    assert_eq!(revoked.role(), Role::Admin);
    assert!(revoked.permissions().is_empty());
    assert_eq!(revoked.access_level(), AccessLevel::NoAccess);
    assert!(revoked.history().is_empty());

    let again = RevokeAccessUseCase {
        accounts: repo.clone(),
    }
    .execute(ReasonedInput {
        identity_id,
        actor: actor(1),
        reason: "again".to_owned(),
    })
    .await;
    assert!(matches!(again, Err(AccountsServiceError::AccessAlreadyRevoked)));

    let restored = RestoreAccessUseCase {
        accounts: repo.clone(),
    }
    .execute(ActorInput {
        identity_id,
        actor: actor(1),
    })
    .await
    .unwrap();
    assert_eq!(restored.permissions(), &role::resolve(Role::Admin).permissions);
    assert_eq!(restored.access_level(), AccessLevel::LimitedAccess);
}

#[tokio::test]
async fn should_reject_stale_write_with_version_conflict() {
    let repo = MockAccountRepo::empty();
    let identity_id = activated(&repo).await;

    let mut stale = repo.find_by_identity(identity_id).await.unwrap().unwrap();
    let stale_version = stale.version();
    suspend(&repo, identity_id, actor(10)).await;

    stale
        .deactivate(actor(2), "racing update", Utc::now())
        .unwrap();
    stale.mark_written(Utc::now());
    let result = repo.save(&stale, stale_version, &[]).await;

    assert!(matches!(result, Err(AccountsServiceError::VersionConflict)));
    assert_eq!(
        repo.stored(identity_id).unwrap().status(),
        AccountStatus::Suspended
    );
}

#[tokio::test]
async fn should_gate_transition_on_actor_permission() {
    use lettly_accounts::usecase::policy::ensure_permission;
    use lettly_domain::permission::Permission;

    let repo = MockAccountRepo::empty();
    let creator = seed_account(&repo, &crate::helpers::other_identity(), "creator", None).await;
    let identity_id = activated(&repo).await;

    let actor_account = repo.find_by_id(creator.id()).await.unwrap().unwrap();
    let result = ensure_permission(&actor_account, Permission::UsersSuspend);
    assert!(matches!(
        result,
        Err(AccountsServiceError::MissingPermission(Permission::UsersSuspend))
    ));
    assert_eq!(
        repo.stored(identity_id).unwrap().status(),
        AccountStatus::Activated
    );
}
