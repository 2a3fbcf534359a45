use lettly_accounts::error::AccountsServiceError;
use lettly_accounts::usecase::role::{AssignRoleInput, AssignRoleUseCase};
use lettly_domain::role::{self, AccessLevel, Role};

use crate::helpers::{MockAccountRepo, actor, seed_account, test_identity};

#[tokio::test]
async fn should_promote_admin_to_super_admin_and_record_previous_role() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    seed_account(&repo, &identity, "admin", None).await;

    let account = AssignRoleUseCase {
        accounts: repo.clone(),
    }
    .execute(AssignRoleInput {
        identity_id: identity.id,
        role: "superAdmin".to_owned(),
        actor: actor(1),
        reason: Some("owner handover".to_owned()),
    })
    .await
    .unwrap();

    assert_eq!(account.access_level(), AccessLevel::FullAccess);
    assert_eq!(account.permissions(), &role::resolve(Role::SuperAdmin).permissions);
    assert_eq!(account.history().len(), 1);
    assert_eq!(account.history()[0].role, Role::Admin);
    assert_eq!(account.history()[0].changed_by, actor(1));
    assert_eq!(repo.stored(identity.id), Some(account));
    assert_eq!(repo.outbox_kinds(), vec!["account_created", "role_changed"]);
}

#[tokio::test]
async fn should_match_resolver_after_every_role_change() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    seed_account(&repo, &identity, "creator", None).await;
    let uc = AssignRoleUseCase {
        accounts: repo.clone(),
    };

    let sequence = [Role::Admin, Role::SuperAdmin, Role::Creator, Role::Admin];
    let mut previous = Role::Creator;
    for (n, next) in sequence.into_iter().enumerate() {
        let account = uc
            .execute(AssignRoleInput {
                identity_id: identity.id,
                role: next.as_str().to_owned(),
                actor: actor(1),
                reason: None,
            })
            .await
            .unwrap();
        assert_eq!(account.permissions(), &role::resolve(next).permissions);
        assert_eq!(account.access_level(), role::resolve(next).access_level);
        assert_eq!(account.history().len(), n + 1);
        assert_eq!(account.history()[n].role, previous);
        previous = next;
    }
}

#[tokio::test]
async fn should_reject_assigning_current_role_without_history() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    let created = seed_account(&repo, &identity, "admin", None).await;

    let result = AssignRoleUseCase {
        accounts: repo.clone(),
    }
    .execute(AssignRoleInput {
        identity_id: identity.id,
        role: "admin".to_owned(),
        actor: actor(1),
        reason: None,
    })
    .await;

    assert!(
        matches!(result, Err(AccountsServiceError::RoleUnchanged)),
        "expected RoleUnchanged, got {result:?}"
    );
    assert_eq!(repo.stored(identity.id), Some(created));
    assert_eq!(repo.outbox_kinds(), vec!["account_created"]);
}

#[tokio::test]
async fn should_reject_unknown_role_name() {
    let repo = MockAccountRepo::empty();
    let identity = test_identity();
    seed_account(&repo, &identity, "admin", None).await;

    let result = AssignRoleUseCase {
        accounts: repo.clone(),
    }
    .execute(AssignRoleInput {
        identity_id: identity.id,
        role: "SuperAdmin".to_owned(),
        actor: actor(1),
        reason: None,
    })
    .await;

    assert!(matches!(result, Err(AccountsServiceError::InvalidRole(_))));
}
