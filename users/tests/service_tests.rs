mod common;

use std::time::Duration;

use common::TestApp;
use users::context::Context;
use users::user::errors::UserError;
use users::user::models::LoginInput;
use users::user::models::RegisterInput;
use users::user::models::Role;
use users::user::models::RoleId;
use users::user::models::RoleName;
use users::user::models::UserId;
use users::user::ports::RoleRepository;
use users::user::ports::Tokenizer;
use users::user::ports::UserRepository;
use users::user::ports::UserServicePort;

#[tokio::test]
async fn test_register_bootstraps_default_role_once() {
    let app = TestApp::new();

    let alice = app.register("alice@example.com", "alice", "pass_word!").await;
    let bob = app.register("bob@example.com", "bob", "pass_word!").await;

    let role = app
        .service
        .get_role_by_id(&app.ctx, alice.role_id.as_ref().unwrap())
        .await
        .unwrap();
    assert_eq!(role.name, RoleName::User);
    assert_eq!(bob.role_id, alice.role_id);
    assert_eq!(app.service.list_roles(&app.ctx).await.unwrap().len(), 1);

    assert!(alice.id.is_assigned());
    assert_ne!(alice.hashed_password, "pass_word!");
}

#[tokio::test]
async fn test_register_reuses_existing_user_role() {
    let app = TestApp::new();
    let existing = app
        .service
        .create_role(&app.ctx, Role::new(RoleName::User))
        .await
        .unwrap();

    let alice = app.register("alice@example.com", "alice", "pass_word!").await;

    assert_eq!(alice.role_id, Some(existing.id));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    app.register("alice@example.com", "alice", "pass_word!").await;

    let result = app
        .service
        .register(
            &app.ctx,
            RegisterInput::new("alice@example.com", "alice2", "other_pass"),
        )
        .await;

    assert_eq!(result, Err(UserError::EmailTaken));
    assert_eq!(app.service.list_users(&app.ctx).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_duplicate_username_is_left_to_storage() {
    let app = TestApp::new();
    app.register("alice@example.com", "alice", "pass_word!").await;

    let result = app
        .service
        .register(
            &app.ctx,
            RegisterInput::new("other@example.com", "alice", "pass_word!"),
        )
        .await;

    assert!(matches!(result, Err(UserError::FailedToCreateUser(_))));
}

#[tokio::test]
async fn test_login_outcomes() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com", "alice", "pass_word!").await;

    let token = app
        .service
        .login(&app.ctx, LoginInput::new("alice@example.com", "pass_word!"))
        .await
        .unwrap();
    assert!(!token.is_empty());
    assert_eq!(app.tokenizer.validate_token(&token), Ok(alice.id));

    assert_eq!(
        app.service
            .login(&app.ctx, LoginInput::new("alice@example.com", "wrong"))
            .await,
        Err(UserError::InvalidCredentials)
    );
    assert_eq!(
        app.service
            .login(&app.ctx, LoginInput::new("nobody@example.com", "pass_word!"))
            .await,
        Err(UserError::UserNotFound)
    );
}

#[tokio::test]
async fn test_change_password_same_value_wins_over_wrong_password() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com", "alice", "pass_word!").await;

    let result = app
        .service
        .change_password(&app.ctx, &alice.id, "sharedvalue", "sharedvalue")
        .await;

    assert_eq!(result, Err(UserError::CannotUseSamePassword));
}

#[tokio::test]
async fn test_change_password_then_login() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com", "alice", "pass_word!").await;

    assert_eq!(
        app.service
            .change_password(&app.ctx, &alice.id, "not_it", "new_pass")
            .await,
        Err(UserError::InvalidCredentials)
    );

    app.service
        .change_password(&app.ctx, &alice.id, "pass_word!", "new_pass")
        .await
        .unwrap();

    assert!(app
        .service
        .login(&app.ctx, LoginInput::new("alice@example.com", "new_pass"))
        .await
        .is_ok());
    assert_eq!(
        app.service
            .login(&app.ctx, LoginInput::new("alice@example.com", "pass_word!"))
            .await,
        Err(UserError::InvalidCredentials)
    );
}

#[tokio::test]
async fn test_reset_password_then_login() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com", "alice", "pass_word!").await;

    app.service
        .reset_password(&app.ctx, &alice.id, "pass_word!")
        .await
        .unwrap();
    app.service
        .reset_password(&app.ctx, &alice.id, "fresh_pass")
        .await
        .unwrap();

    assert!(app
        .service
        .login(&app.ctx, LoginInput::new("alice@example.com", "fresh_pass"))
        .await
        .is_ok());
    assert_eq!(
        app.service
            .reset_password(&app.ctx, &UserId::from("ghost"), "x")
            .await,
        Err(UserError::UserNotFound)
    );
}

#[tokio::test]
async fn test_assign_role_and_admin_check() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com", "alice", "pass_word!").await;
    assert!(!app.service.is_admin(&alice).await);

    let admin = app
        .service
        .create_role(&app.ctx, Role::new(RoleName::Admin))
        .await
        .unwrap();

    let promoted = app
        .service
        .assign_role_to_user(&app.ctx, &alice.id, &admin.id)
        .await
        .unwrap();

    assert_eq!(promoted.role_id, Some(admin.id.clone()));
    assert!(app.service.is_admin(&promoted).await);
    assert_eq!(
        app.service.get_user_by_id(&app.ctx, &alice.id).await.unwrap(),
        promoted
    );
}

#[tokio::test]
async fn test_assign_role_unknown_targets_do_not_mutate() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com", "alice", "pass_word!").await;
    let admin = app
        .service
        .create_role(&app.ctx, Role::new(RoleName::Admin))
        .await
        .unwrap();

    assert_eq!(
        app.service
            .assign_role_to_user(&app.ctx, &UserId::from("ghost"), &admin.id)
            .await,
        Err(UserError::UserNotFound)
    );
    assert_eq!(
        app.service
            .assign_role_to_user(&app.ctx, &alice.id, &RoleId::from("ghost"))
            .await,
        Err(UserError::RoleNotFound)
    );

    let stored = app.service.get_user_by_id(&app.ctx, &alice.id).await.unwrap();
    assert_eq!(stored, alice);
}

#[tokio::test]
async fn test_is_admin_with_dangling_role() {
    let app = TestApp::new();
    let admin = app
        .service
        .create_role(&app.ctx, Role::new(RoleName::Admin))
        .await
        .unwrap();
    let alice = app.register("alice@example.com", "alice", "pass_word!").await;
    let promoted = app
        .service
        .assign_role_to_user(&app.ctx, &alice.id, &admin.id)
        .await
        .unwrap();

    app.roles.delete(&app.ctx, &admin.id).await.unwrap();

    assert!(!app.service.is_admin(&promoted).await);
}

#[tokio::test]
async fn test_update_last_seen() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com", "alice", "pass_word!").await;

    tokio::time::sleep(Duration::from_millis(5)).await;
    let before = chrono::Utc::now();
    app.service
        .update_last_seen(&app.ctx, &alice.id)
        .await
        .unwrap();

    let stored = app.users.get_by_id(&app.ctx, &alice.id).await.unwrap();
    assert!(stored.last_seen >= before);
    assert!(stored.last_seen > alice.last_seen);
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com", "alice", "pass_word!").await;

    let mut renamed = alice.clone();
    renamed.username = "alicia".to_string();
    let updated = app.service.update_user(&app.ctx, renamed).await.unwrap();
    assert_eq!(updated.username, "alicia");

    app.service.delete_user(&app.ctx, &alice.id).await.unwrap();
    assert_eq!(
        app.service.get_user_by_id(&app.ctx, &alice.id).await,
        Err(UserError::UserNotFound)
    );
    assert!(matches!(
        app.service.delete_user(&app.ctx, &alice.id).await,
        Err(UserError::FailedToDeleteUser(_))
    ));
    assert!(matches!(
        app.service.update_user(&app.ctx, alice).await,
        Err(UserError::FailedToUpdateUser(_))
    ));
}

#[tokio::test]
async fn test_cancelled_context_surfaces_domain_errors() {
    let app = TestApp::new();
    app.register("alice@example.com", "alice", "pass_word!").await;

    let ctx = Context::background();
    ctx.cancel();

    assert_eq!(
        app.service
            .login(&ctx, LoginInput::new("alice@example.com", "pass_word!"))
            .await,
        Err(UserError::UserNotFound)
    );
    assert_eq!(
        app.service.list_users(&ctx).await,
        Err(UserError::FailedToListUsers("context cancelled".to_string()))
    );
    assert_eq!(
        app.service.list_roles(&ctx).await,
        Err(UserError::FailedToListRoles("context cancelled".to_string()))
    );
}

#[tokio::test]
async fn test_expired_context_is_forwarded() {
    let app = TestApp::new();
    let ctx = Context::background().with_timeout(Duration::from_millis(1));
    tokio::time::sleep(Duration::from_millis(5)).await;

    let result = app
        .service
        .create_role(&ctx, Role::new(RoleName::Admin))
        .await;

    assert_eq!(
        result,
        Err(UserError::FailedToCreateRole(
            "context deadline exceeded".to_string()
        ))
    );
    assert!(app.roles.list(&app.ctx).await.unwrap().is_empty());
}
