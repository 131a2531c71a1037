mod common;

use common::{admin_session, setup_app};
use poem::web::cookie::CookieJar;
use poem_openapi::{param::Path, payload::Json};

use userdesk_backend::api::auth::RegisterResponse;
use userdesk_backend::api::{AuthApi, UsersApi, SESSION_COOKIE};
use userdesk_backend::errors::ApiError;
use userdesk_backend::types::dto::auth::{LoginRequest, RegisterRequest};
use userdesk_backend::types::internal::Action;

fn register_body(group_id: i32) -> RegisterRequest {
    RegisterRequest {
        username: "alice".to_string(),
        password: "password123".to_string(),
        email: "alice@example.com".to_string(),
        first_name: "Alice".to_string(),
        last_name: "Almeida".to_string(),
        avatar_url: None,
        group_id,
    }
}

fn login_body() -> LoginRequest {
    LoginRequest {
        username: "alice".to_string(),
        password: "password123".to_string(),
    }
}

#[tokio::test]
async fn test_block_cycle_gates_login() {
    let data = setup_app().await;
    let auth_api = AuthApi::new(data.clone());
    let users_api = UsersApi::new(data.clone());

    let staff = data
        .directory
        .find_group_by_name("Marketing")
        .await
        .unwrap()
        .unwrap();

    // Register opens a session immediately
    let jar = CookieJar::default();
    let result = auth_api.register(&jar, Json(register_body(staff.id))).await;
    let RegisterResponse::Created(user) = result.unwrap();
    assert!(jar.get(SESSION_COOKIE).is_some());

    // A fresh login works
    auth_api
        .login(&CookieJar::default(), Json(login_body()))
        .await
        .unwrap();

    // Admin blocks the account; the next login is refused with the blocked
    // variant, not the generic credential failure
    users_api
        .block(admin_session(&data).await, Path(user.id))
        .await
        .unwrap();
    let refused = auth_api
        .login(&CookieJar::default(), Json(login_body()))
        .await;
    assert!(matches!(refused, Err(ApiError::AccountBlocked(_))));

    // Unblock restores access
    users_api
        .unblock(admin_session(&data).await, Path(user.id))
        .await
        .unwrap();
    let restored = auth_api
        .login(&CookieJar::default(), Json(login_body()))
        .await
        .unwrap();
    assert!(restored.last_login.is_some());
}

#[tokio::test]
async fn test_lifecycle_leaves_an_audit_trail() {
    let data = setup_app().await;
    let auth_api = AuthApi::new(data.clone());
    let users_api = UsersApi::new(data.clone());

    let staff = data
        .directory
        .find_group_by_name("Development")
        .await
        .unwrap()
        .unwrap();

    let jar = CookieJar::default();
    let result = auth_api.register(&jar, Json(register_body(staff.id))).await;
    let RegisterResponse::Created(user) = result.unwrap();

    auth_api
        .login(&CookieJar::default(), Json(login_body()))
        .await
        .unwrap();
    users_api
        .block(admin_session(&data).await, Path(user.id))
        .await
        .unwrap();
    users_api
        .unblock(admin_session(&data).await, Path(user.id))
        .await
        .unwrap();

    // The user's own trail carries register then login
    let own = data.activities.list(Some(user.id)).await.unwrap();
    let own_actions: Vec<&str> = own.iter().map(|e| e.action.as_str()).collect();
    assert!(own_actions.contains(&Action::Register.as_str()));
    assert!(own_actions.contains(&Action::Login.as_str()));

    // Block and unblock are attributed to the admin, newest first
    let admin = data.users.find_by_username("admin").await.unwrap().unwrap();
    let admins = data.activities.list(Some(admin.id)).await.unwrap();
    assert_eq!(admins[0].action, Action::UserUnblock.as_str());
    assert_eq!(admins[1].action, Action::UserBlock.as_str());
}

#[tokio::test]
async fn test_deleting_a_user_revokes_their_sessions() {
    let data = setup_app().await;
    let auth_api = AuthApi::new(data.clone());
    let users_api = UsersApi::new(data.clone());

    let staff = data
        .directory
        .find_group_by_name("Finance")
        .await
        .unwrap()
        .unwrap();

    let jar = CookieJar::default();
    let result = auth_api.register(&jar, Json(register_body(staff.id))).await;
    let RegisterResponse::Created(user) = result.unwrap();
    let token = jar.get(SESSION_COOKIE).unwrap().value_str().to_string();

    users_api
        .delete(admin_session(&data).await, Path(user.id))
        .await
        .unwrap();

    // The cascade removed the session along with the user
    assert!(data.sessions.resolve(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_seeded_admin_can_sign_in() {
    let data = setup_app().await;
    let auth_api = AuthApi::new(data.clone());

    let jar = CookieJar::default();
    let admin = auth_api
        .login(
            &jar,
            Json(LoginRequest {
                username: "admin".to_string(),
                password: common::ADMIN_PASSWORD.to_string(),
            }),
        )
        .await
        .unwrap();

    // The seeded account belongs to the admin group
    let group = data
        .directory
        .get_group(admin.group_id)
        .await
        .unwrap()
        .unwrap();
    assert!(group.is_admin);
}
