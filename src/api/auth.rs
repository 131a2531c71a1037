use std::sync::Arc;

use poem::web::cookie::CookieJar;
use poem_openapi::{payload::Json, ApiResponse, OpenApi};

use crate::api::{clear_session_cookie, is_valid_email, set_session_cookie, ApiTags, SessionAuth};
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::services::crypto;
use crate::stores::credential_store::NewUser;
use crate::types::dto::auth::{LoginRequest, RecoverPasswordRequest, RegisterRequest};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::UserResponse;
use crate::types::internal::Action;

/// Session and account endpoints
pub struct AuthApi {
    data: Arc<AppData>,
}

impl AuthApi {
    pub fn new(data: Arc<AppData>) -> Self {
        Self { data }
    }
}

#[derive(ApiResponse)]
pub enum RegisterResponse {
    /// Account created; the response also sets the session cookie
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}

#[OpenApi]
impl AuthApi {
    /// Register a new account and open a session for it
    #[oai(path = "/register", method = "post", tag = "ApiTags::Auth")]
    pub async fn register(
        &self,
        cookie_jar: &CookieJar,
        body: Json<RegisterRequest>,
    ) -> Result<RegisterResponse, ApiError> {
        if !is_valid_email(&body.email) {
            return Err(ApiError::validation("Email address is not valid"));
        }
        let group = self
            .data
            .directory
            .get_group(body.group_id)
            .await?
            .ok_or_else(|| ApiError::validation("Target group does not exist"))?;
        if group.is_admin {
            return Err(ApiError::forbidden(
                "Cannot self-register into an administrators group",
            ));
        }

        let body = body.0;
        let user = self
            .data
            .users
            .create_user(NewUser {
                username: body.username,
                email: body.email,
                password_hash: crypto::hash_password(&body.password)?,
                first_name: body.first_name,
                last_name: body.last_name,
                avatar_url: body.avatar_url,
                group_id: body.group_id,
            })
            .await?;

        let token = self.data.sessions.open(user.id).await?;
        set_session_cookie(
            cookie_jar,
            token,
            self.data.sessions.ttl_seconds(),
            self.data.cookie_secure,
        );

        self.data
            .audit
            .log(
                user.id,
                Action::Register,
                format!("Account {} registered", user.username),
            )
            .await;

        tracing::info!(user_id = user.id, username = %user.username, "Account registered");
        Ok(RegisterResponse::Created(Json(user.into())))
    }

    /// Authenticate with username and password
    #[oai(path = "/login", method = "post", tag = "ApiTags::Auth")]
    pub async fn login(
        &self,
        cookie_jar: &CookieJar,
        body: Json<LoginRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        // Unknown user and wrong password answer identically
        let user = self
            .data
            .users
            .find_by_username(&body.username)
            .await?
            .ok_or_else(ApiError::invalid_credentials)?;

        if !crypto::verify_password(&body.password, &user.password_hash) {
            return Err(ApiError::invalid_credentials());
        }
        if user.is_blocked {
            return Err(ApiError::account_blocked());
        }

        let user = self.data.users.touch_last_login(user.id).await?;

        let token = self.data.sessions.open(user.id).await?;
        set_session_cookie(
            cookie_jar,
            token,
            self.data.sessions.ttl_seconds(),
            self.data.cookie_secure,
        );

        self.data
            .audit
            .log(user.id, Action::Login, "Signed in")
            .await;

        Ok(Json(user.into()))
    }

    /// Close the current session
    #[oai(path = "/logout", method = "post", tag = "ApiTags::Auth")]
    pub async fn logout(
        &self,
        auth: SessionAuth,
        cookie_jar: &CookieJar,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let user = self.data.guard.require_user(&auth.0.key).await?;

        self.data.sessions.close(&auth.0.key).await?;
        clear_session_cookie(cookie_jar);

        self.data
            .audit
            .log(user.id, Action::Logout, "Signed out")
            .await;

        Ok(Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }))
    }

    /// Return the user behind the current session
    #[oai(path = "/session", method = "get", tag = "ApiTags::Auth")]
    pub async fn session(&self, auth: SessionAuth) -> Result<Json<UserResponse>, ApiError> {
        let user = self.data.guard.require_user(&auth.0.key).await?;
        Ok(Json(user.into()))
    }

    /// Record a password recovery request.
    ///
    /// No mail is sent; the request is only audited. The endpoint still
    /// answers 404 for an unknown email, matching the behavior clients
    /// already depend on.
    #[oai(path = "/recover-password", method = "post", tag = "ApiTags::Auth")]
    pub async fn recover_password(
        &self,
        body: Json<RecoverPasswordRequest>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let user = self
            .data
            .users
            .find_by_email(&body.email)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        self.data
            .audit
            .log(user.id, Action::PasswordRecovery, "Password recovery requested")
            .await;

        Ok(Json(MessageResponse {
            message: "Password recovery requested".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppSettings;
    use crate::types::internal::Action;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> (Arc<AppData>, AuthApi, i32) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let settings = AppSettings {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            session_secret: "auth-api-test-secret".to_string(),
            session_ttl_hours: 24,
            cookie_secure: false,
            admin_password: None,
        };
        let data = Arc::new(AppData::init(db, &settings));

        let staff = data
            .directory
            .create_group("Staff", None, "#3B82F6", false)
            .await
            .unwrap();

        (data.clone(), AuthApi::new(data), staff.id)
    }

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

    #[tokio::test]
    async fn test_register_creates_account_and_session_cookie() {
        let (data, api, staff_id) = setup().await;
        let jar = CookieJar::default();

        let result = api.register(&jar, Json(register_body(staff_id))).await;
        let RegisterResponse::Created(user) = result.unwrap();
        assert_eq!(user.username, "alice");

        // The session cookie resolves to the new account
        let cookie = jar.get(crate::api::SESSION_COOKIE).unwrap();
        let resolved = data.sessions.resolve(&cookie.value_str()).await.unwrap();
        assert_eq!(resolved, Some(user.id));

        // Registration was audited
        let entries = data.activities.list(Some(user.id)).await.unwrap();
        assert_eq!(entries[0].action, Action::Register.as_str());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let (_data, api, staff_id) = setup().await;
        let jar = CookieJar::default();
        api.register(&jar, Json(register_body(staff_id))).await.unwrap();

        let mut duplicate = register_body(staff_id);
        duplicate.email = "other@example.com".to_string();
        let result = api.register(&CookieJar::default(), Json(duplicate)).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_into_admin_group_is_forbidden() {
        let (data, api, _staff_id) = setup().await;
        let admins = data
            .directory
            .create_group("Administrators", None, "#EF4444", true)
            .await
            .unwrap();

        let result = api
            .register(&CookieJar::default(), Json(register_body(admins.id)))
            .await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_register_into_unknown_group_is_rejected() {
        let (_data, api, _staff_id) = setup().await;
        let result = api
            .register(&CookieJar::default(), Json(register_body(9999)))
            .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let (data, api, staff_id) = setup().await;

        let mut body = register_body(staff_id);
        body.email = "not-an-email".to_string();
        let result = api.register(&CookieJar::default(), Json(body)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        // Nothing was stored for the refused registration
        assert!(data
            .users
            .find_by_email("not-an-email")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials_touches_last_login() {
        let (_data, api, staff_id) = setup().await;
        api.register(&CookieJar::default(), Json(register_body(staff_id)))
            .await
            .unwrap();

        let jar = CookieJar::default();
        let user = api
            .login(
                &jar,
                Json(LoginRequest {
                    username: "alice".to_string(),
                    password: "password123".to_string(),
                }),
            )
            .await
            .unwrap();

        assert!(user.last_login.is_some());
        assert!(jar.get(crate::api::SESSION_COOKIE).is_some());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (_data, api, staff_id) = setup().await;
        api.register(&CookieJar::default(), Json(register_body(staff_id)))
            .await
            .unwrap();

        let unknown_user = api
            .login(
                &CookieJar::default(),
                Json(LoginRequest {
                    username: "nobody".to_string(),
                    password: "password123".to_string(),
                }),
            )
            .await;
        let wrong_password = api
            .login(
                &CookieJar::default(),
                Json(LoginRequest {
                    username: "alice".to_string(),
                    password: "not-the-password".to_string(),
                }),
            )
            .await;

        let unknown_user = unknown_user.err().unwrap();
        let wrong_password = wrong_password.err().unwrap();
        assert!(matches!(unknown_user, ApiError::InvalidCredentials(_)));
        assert!(matches!(wrong_password, ApiError::InvalidCredentials(_)));
        assert_eq!(unknown_user.message(), wrong_password.message());
    }

    #[tokio::test]
    async fn test_login_refused_for_blocked_account() {
        let (data, api, staff_id) = setup().await;
        let jar = CookieJar::default();
        let result = api.register(&jar, Json(register_body(staff_id))).await;
        let RegisterResponse::Created(user) = result.unwrap();

        data.users.block_user(user.id).await.unwrap();

        let blocked_jar = CookieJar::default();
        let result = api
            .login(
                &blocked_jar,
                Json(LoginRequest {
                    username: "alice".to_string(),
                    password: "password123".to_string(),
                }),
            )
            .await;
        assert!(matches!(result, Err(ApiError::AccountBlocked(_))));
        // No session cookie is issued on a refused login
        assert!(blocked_jar.get(crate::api::SESSION_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_logout_closes_session() {
        let (data, api, staff_id) = setup().await;
        let jar = CookieJar::default();
        api.register(&jar, Json(register_body(staff_id))).await.unwrap();
        let token = jar.get(crate::api::SESSION_COOKIE).unwrap().value_str().to_string();

        let auth = SessionAuth(poem_openapi::auth::ApiKey { key: token.clone() });
        api.logout(auth, &jar).await.unwrap();

        assert!(data.sessions.resolve(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_returns_current_user() {
        let (_data, api, staff_id) = setup().await;
        let jar = CookieJar::default();
        api.register(&jar, Json(register_body(staff_id))).await.unwrap();
        let token = jar.get(crate::api::SESSION_COOKIE).unwrap().value_str().to_string();

        let user = api
            .session(SessionAuth(poem_openapi::auth::ApiKey { key: token }))
            .await
            .unwrap();
        assert_eq!(user.username, "alice");

        let anonymous = api
            .session(SessionAuth(poem_openapi::auth::ApiKey {
                key: "never-issued".to_string(),
            }))
            .await;
        assert!(matches!(anonymous, Err(ApiError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn test_recover_password_unknown_email_is_404() {
        let (_data, api, _staff_id) = setup().await;
        let result = api
            .recover_password(Json(RecoverPasswordRequest {
                email: "ghost@example.com".to_string(),
            }))
            .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_recover_password_is_audited() {
        let (data, api, staff_id) = setup().await;
        let jar = CookieJar::default();
        let result = api.register(&jar, Json(register_body(staff_id))).await;
        let RegisterResponse::Created(user) = result.unwrap();

        api.recover_password(Json(RecoverPasswordRequest {
            email: "alice@example.com".to_string(),
        }))
        .await
        .unwrap();

        let entries = data.activities.list(Some(user.id)).await.unwrap();
        assert_eq!(entries[0].action, Action::PasswordRecovery.as_str());
    }
}
