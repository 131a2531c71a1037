// Test utilities shared across integration tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem_openapi::auth::ApiKey;
use sea_orm::Database;

use userdesk_backend::api::SessionAuth;
use userdesk_backend::app_data::AppData;
use userdesk_backend::config::AppSettings;
use userdesk_backend::services::bootstrap;

pub const ADMIN_PASSWORD: &str = "integration-admin-password";

/// Create an in-memory application with migrations run and the default
/// directory data seeded (admin user "admin" with `ADMIN_PASSWORD`).
pub async fn setup_app() -> Arc<AppData> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let settings = AppSettings {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        session_secret: "integration-test-secret".to_string(),
        session_ttl_hours: 24,
        cookie_secure: false,
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    };
    let data = Arc::new(AppData::init(db, &settings));

    bootstrap::seed(&data.directory, &data.users, Some(ADMIN_PASSWORD))
        .await
        .expect("Failed to seed directory data");

    data
}

/// Open a session for a user and wrap the token the way handlers receive it.
pub async fn session_for(data: &Arc<AppData>, user_id: i32) -> SessionAuth {
    let token = data
        .sessions
        .open(user_id)
        .await
        .expect("Failed to open session");
    SessionAuth(ApiKey { key: token })
}

/// Session for the seeded administrator account.
pub async fn admin_session(data: &Arc<AppData>) -> SessionAuth {
    let admin = data
        .users
        .find_by_username("admin")
        .await
        .expect("Failed to look up admin")
        .expect("Seeded admin is missing");
    session_for(data, admin.id).await
}
