use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, middleware::CookieJarManager, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};

use userdesk_backend::api::{
    ActivitiesApi, AuthApi, DashboardApi, GroupsApi, HealthApi, PermissionsApi, UsersApi,
};
use userdesk_backend::app_data::AppData;
use userdesk_backend::config::{init_logging, AppSettings};
use userdesk_backend::services::bootstrap;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let settings = AppSettings::from_env().expect("Invalid configuration");

    let db: DatabaseConnection = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(database_url = %settings.database_url, "Connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    let data = Arc::new(AppData::init(db, &settings));

    bootstrap::seed(
        &data.directory,
        &data.users,
        settings.admin_password.as_deref(),
    )
    .await
    .expect("Failed to seed directory data");

    let swept = data
        .sessions
        .sweep_expired()
        .await
        .expect("Failed to sweep expired sessions");
    if swept > 0 {
        tracing::info!(swept, "Removed expired sessions");
    }

    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(data.clone()),
            UsersApi::new(data.clone()),
            GroupsApi::new(data.clone()),
            PermissionsApi::new(data.clone()),
            ActivitiesApi::new(data.clone()),
            DashboardApi::new(data.clone()),
        ),
        "UserDesk Admin API",
        env!("CARGO_PKG_VERSION"),
    )
    .server("http://localhost:3000/api");

    let ui = api_service.swagger_ui();

    // The cookie jar manager must wrap the routes so handlers can read and
    // set the session cookie
    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(CookieJarManager::new());

    tracing::info!(bind_addr = %settings.bind_addr, "Starting server");
    tracing::info!("Swagger UI available under /swagger");

    Server::new(TcpListener::bind(settings.bind_addr)).run(app).await
}
