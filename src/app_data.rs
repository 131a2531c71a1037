use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppSettings;
use crate::services::{AuditLogger, Guard};
use crate::stores::{ActivityStore, CredentialStore, DirectoryStore, SessionStore};

/// Centralized application data following the main-owned stores pattern.
///
/// Every store is created exactly once here, wrapped in an Arc, and shared
/// across the API structs. The guard and audit logger sit on top of the same
/// store instances.
pub struct AppData {
    pub db: DatabaseConnection,
    pub users: Arc<CredentialStore>,
    pub directory: Arc<DirectoryStore>,
    pub activities: Arc<ActivityStore>,
    pub sessions: Arc<SessionStore>,
    pub guard: Arc<Guard>,
    pub audit: Arc<AuditLogger>,
    pub cookie_secure: bool,
}

impl AppData {
    pub fn init(db: DatabaseConnection, settings: &AppSettings) -> Self {
        tracing::debug!("Creating stores...");
        let users = Arc::new(CredentialStore::new(db.clone()));
        let directory = Arc::new(DirectoryStore::new(db.clone()));
        let activities = Arc::new(ActivityStore::new(db.clone()));
        let sessions = Arc::new(SessionStore::new(
            db.clone(),
            settings.session_secret.clone(),
            settings.session_ttl_hours,
        ));
        let guard = Arc::new(Guard::new(sessions.clone(), users.clone(), directory.clone()));
        let audit = Arc::new(AuditLogger::new(activities.clone()));
        tracing::debug!("Stores created");

        Self {
            db,
            users,
            directory,
            activities,
            sessions,
            guard,
            audit,
            cookie_secure: settings.cookie_secure,
        }
    }
}
