use std::env;

/// Runtime settings, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub bind_addr: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub admin_password: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

impl AppSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://userdesk.db?mode=rwc".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| SettingsError::MissingVariable("SESSION_SECRET"))?;

        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .ok_or(SettingsError::InvalidValue {
                    name: "SESSION_TTL_HOURS",
                    value: raw,
                })?,
            Err(_) => 24,
        };

        let cookie_secure = match env::var("COOKIE_SECURE") {
            Ok(raw) => match raw.as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(SettingsError::InvalidValue {
                        name: "COOKIE_SECURE",
                        value: raw,
                    })
                }
            },
            Err(_) => false,
        };

        let admin_password = env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty());

        Ok(Self {
            database_url,
            bind_addr,
            session_secret,
            session_ttl_hours,
            cookie_secure,
            admin_password,
        })
    }
}
