// API layer - HTTP endpoints
pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod groups;
pub mod health;
pub mod permissions;
pub mod users;

pub use activities::ActivitiesApi;
pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use groups::GroupsApi;
pub use health::HealthApi;
pub use permissions::PermissionsApi;
pub use users::UsersApi;

use std::time::Duration;

use poem::web::cookie::{Cookie, CookieJar, SameSite};
use poem_openapi::{auth::ApiKey, SecurityScheme, Tags};

/// Name of the browser cookie carrying the session token
pub const SESSION_COOKIE: &str = "userdesk_session";

/// Session cookie authentication. The cookie value is the plaintext session
/// token; only its HMAC digest ever reaches storage.
#[derive(SecurityScheme)]
#[oai(ty = "api_key", key_name = "userdesk_session", key_in = "cookie")]
pub struct SessionAuth(pub ApiKey);

/// API tags grouping the endpoints in the generated documentation
#[derive(Tags)]
pub(crate) enum ApiTags {
    /// Session and account endpoints
    Auth,
    /// User administration
    Users,
    /// Group administration
    Groups,
    /// Permission administration
    Permissions,
    /// Audit log
    Activities,
    /// Dashboard statistics
    Dashboard,
    /// Service health
    Health,
}

/// Place a fresh session cookie on the response.
pub(crate) fn set_session_cookie(jar: &CookieJar, token: String, max_age_seconds: i64, secure: bool) {
    let mut cookie = Cookie::new_with_str(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie.set_max_age(Duration::from_secs(max_age_seconds.max(0) as u64));
    jar.add(cookie);
}

/// Expire the session cookie on the client.
pub(crate) fn clear_session_cookie(jar: &CookieJar) {
    let mut cookie = Cookie::new_with_str(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(Duration::from_secs(0));
    jar.add(cookie);
}

/// Shallow shape check for email addresses: one `@`, a non-empty local
/// part, a dotted domain, no whitespace. Deliverability is not checked.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}
