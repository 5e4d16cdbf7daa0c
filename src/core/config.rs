use once_cell::sync::Lazy;
use std::env;

/// Service configuration.
/// Values are read once from the environment (after `.env` is loaded in main).

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: shopdesk.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "shopdesk.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Port for the HTTP server
/// Read from WEB_PORT environment variable
/// Default: 3000
pub static WEB_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("WEB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000)
});

/// Shop name used in notification texts
/// Read from SHOP_NAME environment variable
pub static SHOP_NAME: Lazy<String> = Lazy::new(|| env::var("SHOP_NAME").unwrap_or_else(|_| "Shop".to_string()));

/// Session verification configuration
pub mod session {
    use once_cell::sync::Lazy;
    use secrecy::SecretString;
    use std::env;

    /// HMAC key shared with the auth provider
    /// Read from SESSION_SECRET (falls back to AUTH_SECRET)
    /// Empty means every session is rejected.
    pub static SESSION_SECRET: Lazy<SecretString> = Lazy::new(|| {
        let raw = env::var("SESSION_SECRET")
            .or_else(|_| env::var("AUTH_SECRET"))
            .unwrap_or_default();
        SecretString::from(raw)
    });

    /// Name of the cookie carrying the session token
    pub const COOKIE_NAME: &str = "session";

    /// Sessions older than this are rejected even when `exp` is missing
    pub const MAX_AGE_SECS: i64 = 30 * 24 * 3600;
}

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    pub(crate) fn parse_admin_users(raw: &str) -> Vec<String> {
        raw.split([',', ' ', '\n', '\t'])
            .map(|part| part.trim().trim_start_matches('@').to_lowercase())
            .filter(|part| !part.is_empty())
            .collect()
    }

    /// Admin usernames (comma-separated, case-insensitive)
    /// Read from ADMIN_USERS environment variable
    pub static ADMIN_USERS: Lazy<Vec<String>> = Lazy::new(|| {
        env::var("ADMIN_USERS")
            .ok()
            .map(|raw| parse_admin_users(&raw))
            .unwrap_or_default()
    });
}

/// Profile page configuration
pub mod profile {
    /// How many orders the profile shows
    pub const RECENT_ORDERS_LIMIT: usize = 5;
}

/// Outbound provider endpoints
pub mod providers {
    use once_cell::sync::Lazy;
    use std::env;

    /// Resend API base URL
    /// Read from RESEND_API_URL environment variable
    pub static RESEND_API_URL: Lazy<String> =
        Lazy::new(|| env::var("RESEND_API_URL").unwrap_or_else(|_| "https://api.resend.com".to_string()));

    /// Optional Telegram Bot API override (local bot API server, mocks)
    /// Read from TELEGRAM_API_URL environment variable
    pub static TELEGRAM_API_URL: Lazy<Option<String>> =
        Lazy::new(|| env::var("TELEGRAM_API_URL").ok().filter(|s| !s.trim().is_empty()));
}

/// Network configuration
pub mod network {
    use std::time::Duration;

    /// Request timeout for provider calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 15;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}
