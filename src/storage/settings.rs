//! Persistence for the notification settings aggregate.
//!
//! Settings live as key/value rows in the `settings` table. A save writes all
//! keys in one transaction.

use rusqlite::{params, Connection};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::core::error::AppResult;
use crate::notify::settings::{NotificationSettings, TelegramLanguage};
use crate::storage::db::now_millis;

pub const TELEGRAM_BOT_TOKEN: &str = "telegram_bot_token";
pub const TELEGRAM_CHAT_ID: &str = "telegram_chat_id";
pub const TELEGRAM_LANGUAGE: &str = "telegram_language";
pub const RESEND_API_KEY: &str = "resend_api_key";
pub const RESEND_FROM_EMAIL: &str = "resend_from_email";
pub const RESEND_FROM_NAME: &str = "resend_from_name";
pub const RESEND_ENABLED: &str = "resend_enabled";

const ALL_KEYS: [&str; 7] = [
    TELEGRAM_BOT_TOKEN,
    TELEGRAM_CHAT_ID,
    TELEGRAM_LANGUAGE,
    RESEND_API_KEY,
    RESEND_FROM_EMAIL,
    RESEND_FROM_NAME,
    RESEND_ENABLED,
];

/// Loads the notification settings, using defaults for keys never saved.
pub fn load_settings(conn: &Connection) -> AppResult<NotificationSettings> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings WHERE key LIKE 'telegram_%' OR key LIKE 'resend_%'")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?)))?;

    let mut values: HashMap<String, String> = HashMap::new();
    for row in rows {
        let (key, value) = row?;
        if let Some(value) = value {
            values.insert(key, value);
        }
    }

    let text = |key: &str| values.get(key).cloned().unwrap_or_default();

    let telegram_language = match values.get(TELEGRAM_LANGUAGE).map(|s| s.trim()) {
        None | Some("") => TelegramLanguage::default(),
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Stored Telegram language '{}' is not supported, using default", raw);
            TelegramLanguage::default()
        }),
    };

    Ok(NotificationSettings {
        telegram_bot_token: SecretString::from(text(TELEGRAM_BOT_TOKEN)),
        telegram_chat_id: text(TELEGRAM_CHAT_ID),
        telegram_language,
        resend_api_key: SecretString::from(text(RESEND_API_KEY)),
        resend_from_email: text(RESEND_FROM_EMAIL),
        resend_from_name: text(RESEND_FROM_NAME),
        resend_enabled: values.get(RESEND_ENABLED).map(|v| v == "true").unwrap_or(false),
    })
}

/// Upserts every settings key in a single transaction.
///
/// Saving the same aggregate twice leaves the table unchanged apart from
/// `updated_at`.
pub fn save_settings(conn: &mut Connection, settings: &NotificationSettings) -> AppResult<()> {
    let enabled = if settings.resend_enabled { "true" } else { "false" };
    let entries: [(&str, &str); 7] = [
        (TELEGRAM_BOT_TOKEN, settings.telegram_bot_token.expose_secret()),
        (TELEGRAM_CHAT_ID, settings.telegram_chat_id.as_str()),
        (TELEGRAM_LANGUAGE, settings.telegram_language.as_ref()),
        (RESEND_API_KEY, settings.resend_api_key.expose_secret()),
        (RESEND_FROM_EMAIL, settings.resend_from_email.as_str()),
        (RESEND_FROM_NAME, settings.resend_from_name.as_str()),
        (RESEND_ENABLED, enabled),
    ];
    debug_assert_eq!(entries.len(), ALL_KEYS.len());

    let now = now_millis();
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )?;
        for (key, value) in entries {
            stmt.execute(params![key, value, now])?;
        }
    }
    tx.commit()?;

    log::info!("Notification settings saved ({} keys)", ALL_KEYS.len());
    Ok(())
}
