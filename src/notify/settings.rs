//! Notification settings aggregate.
//!
//! The settings are always handled as one value: the page renders all seven
//! fields in both forms, a submission converts into a complete
//! [`NotificationSettings`], and storage replaces the whole record. A save
//! therefore never clears fields belonging to the other section.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use unic_langid::LanguageIdentifier;

use crate::core::error::{AppError, AppResult};

/// Language of the messages pushed to the Telegram chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TelegramLanguage {
    #[default]
    Zh,
    En,
}

impl TelegramLanguage {
    pub fn lang_id(self) -> LanguageIdentifier {
        crate::i18n::lang_from_code(self.as_ref())
    }

    /// Human-friendly name shown in the language selector.
    pub fn label(self) -> &'static str {
        match self {
            TelegramLanguage::Zh => "中文",
            TelegramLanguage::En => "English",
        }
    }

    pub const ALL: [TelegramLanguage; 2] = [TelegramLanguage::Zh, TelegramLanguage::En];
}

/// Telegram and email (Resend) notification configuration.
#[derive(Debug, Clone, Default)]
pub struct NotificationSettings {
    pub telegram_bot_token: SecretString,
    pub telegram_chat_id: String,
    pub telegram_language: TelegramLanguage,
    pub resend_api_key: SecretString,
    pub resend_from_email: String,
    pub resend_from_name: String,
    pub resend_enabled: bool,
}

impl NotificationSettings {
    /// Bot token and chat id are both present.
    pub fn telegram_ready(&self) -> bool {
        !self.telegram_bot_token.expose_secret().trim().is_empty() && !self.telegram_chat_id.trim().is_empty()
    }

    /// API key and sender address are both present.
    pub fn email_ready(&self) -> bool {
        !self.resend_api_key.expose_secret().trim().is_empty() && !self.resend_from_email.trim().is_empty()
    }

    /// Form representation with every field, secrets included.
    ///
    /// Used to render the settings page, whose forms must echo each value back.
    pub fn to_form(&self) -> SettingsForm {
        SettingsForm {
            telegram_bot_token: self.telegram_bot_token.expose_secret().to_string(),
            telegram_chat_id: self.telegram_chat_id.clone(),
            telegram_language: self.telegram_language.to_string(),
            resend_api_key: self.resend_api_key.expose_secret().to_string(),
            resend_from_email: self.resend_from_email.clone(),
            resend_from_name: self.resend_from_name.clone(),
            resend_enabled: self.resend_enabled,
        }
    }

    /// JSON view with secrets masked.
    pub fn masked(&self) -> MaskedSettings {
        MaskedSettings {
            telegram_bot_token: mask_secret(self.telegram_bot_token.expose_secret()),
            telegram_chat_id: self.telegram_chat_id.clone(),
            telegram_language: self.telegram_language,
            resend_api_key: mask_secret(self.resend_api_key.expose_secret()),
            resend_from_email: self.resend_from_email.clone(),
            resend_from_name: self.resend_from_name.clone(),
            resend_enabled: self.resend_enabled,
            telegram_ready: self.telegram_ready(),
            email_ready: self.email_ready(),
        }
    }
}

impl NotificationSettings {
    /// Keeps the stored secret wherever the submission echoed its masked form.
    ///
    /// JSON clients read masked secrets; sending one back unchanged must not
    /// overwrite the real value with the mask.
    pub fn retain_masked_secrets(mut self, current: &NotificationSettings) -> Self {
        let token = current.telegram_bot_token.expose_secret();
        if is_mask_of(self.telegram_bot_token.expose_secret(), token) {
            self.telegram_bot_token = current.telegram_bot_token.clone();
        }
        let api_key = current.resend_api_key.expose_secret();
        if is_mask_of(self.resend_api_key.expose_secret(), api_key) {
            self.resend_api_key = current.resend_api_key.clone();
        }
        self
    }
}

fn is_mask_of(submitted: &str, secret: &str) -> bool {
    !secret.is_empty() && submitted == mask_secret(secret)
}

/// Submitted settings, as posted by either form or the JSON API.
///
/// Field names match the page's input names. A missing `resendEnabled` means
/// an unchecked checkbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsForm {
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub telegram_language: String,
    pub resend_api_key: String,
    pub resend_from_email: String,
    pub resend_from_name: String,
    #[serde(deserialize_with = "deserialize_checkbox")]
    pub resend_enabled: bool,
}

impl TryFrom<SettingsForm> for NotificationSettings {
    type Error = AppError;

    fn try_from(form: SettingsForm) -> AppResult<Self> {
        let language = form.telegram_language.trim();
        let telegram_language = if language.is_empty() {
            TelegramLanguage::default()
        } else {
            language
                .parse()
                .map_err(|_| AppError::validation(format!("Unsupported Telegram language: {}", language)))?
        };

        Ok(NotificationSettings {
            telegram_bot_token: SecretString::from(form.telegram_bot_token.trim().to_string()),
            telegram_chat_id: form.telegram_chat_id.trim().to_string(),
            telegram_language,
            resend_api_key: SecretString::from(form.resend_api_key.trim().to_string()),
            resend_from_email: form.resend_from_email.trim().to_string(),
            resend_from_name: form.resend_from_name.trim().to_string(),
            resend_enabled: form.resend_enabled,
        })
    }
}

/// JSON API update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdate {
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_language: Option<String>,
    pub resend_api_key: Option<String>,
    pub resend_from_email: Option<String>,
    pub resend_from_name: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_checkbox")]
    pub resend_enabled: Option<bool>,
}

impl SettingsUpdate {
    /// Full submission: the stored record overlaid with the fields present.
    pub fn apply_to(self, current: &NotificationSettings) -> SettingsForm {
        let stored = current.to_form();
        SettingsForm {
            telegram_bot_token: self.telegram_bot_token.unwrap_or(stored.telegram_bot_token),
            telegram_chat_id: self.telegram_chat_id.unwrap_or(stored.telegram_chat_id),
            telegram_language: self.telegram_language.unwrap_or(stored.telegram_language),
            resend_api_key: self.resend_api_key.unwrap_or(stored.resend_api_key),
            resend_from_email: self.resend_from_email.unwrap_or(stored.resend_from_email),
            resend_from_name: self.resend_from_name.unwrap_or(stored.resend_from_name),
            resend_enabled: self.resend_enabled.unwrap_or(stored.resend_enabled),
        }
    }
}

/// Settings as returned by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedSettings {
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub telegram_language: TelegramLanguage,
    pub resend_api_key: String,
    pub resend_from_email: String,
    pub resend_from_name: String,
    pub resend_enabled: bool,
    pub telegram_ready: bool,
    pub email_ready: bool,
}

/// Keeps the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "••••".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("••••{}", tail)
}

/// Accepts JSON booleans and HTML checkbox values ("on", "true", "1").
fn deserialize_checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Checkbox {
        Bool(bool),
        Text(String),
    }

    Ok(match Checkbox::deserialize(deserializer)? {
        Checkbox::Bool(value) => value,
        Checkbox::Text(text) => matches!(text.trim().to_lowercase().as_str(), "on" | "true" | "1" | "yes"),
    })
}

fn deserialize_optional_checkbox<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_checkbox(deserializer).map(Some)
}
