//! Notification channels: settings, Telegram and email senders, test sends
//! and order event dispatch.

pub mod email;
pub mod events;
pub mod settings;
pub mod telegram;
pub mod test_send;

use std::sync::Arc;

use crate::core::config;
use crate::core::error::AppResult;

pub use email::{EmailIdentity, EmailMessage, EmailSender, ResendClient};
pub use events::{DispatchReport, OrderEvent};
pub use settings::{NotificationSettings, SettingsForm, SettingsUpdate, TelegramLanguage};
pub use telegram::{TelegramClient, TelegramSender};
pub use test_send::TestOutcome;

/// Delivers notifications through the configured channels.
///
/// Holds the transport clients only; the per-shop credentials come from
/// [`NotificationSettings`] on every call.
#[derive(Clone)]
pub struct Notifier {
    telegram: Arc<dyn TelegramSender>,
    email: Arc<dyn EmailSender>,
    shop_name: String,
}

impl Notifier {
    pub fn new(telegram: Arc<dyn TelegramSender>, email: Arc<dyn EmailSender>, shop_name: impl Into<String>) -> Self {
        Self {
            telegram,
            email,
            shop_name: shop_name.into(),
        }
    }

    /// Notifier wired to the real Bot API and Resend endpoints.
    pub fn from_config() -> AppResult<Self> {
        Ok(Self::new(
            Arc::new(TelegramClient::from_config()),
            Arc::new(ResendClient::from_config()?),
            config::SHOP_NAME.as_str(),
        ))
    }

    pub fn shop_name(&self) -> &str {
        &self.shop_name
    }
}

impl NotificationSettings {
    /// Sender identity for the email channel.
    pub fn email_identity(&self) -> EmailIdentity {
        EmailIdentity {
            api_key: self.resend_api_key.clone(),
            from_email: self.resend_from_email.clone(),
            from_name: self.resend_from_name.clone(),
        }
    }
}
