//! Test notifications fired from the admin settings page.
//!
//! Missing preconditions are validation errors and never reach a provider.
//! Provider failures are reported as an unsuccessful [`TestOutcome`].

use fluent_templates::fluent_bundle::FluentArgs;
use serde::Serialize;

use crate::core::error::{AppError, AppResult};
use crate::core::utils::html_escape;
use crate::i18n;
use crate::notify::{EmailMessage, NotificationSettings, Notifier};

/// Result of a test send as shown to the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl From<AppResult<()>> for TestOutcome {
    fn from(result: AppResult<()>) -> Self {
        match result {
            Ok(()) => TestOutcome::succeeded(),
            Err(e) => TestOutcome::failed(e.user_message()),
        }
    }
}

impl Notifier {
    /// Sends a test message to the configured Telegram chat.
    pub async fn test_telegram(&self, settings: &NotificationSettings) -> AppResult<TestOutcome> {
        if !settings.telegram_ready() {
            return Err(AppError::validation("Telegram bot token and chat ID are required"));
        }

        let mut args = FluentArgs::new();
        args.set("shop", self.shop_name().to_string());
        let text = i18n::t_args(&settings.telegram_language.lang_id(), "notify-test-telegram", &args);

        let result = self
            .telegram
            .send_text(&settings.telegram_bot_token, &settings.telegram_chat_id, &text)
            .await;

        if let Err(e) = &result {
            log::warn!("Telegram test notification failed: {}", e);
        }
        Ok(TestOutcome::from(result))
    }

    /// Sends a test email to `to` using the configured Resend credentials.
    pub async fn test_email(&self, settings: &NotificationSettings, to: &str) -> AppResult<TestOutcome> {
        let to = to.trim();
        if to.is_empty() {
            return Err(AppError::validation("Enter a test email address"));
        }
        if !settings.email_ready() {
            return Err(AppError::validation("Resend API key and sender address are required"));
        }

        let lang = settings.telegram_language.lang_id();
        let mut args = FluentArgs::new();
        args.set("shop", self.shop_name().to_string());
        let subject = i18n::t_args(&lang, "notify-test-email-subject", &args);
        let body = i18n::t_args(&lang, "notify-test-email-body", &args);

        let message = EmailMessage {
            to: to.to_string(),
            subject,
            html_body: format!("<p>{}</p>", html_escape(&body)),
            text_body: Some(body),
        };

        let result = self.email.send_email(&settings.email_identity(), &message).await;

        if let Err(e) = &result {
            log::warn!("Test email to {} failed: {}", to, e);
        }
        Ok(TestOutcome::from(result))
    }
}
