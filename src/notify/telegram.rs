//! Telegram delivery through the Bot API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use teloxide::prelude::*;
use teloxide::types::Recipient;
use teloxide::RequestError;
use url::Url;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Sends plain-text messages to a Telegram chat.
///
/// The token is passed per call because it lives in the admin-editable
/// settings, not in the process configuration.
#[async_trait]
pub trait TelegramSender: Send + Sync {
    async fn send_text(&self, bot_token: &SecretString, chat_id: &str, text: &str) -> AppResult<()>;
}

/// Bot API client backed by teloxide.
#[derive(Debug, Clone, Default)]
pub struct TelegramClient {
    api_url: Option<Url>,
}

impl TelegramClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the client at a different Bot API server (local server, mocks).
    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.api_url = Some(api_url);
        self
    }

    /// Client honouring `TELEGRAM_API_URL` when it holds a valid URL.
    pub fn from_config() -> Self {
        match config::providers::TELEGRAM_API_URL.as_deref().map(Url::parse) {
            Some(Ok(url)) => Self::new().with_api_url(url),
            Some(Err(e)) => {
                log::warn!("Ignoring invalid TELEGRAM_API_URL: {}", e);
                Self::new()
            }
            None => Self::new(),
        }
    }

    fn bot(&self, token: &str) -> Bot {
        let bot = Bot::new(token);
        match &self.api_url {
            Some(url) => bot.set_api_url(url.clone()),
            None => bot,
        }
    }
}

/// Numeric ids address chats directly; anything else is a channel username.
pub fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if chat_id.starts_with('@') => Recipient::ChannelUsername(chat_id.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{}", chat_id)),
    }
}

#[async_trait]
impl TelegramSender for TelegramClient {
    async fn send_text(&self, bot_token: &SecretString, chat_id: &str, text: &str) -> AppResult<()> {
        let bot = self.bot(bot_token.expose_secret());
        let recipient = parse_recipient(chat_id);

        match bot.send_message(recipient, text).await {
            Ok(message) => {
                log::info!("Telegram message {} delivered to chat {}", message.id.0, message.chat.id);
                Ok(())
            }
            // Bot API rejections carry a readable description
            Err(RequestError::Api(api_error)) => Err(AppError::Provider(api_error.to_string())),
            Err(e) => Err(AppError::Telegram(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_chat_ids_become_chat_ids() {
        assert_eq!(parse_recipient("-1001234"), Recipient::Id(ChatId(-1001234)));
        assert_eq!(parse_recipient(" 42 "), Recipient::Id(ChatId(42)));
    }

    #[test]
    fn names_become_channel_usernames() {
        assert_eq!(
            parse_recipient("@shop_alerts"),
            Recipient::ChannelUsername("@shop_alerts".to_string())
        );
        assert_eq!(
            parse_recipient("shop_alerts"),
            Recipient::ChannelUsername("@shop_alerts".to_string())
        );
    }
}
