//! Recording senders and wiremock helpers for the Bot API and Resend

#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Mutex;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopdesk::core::error::{AppError, AppResult};
use shopdesk::notify::{EmailIdentity, EmailMessage, EmailSender, TelegramSender};

/// Telegram sender that records messages instead of sending them.
#[derive(Default)]
pub struct RecordingTelegram {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail_with: Option<String>,
}

impl RecordingTelegram {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl TelegramSender for RecordingTelegram {
    async fn send_text(&self, _bot_token: &SecretString, chat_id: &str, text: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push((chat_id.to_string(), text.to_string()));
        match &self.fail_with {
            Some(message) => Err(AppError::Provider(message.clone())),
            None => Ok(()),
        }
    }
}

/// Email sender that records messages instead of sending them.
#[derive(Default)]
pub struct RecordingEmail {
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingEmail {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailSender for RecordingEmail {
    async fn send_email(&self, _identity: &EmailIdentity, message: &EmailMessage) -> AppResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Mock a successful sendMessage API call
pub async fn mount_send_message_ok(server: &MockServer) {
    let response = serde_json::json!({
        "ok": true,
        "result": {
            "message_id": 42,
            "from": {
                "id": 987654321,
                "is_bot": true,
                "first_name": "ShopBot",
                "username": "shop_bot"
            },
            "chat": {
                "id": 123456789,
                "first_name": "Admin",
                "type": "private"
            },
            "date": 1735992000,
            "text": "Test notification"
        }
    });

    Mock::given(method("POST"))
        .and(path_regex("(?i)/bot[^/]+/sendmessage$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

/// Mock a sendMessage call rejected by the Bot API
pub async fn mount_send_message_error(server: &MockServer, error_code: u16, description: &str) {
    let response = serde_json::json!({
        "ok": false,
        "error_code": error_code,
        "description": description
    });

    Mock::given(method("POST"))
        .and(path_regex("(?i)/bot[^/]+/sendmessage$"))
        .respond_with(ResponseTemplate::new(error_code).set_body_json(response))
        .mount(server)
        .await;
}

/// Mock an accepted Resend `POST /emails`
pub async fn mount_resend_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "email_123" })))
        .mount(server)
        .await;
}

/// Mock a rejected Resend `POST /emails`
pub async fn mount_resend_error(server: &MockServer, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "statusCode": status,
            "name": "validation_error",
            "message": message
        })))
        .mount(server)
        .await;
}
