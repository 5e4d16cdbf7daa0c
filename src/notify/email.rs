//! Transactional email through the Resend HTTP API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Sender identity taken from the notification settings.
#[derive(Debug, Clone)]
pub struct EmailIdentity {
    pub api_key: SecretString,
    pub from_email: String,
    pub from_name: String,
}

impl EmailIdentity {
    /// `"Name <address>"`, or the bare address when no name is configured.
    pub fn from_header(&self) -> String {
        let name = self.from_name.trim();
        if name.is_empty() {
            self.from_email.trim().to_string()
        } else {
            format!("{} <{}>", name, self.from_email.trim())
        }
    }
}

/// Email message
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
}

/// Email delivery interface
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, identity: &EmailIdentity, message: &EmailMessage) -> AppResult<()>;
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// Resend API client
#[derive(Debug, Clone)]
pub struct ResendClient {
    http: reqwest::Client,
    base_url: String,
}

impl ResendClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config::network::timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client for `RESEND_API_URL`.
    pub fn from_config() -> AppResult<Self> {
        Self::new(config::providers::RESEND_API_URL.as_str())
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    async fn send_email(&self, identity: &EmailIdentity, message: &EmailMessage) -> AppResult<()> {
        log::debug!("Sending email to {} ({})", message.to, message.subject);

        let body = SendEmailRequest {
            from: identity.from_header(),
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html_body,
            text: message.text_body.as_deref(),
        };

        let response = self
            .http
            .post(self.emails_url())
            .bearer_auth(identity.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| e.message)
                .filter(|m| !m.is_empty());

            log::warn!("Resend rejected email (status {})", status);
            return Err(match message {
                Some(message) => AppError::Provider(message),
                None => AppError::HttpStatus(status),
            });
        }

        let sent: SendEmailResponse = response.json().await?;
        log::info!(
            "Email sent to {} (id: {})",
            message.to,
            sent.id.as_deref().unwrap_or("unknown")
        );
        Ok(())
    }
}
