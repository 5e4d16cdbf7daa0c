//! Order event notifications (payment received, refund requested).
//!
//! The checkout pipeline calls [`Notifier::dispatch`] after recording an
//! event. Delivery is best effort: channel failures are logged and reported,
//! never returned as errors.

use fluent_templates::fluent_bundle::FluentArgs;

use crate::core::utils::html_escape;
use crate::i18n;
use crate::notify::{EmailMessage, NotificationSettings, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEvent {
    PaymentReceived {
        order_id: String,
        product_name: String,
        amount: String,
        buyer_email: Option<String>,
    },
    RefundRequested {
        order_id: String,
        product_name: String,
        amount: String,
        reason: Option<String>,
    },
}

impl OrderEvent {
    pub fn order_id(&self) -> &str {
        match self {
            OrderEvent::PaymentReceived { order_id, .. } | OrderEvent::RefundRequested { order_id, .. } => order_id,
        }
    }
}

/// What happened on each channel. `None` means the channel was not attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub telegram: Option<Result<(), String>>,
    pub email: Option<Result<(), String>>,
}

impl Notifier {
    /// Pushes an order event to every configured channel.
    ///
    /// Telegram gets every event when token and chat id are set. The buyer
    /// gets a confirmation email for payments when email is enabled and
    /// configured and the order has an address.
    pub async fn dispatch(&self, settings: &NotificationSettings, event: &OrderEvent) -> DispatchReport {
        let mut report = DispatchReport::default();
        let lang = settings.telegram_language.lang_id();

        if settings.telegram_ready() {
            let text = telegram_text(&lang, event);
            let result = self
                .telegram
                .send_text(&settings.telegram_bot_token, &settings.telegram_chat_id, &text)
                .await
                .map_err(|e| {
                    log::error!("Telegram notification for order {} failed: {}", event.order_id(), e);
                    e.user_message()
                });
            report.telegram = Some(result);
        }

        if let OrderEvent::PaymentReceived {
            order_id,
            product_name,
            amount,
            buyer_email: Some(buyer_email),
        } = event
        {
            if settings.resend_enabled && settings.email_ready() && !buyer_email.trim().is_empty() {
                let mut args = FluentArgs::new();
                args.set("shop", self.shop_name().to_string());
                args.set("order", order_id.clone());
                args.set("product", product_name.clone());
                args.set("amount", amount.clone());

                let body = i18n::t_args(&lang, "notify-delivery-email-body", &args);
                let message = EmailMessage {
                    to: buyer_email.trim().to_string(),
                    subject: i18n::t_args(&lang, "notify-delivery-email-subject", &args),
                    html_body: format!("<p>{}</p>", html_escape(&body)),
                    text_body: Some(body),
                };

                let result = self
                    .email
                    .send_email(&settings.email_identity(), &message)
                    .await
                    .map_err(|e| {
                        log::error!("Order email for {} failed: {}", order_id, e);
                        e.user_message()
                    });
                report.email = Some(result);
            }
        }

        report
    }
}

fn telegram_text(lang: &unic_langid::LanguageIdentifier, event: &OrderEvent) -> String {
    let mut args = FluentArgs::new();
    match event {
        OrderEvent::PaymentReceived {
            order_id,
            product_name,
            amount,
            ..
        } => {
            args.set("order", order_id.clone());
            args.set("product", product_name.clone());
            args.set("amount", amount.clone());
            i18n::t_args(lang, "notify-payment-received", &args)
        }
        OrderEvent::RefundRequested {
            order_id,
            product_name,
            amount,
            reason,
        } => {
            args.set("order", order_id.clone());
            args.set("product", product_name.clone());
            args.set("amount", amount.clone());
            args.set("reason", reason.clone().unwrap_or_else(|| "-".to_string()));
            i18n::t_args(lang, "notify-refund-requested", &args)
        }
    }
}
