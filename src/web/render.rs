//! Server-rendered HTML for the profile and notification settings pages.

use crate::core::utils::html_escape;
use crate::notify::{SettingsForm, TelegramLanguage};
use crate::profile::ProfileView;
use crate::storage::orders::{OrderStatus, RecentOrder};

const STYLE: &str = r#"<style>
*{box-sizing:border-box;margin:0;padding:0}
body{background:#f6f7f9;color:#111;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;padding:24px}
main{max-width:760px;margin:0 auto;display:grid;gap:20px}
h1{font-size:1.8rem;font-weight:700}
h2{font-size:1.15rem;font-weight:600;margin-bottom:6px}
.card{background:#fff;border:1px solid #e4e6eb;border-radius:14px;padding:22px}
.muted{color:#6b7280;font-size:.875rem}
.stats{display:grid;grid-template-columns:repeat(3,1fr);gap:12px}
.stat{text-align:center}.stat b{display:block;font-size:1.6rem}
.user{display:flex;align-items:center;gap:14px}
.avatar{width:56px;height:56px;border-radius:50%;object-fit:cover;background:#e5e7eb}
.orders{list-style:none;display:grid;gap:10px}
.orders li{display:flex;justify-content:space-between;gap:12px;border-top:1px solid #f0f1f3;padding-top:10px}
.badge{font-size:.75rem;padding:2px 8px;border-radius:999px;background:#eef2ff;color:#3730a3}
.badge.delivered{background:#dcfce7;color:#166534}.badge.pending{background:#fef9c3;color:#854d0e}
.badge.failed,.badge.cancelled,.badge.refunded{background:#fee2e2;color:#991b1b}
form{display:grid;gap:12px;margin-top:12px}
label{font-weight:500;font-size:.9rem}
input[type=text],input[type=password],input[type=email]{width:100%;padding:8px 10px;border:1px solid #d1d5db;border-radius:8px}
.row{display:flex;gap:10px;align-items:center}
button{padding:8px 16px;border-radius:8px;border:0;background:#111;color:#fff;font-weight:600;cursor:pointer}
button.secondary{background:#e5e7eb;color:#111}
button:disabled{opacity:.45;cursor:not-allowed}
.notice{padding:12px 16px;border-radius:10px}
.notice.success{background:#dcfce7;color:#166534}.notice.error{background:#fee2e2;color:#991b1b}
</style>"#;

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
{style}
</head>
<body>
<main>
{body}
</main>
</body>
</html>"#,
        title = html_escape(title),
        style = STYLE,
        body = body,
    )
}

// ============================================================================
// PROFILE
// ============================================================================

/// Renders the shopper profile page.
pub fn render_profile_page(view: &ProfileView) -> String {
    let user = &view.user;

    let avatar = match user.avatar.as_deref() {
        Some(url) => format!(r#"<img class="avatar" src="{}" alt="">"#, html_escape(url)),
        None => r#"<div class="avatar"></div>"#.to_string(),
    };
    let username = user
        .username
        .as_deref()
        .map(|u| format!(r#"<p class="muted">@{}</p>"#, html_escape(u)))
        .unwrap_or_default();

    let orders = if view.recent_orders.is_empty() {
        r#"<p class="muted">No orders yet.</p>"#.to_string()
    } else {
        let items: String = view.recent_orders.iter().map(render_order_item).collect();
        format!(r#"<ul class="orders">{}</ul>"#, items)
    };

    let body = format!(
        r#"<section class="card user">
{avatar}
<div><h1>{name}</h1>{username}</div>
</section>
<section class="card">
<h2>Points</h2>
<p class="stat"><b>{points}</b></p>
</section>
<section class="card">
<h2>Orders</h2>
<div class="stats">
<div class="stat"><b>{total}</b><span class="muted">Total</span></div>
<div class="stat"><b>{pending}</b><span class="muted">Pending</span></div>
<div class="stat"><b>{delivered}</b><span class="muted">Delivered</span></div>
</div>
</section>
<section class="card">
<h2>Recent orders</h2>
{orders}
</section>"#,
        avatar = avatar,
        name = html_escape(&user.name),
        username = username,
        points = view.points,
        total = view.order_stats.total,
        pending = view.order_stats.pending,
        delivered = view.order_stats.delivered,
        orders = orders,
    );

    page("Profile", &body)
}

fn render_order_item(order: &RecentOrder) -> String {
    let (class, label) = match order.status_kind() {
        Some(status) => (status.to_string(), status_label(status).to_string()),
        None => (
            "unknown".to_string(),
            order.status.as_deref().unwrap_or("unknown").to_string(),
        ),
    };
    let created = order
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    format!(
        r#"<li><div><b>{product}</b><p class="muted">{order_id} · {created}</p></div><div class="row"><span>{amount}</span><span class="badge {class}">{label}</span></div></li>"#,
        product = html_escape(&order.product_name),
        order_id = html_escape(&order.order_id),
        created = created,
        amount = html_escape(&order.amount),
        class = class,
        label = html_escape(&label),
    )
}

fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Pending",
        OrderStatus::Paid => "Paid",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Failed => "Failed",
        OrderStatus::Refunded => "Refunded",
        OrderStatus::Cancelled => "Cancelled",
    }
}

// ============================================================================
// NOTIFICATION SETTINGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Banner shown above the settings forms after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        name,
        html_escape(value)
    )
}

fn disabled_unless(ready: bool) -> &'static str {
    if ready {
        ""
    } else {
        " disabled"
    }
}

/// Renders the admin notification settings page.
///
/// Each save form carries the other section's values as hidden inputs, so
/// either submission holds the full settings record. `test_email` refills the
/// test address input.
pub fn render_settings_page(form: &SettingsForm, notice: Option<&Notice>, test_email: &str) -> String {
    let telegram_ready = !form.telegram_bot_token.trim().is_empty() && !form.telegram_chat_id.trim().is_empty();
    let email_ready = !form.resend_api_key.trim().is_empty() && !form.resend_from_email.trim().is_empty();

    let notice = notice
        .map(|n| {
            let class = match n.kind {
                NoticeKind::Success => "success",
                NoticeKind::Error => "error",
            };
            format!(r#"<div class="notice {}">{}</div>"#, class, html_escape(&n.message))
        })
        .unwrap_or_default();

    let selected_language = form
        .telegram_language
        .parse::<TelegramLanguage>()
        .unwrap_or_default();
    let language_options: String = TelegramLanguage::ALL
        .iter()
        .map(|lang| {
            format!(
                r#"<label class="row"><input type="radio" name="telegramLanguage" value="{}"{}> {}</label>"#,
                lang,
                if *lang == selected_language { " checked" } else { "" },
                lang.label()
            )
        })
        .collect();

    // Unchecked boxes are absent from the submission, so only echo a set flag.
    let email_hidden = format!(
        "{}{}{}{}",
        hidden("resendApiKey", &form.resend_api_key),
        hidden("resendFromEmail", &form.resend_from_email),
        hidden("resendFromName", &form.resend_from_name),
        if form.resend_enabled {
            hidden("resendEnabled", "on")
        } else {
            String::new()
        },
    );
    let telegram_hidden = format!(
        "{}{}{}",
        hidden("telegramBotToken", &form.telegram_bot_token),
        hidden("telegramChatId", &form.telegram_chat_id),
        hidden("telegramLanguage", selected_language.as_ref()),
    );

    let body = format!(
        r#"<h1>Notifications</h1>
{notice}
<section class="card">
<h2>What gets notified</h2>
<p><b>Payment received</b> <span class="muted">An order was paid. The shop chat gets a message and the buyer gets a confirmation email.</span></p>
<p><b>Refund requested</b> <span class="muted">A buyer asked for a refund. The shop chat gets a message.</span></p>
</section>
<section class="card">
<h2>Telegram Bot</h2>
<p class="muted">Messages go to the chat below through your own bot.</p>
<form method="post" action="/admin/notifications">
<label for="telegramBotToken">Bot token</label>
<input type="password" id="telegramBotToken" name="telegramBotToken" value="{telegram_bot_token}" placeholder="123456:ABC-DEF..." autocomplete="off">
<label for="telegramChatId">Chat ID</label>
<input type="text" id="telegramChatId" name="telegramChatId" value="{telegram_chat_id}" placeholder="-1001234567890">
<label>Message language</label>
<div class="row">{language_options}</div>
{email_hidden}
<div class="row"><button type="submit">Save</button></div>
</form>
<form method="post" action="/admin/notifications/test-telegram">
<div class="row"><button type="submit" class="secondary"{telegram_disabled}>Send test message</button></div>
</form>
</section>
<section class="card">
<h2>Email (Resend)</h2>
<p class="muted">Buyers receive order emails from this address.</p>
<form method="post" action="/admin/notifications">
<label class="row"><input type="checkbox" id="resendEnabled" name="resendEnabled"{resend_checked}> Send order emails</label>
<label for="resendApiKey">API key</label>
<input type="password" id="resendApiKey" name="resendApiKey" value="{resend_api_key}" placeholder="re_xxxxxxxx" autocomplete="off">
<p class="muted">Create a key at <a href="https://resend.com" target="_blank" rel="noopener noreferrer">resend.com</a></p>
<label for="resendFromEmail">Sender address</label>
<input type="text" id="resendFromEmail" name="resendFromEmail" value="{resend_from_email}" placeholder="noreply@yourdomain.com">
<p class="muted">The domain must be verified in Resend.</p>
<label for="resendFromName">Sender name</label>
<input type="text" id="resendFromName" name="resendFromName" value="{resend_from_name}" placeholder="My Shop">
{telegram_hidden}
<div class="row"><button type="submit">Save</button></div>
</form>
<form method="post" action="/admin/notifications/test-email">
<label for="testEmail">Send a test email to</label>
<div class="row">
<input type="email" id="testEmail" name="testEmail" value="{test_email}" placeholder="you@example.com">
<button type="submit" class="secondary"{email_disabled}>Send test email</button>
</div>
</form>
</section>"#,
        notice = notice,
        telegram_bot_token = html_escape(&form.telegram_bot_token),
        telegram_chat_id = html_escape(&form.telegram_chat_id),
        language_options = language_options,
        email_hidden = email_hidden,
        telegram_disabled = disabled_unless(telegram_ready),
        resend_checked = if form.resend_enabled { " checked" } else { "" },
        resend_api_key = html_escape(&form.resend_api_key),
        resend_from_email = html_escape(&form.resend_from_email),
        resend_from_name = html_escape(&form.resend_from_name),
        telegram_hidden = telegram_hidden,
        test_email = html_escape(test_email),
        email_disabled = disabled_unless(email_ready),
    );

    page("Notification settings", &body)
}
