//! Admin notification settings: the HTML page with its form actions, and the
//! equivalent JSON API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::core::error::{AppError, AppResult};
use crate::notify::settings::MaskedSettings;
use crate::notify::{NotificationSettings, SettingsForm, SettingsUpdate, TestOutcome};
use crate::storage::{db, settings as settings_store};
use crate::web::auth::{ApiAdmin, PageAdmin};
use crate::web::error::WebError;
use crate::web::render::{self, Notice};
use crate::web::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub saved: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestEmailForm {
    pub test_email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TestEmailRequest {
    pub to: String,
}

async fn load_settings(state: &AppState) -> AppResult<NotificationSettings> {
    db::with_connection(&state.pool, |conn| settings_store::load_settings(conn)).await
}

async fn persist_settings(state: &AppState, settings: NotificationSettings) -> AppResult<()> {
    db::with_connection(&state.pool, move |conn| settings_store::save_settings(conn, &settings)).await
}

fn settings_response(status: StatusCode, form: &SettingsForm, notice: Option<Notice>, test_email: &str) -> Response {
    (status, Html(render::render_settings_page(form, notice.as_ref(), test_email))).into_response()
}

fn error_status(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn outcome_notice(outcome: &TestOutcome, sent: &str, failed: &str) -> Notice {
    match (outcome.success, outcome.error.as_deref()) {
        (true, _) => Notice::success(sent),
        (false, Some(error)) => Notice::error(format!("{}: {}", failed, error)),
        (false, None) => Notice::error(failed),
    }
}

/// Page shown when the stored settings cannot be read.
fn load_failure(err: AppError) -> Response {
    log::error!("Failed to load notification settings: {}", err);
    settings_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &SettingsForm::default(),
        Some(Notice::error(err.user_message())),
        "",
    )
}

// ============================================================================
// HTML HANDLERS
// ============================================================================

/// GET /admin/notifications
pub async fn settings_page(
    State(state): State<Arc<AppState>>,
    PageAdmin(_admin): PageAdmin,
    Query(query): Query<PageQuery>,
) -> Response {
    match load_settings(&state).await {
        Ok(settings) => {
            let notice = query.saved.is_some().then(|| Notice::success("Settings saved"));
            settings_response(StatusCode::OK, &settings.to_form(), notice, "")
        }
        Err(e) => load_failure(e),
    }
}

/// POST /admin/notifications
///
/// Either form posts the full record. Success redirects back to the page;
/// failures re-render it with the submitted values.
pub async fn save_settings_form(
    State(state): State<Arc<AppState>>,
    PageAdmin(admin): PageAdmin,
    Form(form): Form<SettingsForm>,
) -> Response {
    let settings = match NotificationSettings::try_from(form.clone()) {
        Ok(settings) => settings,
        Err(e) => {
            return settings_response(error_status(&e), &form, Some(Notice::error(e.user_message())), "");
        }
    };

    match persist_settings(&state, settings).await {
        Ok(()) => {
            log::info!("Notification settings updated by user {}", admin.id);
            Redirect::to("/admin/notifications?saved=1").into_response()
        }
        Err(e) => {
            log::error!("Failed to save notification settings: {}", e);
            settings_response(error_status(&e), &form, Some(Notice::error(e.user_message())), "")
        }
    }
}

/// POST /admin/notifications/test-telegram
pub async fn test_telegram_form(State(state): State<Arc<AppState>>, PageAdmin(_admin): PageAdmin) -> Response {
    let settings = match load_settings(&state).await {
        Ok(settings) => settings,
        Err(e) => return load_failure(e),
    };

    let (status, notice) = match state.notifier.test_telegram(&settings).await {
        Ok(outcome) => (
            StatusCode::OK,
            outcome_notice(&outcome, "Test message sent", "Test message failed"),
        ),
        Err(e) => (error_status(&e), Notice::error(e.user_message())),
    };

    settings_response(status, &settings.to_form(), Some(notice), "")
}

/// POST /admin/notifications/test-email
pub async fn test_email_form(
    State(state): State<Arc<AppState>>,
    PageAdmin(_admin): PageAdmin,
    Form(form): Form<TestEmailForm>,
) -> Response {
    let settings = match load_settings(&state).await {
        Ok(settings) => settings,
        Err(e) => return load_failure(e),
    };

    let (status, notice) = match state.notifier.test_email(&settings, &form.test_email).await {
        Ok(outcome) => (
            StatusCode::OK,
            outcome_notice(&outcome, "Test email sent", "Test email failed"),
        ),
        Err(e) => (error_status(&e), Notice::error(e.user_message())),
    };

    settings_response(status, &settings.to_form(), Some(notice), form.test_email.trim())
}

// ============================================================================
// JSON API
// ============================================================================

/// GET /api/admin/notifications
pub async fn get_settings_api(
    State(state): State<Arc<AppState>>,
    ApiAdmin(_admin): ApiAdmin,
) -> Result<Json<MaskedSettings>, WebError> {
    Ok(Json(load_settings(&state).await?.masked()))
}

/// PUT /api/admin/notifications
///
/// Fields left out of the body keep their stored value. Secrets sent back in
/// their masked form keep the stored value too.
pub async fn put_settings_api(
    State(state): State<Arc<AppState>>,
    ApiAdmin(admin): ApiAdmin,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<MaskedSettings>, WebError> {
    let current = load_settings(&state).await?;
    let submitted = NotificationSettings::try_from(update.apply_to(&current))?;
    let settings = submitted.retain_masked_secrets(&current);

    let masked = settings.masked();
    persist_settings(&state, settings).await?;
    log::info!("Notification settings updated by user {} via API", admin.id);

    Ok(Json(masked))
}

/// POST /api/admin/notifications/test-telegram
pub async fn test_telegram_api(
    State(state): State<Arc<AppState>>,
    ApiAdmin(_admin): ApiAdmin,
) -> Result<Json<TestOutcome>, WebError> {
    let settings = load_settings(&state).await?;
    Ok(Json(state.notifier.test_telegram(&settings).await?))
}

/// POST /api/admin/notifications/test-email
pub async fn test_email_api(
    State(state): State<Arc<AppState>>,
    ApiAdmin(_admin): ApiAdmin,
    Json(request): Json<TestEmailRequest>,
) -> Result<Json<TestOutcome>, WebError> {
    let settings = load_settings(&state).await?;
    Ok(Json(state.notifier.test_email(&settings, &request.to).await?))
}
