//! Session verification and request extractors.
//!
//! The auth provider hands the browser a signed token:
//! `base64url(claims_json) + "." + hex(HMAC_SHA256(secret, base64url(claims_json)))`.
//! Tokens are read from `Authorization: Bearer` or the `session` cookie.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::profile::ProfileUser;
use crate::web::error::WebError;
use crate::web::AppState;

type HmacSha256 = Hmac<Sha256>;

/// User carried by a verified session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl SessionUser {
    /// `name`, else `username`, else "User".
    pub fn display_name(&self) -> String {
        [&self.name, &self.username]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("User")
            .to_string()
    }

    pub fn profile_user(&self) -> ProfileUser {
        ProfileUser {
            id: self.id.clone(),
            name: self.display_name(),
            username: self.username.clone().filter(|u| !u.trim().is_empty()),
            avatar: self.avatar_url.clone().filter(|a| !a.trim().is_empty()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    user: SessionUser,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

fn mac_for(secret: &SecretString) -> AppResult<HmacSha256> {
    let key = secret.expose_secret();
    if key.is_empty() {
        return Err(AppError::Unauthorized("Session verification is not configured".to_string()));
    }
    HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|_| AppError::Unauthorized("Session secret is not usable".to_string()))
}

/// Issues a token for `user`, valid for `ttl_secs` from `issued_at` (epoch seconds).
///
/// The auth provider does this in production; tests and local tooling use it
/// to mint sessions.
pub fn sign_session(user: &SessionUser, secret: &SecretString, issued_at: i64, ttl_secs: i64) -> AppResult<String> {
    let claims = SessionClaims {
        user: user.clone(),
        iat: Some(issued_at),
        exp: Some(issued_at + ttl_secs),
    };
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);

    let mut mac = mac_for(secret)?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", payload, signature))
}

/// Verifies the signature and expiry of a session token.
pub fn verify_session(token: &str, secret: &SecretString, now: i64) -> AppResult<SessionUser> {
    let unauthorized = |msg: &str| AppError::Unauthorized(msg.to_string());

    let (payload, signature) = token.trim().split_once('.').ok_or_else(|| unauthorized("Malformed session token"))?;
    let signature = hex::decode(signature).map_err(|_| unauthorized("Malformed session signature"))?;

    let mut mac = mac_for(secret)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| unauthorized("Invalid session signature"))?;

    let raw = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| unauthorized("Malformed session payload"))?;
    let claims: SessionClaims = serde_json::from_slice(&raw).map_err(|_| unauthorized("Malformed session payload"))?;

    let expired = match (claims.exp, claims.iat) {
        (Some(exp), _) => exp <= now,
        (None, Some(iat)) => now - iat > config::session::MAX_AGE_SECS,
        (None, None) => true,
    };
    if expired {
        return Err(unauthorized("Session expired"));
    }
    if claims.user.id.trim().is_empty() {
        return Err(unauthorized("Session has no user"));
    }

    Ok(claims.user)
}

/// Bearer token first, then the session cookie.
fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == config::session::COOKIE_NAME && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn authenticate(parts: &Parts, state: &AppState) -> AppResult<SessionUser> {
    let token = session_token(parts).ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;
    verify_session(&token, &state.config.session_secret, chrono::Utc::now().timestamp())
}

// ============================================================================
// EXTRACTORS
// ============================================================================

/// Signed-in user on HTML routes; anonymous visitors are redirected to `/`.
pub struct PageUser(pub SessionUser);

impl FromRequestParts<Arc<AppState>> for PageUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(PageUser).map_err(|e| {
            log::debug!("Redirecting anonymous request to {}: {}", parts.uri.path(), e);
            Redirect::to("/")
        })
    }
}

/// Signed-in user on JSON routes.
pub struct ApiUser(pub SessionUser);

impl FromRequestParts<Arc<AppState>> for ApiUser {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        Ok(ApiUser(authenticate(parts, state)?))
    }
}

/// Administrator on HTML routes.
pub struct PageAdmin(pub SessionUser);

impl FromRequestParts<Arc<AppState>> for PageAdmin {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let PageUser(user) = PageUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if !state.config.is_admin(&user) {
            log::warn!("User {} denied access to {}", user.id, parts.uri.path());
            return Err((StatusCode::FORBIDDEN, Html("<h1>403 Forbidden</h1>".to_string())).into_response());
        }
        Ok(PageAdmin(user))
    }
}

/// Administrator on JSON routes.
pub struct ApiAdmin(pub SessionUser);

impl FromRequestParts<Arc<AppState>> for ApiAdmin {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let ApiUser(user) = ApiUser::from_request_parts(parts, state).await?;

        if !state.config.is_admin(&user) {
            log::warn!("User {} denied access to {}", user.id, parts.uri.path());
            return Err(WebError::Forbidden("Admin access required".to_string()));
        }
        Ok(ApiAdmin(user))
    }
}
