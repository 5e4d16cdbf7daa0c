use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;

use crate::profile::{self, ProfileView};
use crate::web::auth::{ApiUser, PageUser};
use crate::web::render;
use crate::web::AppState;

/// GET /profile
pub async fn profile_page(State(state): State<Arc<AppState>>, PageUser(user): PageUser) -> impl IntoResponse {
    let view = profile::load_profile(&state.pool, user.profile_user()).await;
    Html(render::render_profile_page(&view))
}

/// GET /api/profile
pub async fn profile_api(State(state): State<Arc<AppState>>, ApiUser(user): ApiUser) -> Json<ProfileView> {
    Json(profile::load_profile(&state.pool, user.profile_user()).await)
}
