//! API service routes

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tracing::warn;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{auth_middleware, identify_middleware},
    state::AppState,
};

pub mod journals;
pub mod photos;
pub mod search;
pub mod users;
pub mod videos;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/photos", post(photos::create))
        .route("/photos/:id", put(photos::update).delete(photos::remove))
        .route("/videos", post(videos::create))
        .route("/videos/:id", put(videos::update).delete(videos::remove))
        .route("/journals", post(journals::create))
        .route("/journals/attachments", post(journals::upload_attachment))
        .route("/journals/:id", put(journals::update).delete(journals::remove))
        .route("/users/me", get(users::get_me).put(users::update_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/photos", get(photos::list))
        .route("/photos/:id", get(photos::get))
        .route("/videos", get(videos::list))
        .route("/videos/:id", get(videos::get))
        .route("/journals", get(journals::list))
        .route("/journals/:id", get(journals::get))
        .route("/users/:id", get(users::get_profile))
        .route("/search", get(search::search))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identify_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Reject blank replacement titles in partial updates
pub(crate) fn check_title(title: Option<&str>) -> ApiResult<()> {
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::BadRequest("Title cannot be empty".to_string()));
    }
    Ok(())
}

/// Best-effort removal of CDN objects behind deleted content
pub(crate) async fn discard_media<'a>(state: &AppState, urls: impl IntoIterator<Item = &'a str>) {
    for url in urls {
        let Some(key) = state.media_store.key_from_url(url) else {
            continue;
        };
        if let Err(e) = state.media_store.delete(&key).await {
            warn!("Failed to delete media object {}: {}", key, e);
        }
    }
}
