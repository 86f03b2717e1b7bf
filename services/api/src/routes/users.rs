//! Public profiles and self-service profile updates

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{UpdateProfileRequest, UserProfile},
    state::AppState,
};

/// Get a user's public profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .user_repository
        .find_profile(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get user", e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(profile))
}

/// Get the caller's own profile
pub async fn get_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<UserProfile>> {
    get_profile(State(state), Path(user.id)).await
}

/// Update the caller's name, bio or avatar
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let update = payload.validate().map_err(ApiError::BadRequest)?;

    let profile = state
        .user_repository
        .update_profile(user.id, &update)
        .await
        .map_err(|e| ApiError::internal("Failed to update user", e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(profile))
}
