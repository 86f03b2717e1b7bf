//! Photo listing and owner-scoped CRUD

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use media::MediaKind;
use search::PhotoDoc;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::{check_title, discard_media};
use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, can_view, ensure_owner},
    models::{ListQuery, ListResponse, NewPhoto, UpdatePhotoRequest},
    state::AppState,
    upload::{UploadForm, media_error},
};

/// Get photos with pagination and filtering
pub async fn list(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<PhotoDoc>>> {
    let include_private = query.includes_private(viewer.map(|Extension(user)| user.id));
    let (rows, total) = state
        .photo_repository
        .list(&query, include_private)
        .await
        .map_err(|e| ApiError::internal("Failed to list photos", e))?;

    let pagination = query.pagination();
    Ok(Json(ListResponse {
        items: rows.into_iter().map(PhotoDoc::from).collect(),
        page: pagination.page,
        limit: pagination.limit,
        total,
    }))
}

/// Get a photo by ID; private photos are only visible to their uploader
pub async fn get(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PhotoDoc>> {
    let row = state
        .photo_repository
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get photo", e))?
        .ok_or(ApiError::NotFound)?;

    let viewer = viewer.map(|Extension(user)| user);
    if !can_view(row.uploader_id, row.is_public, viewer.as_ref()) {
        return Err(ApiError::NotFound);
    }

    Ok(Json(row.into()))
}

/// Upload a photo to the CDN and record it
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<PhotoDoc>)> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let title = form.required_text("title")?;
    let is_public = form.flag("isPublic", true)?;
    let file = form.take_file(MediaKind::Photo)?;

    let stored = state
        .media_store
        .upload(
            MediaKind::Photo,
            user.id,
            &file.file_name,
            &file.content_type,
            file.bytes,
        )
        .await
        .map_err(media_error)?;

    let new_photo = NewPhoto {
        title,
        description: form.text("description"),
        url: stored.url,
        thumbnail_url: stored.thumbnail_url,
        uploader_id: user.id,
        album: form.text("album"),
        location: form.text("location"),
        tags: form.tags(),
        is_public,
    };

    let row = match state.photo_repository.create(&new_photo).await {
        Ok(row) => row,
        Err(e) => {
            discard_media(&state, [new_photo.url.as_str()]).await;
            return Err(ApiError::internal("Failed to create photo", e));
        }
    };

    info!("{} ({}) uploaded photo {}", user.name, user.id, row.id);
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Update a photo's text fields
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePhotoRequest>,
) -> ApiResult<Json<PhotoDoc>> {
    check_title(payload.title.as_deref())?;

    let row = state
        .photo_repository
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get photo", e))?
        .ok_or(ApiError::NotFound)?;
    ensure_owner(row.uploader_id, &user)?;

    let row = state
        .photo_repository
        .update(id, &payload)
        .await
        .map_err(|e| ApiError::internal("Failed to update photo", e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(row.into()))
}

/// Delete a photo and its CDN object
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let row = state
        .photo_repository
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get photo", e))?
        .ok_or(ApiError::NotFound)?;
    ensure_owner(row.uploader_id, &user)?;

    let deleted = state
        .photo_repository
        .delete(id, row.uploader_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete photo", e))?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    discard_media(&state, [row.url.as_str()]).await;
    info!("User {} deleted photo {}", user.id, id);

    Ok(Json(json!({"message": "Photo deleted successfully"})))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::routes::tests::{RecordingStore, multipart_request, send, test_state};

    #[tokio::test]
    async fn test_create_requires_title() {
        let store = Arc::new(RecordingStore::default());
        let (status, body) = send(
            test_state(store.clone()),
            multipart_request("/photos", &[], Some(("image/png", &b"png"[..]))),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title is required");
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_non_image() {
        let store = Arc::new(RecordingStore::default());
        let (status, _) = send(
            test_state(store.clone()),
            multipart_request(
                "/photos",
                &[("title", "Clip")],
                Some(("video/mp4", &b"mp4"[..])),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_file() {
        let (status, body) = send(
            test_state(Arc::default()),
            multipart_request("/photos", &[("title", "Sunset")], None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "File is required");
    }
}
