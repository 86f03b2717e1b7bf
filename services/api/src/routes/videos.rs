//! Video listing and owner-scoped CRUD

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use media::MediaKind;
use search::VideoDoc;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::{check_title, discard_media};
use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, can_view, ensure_owner},
    models::{ListQuery, ListResponse, NewVideo, UpdateVideoRequest},
    state::AppState,
    upload::{UploadForm, media_error},
};

/// Get videos with pagination and filtering
pub async fn list(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<VideoDoc>>> {
    let include_private = query.includes_private(viewer.map(|Extension(user)| user.id));
    let (rows, total) = state
        .video_repository
        .list(&query, include_private)
        .await
        .map_err(|e| ApiError::internal("Failed to list videos", e))?;

    let pagination = query.pagination();
    Ok(Json(ListResponse {
        items: rows.into_iter().map(VideoDoc::from).collect(),
        page: pagination.page,
        limit: pagination.limit,
        total,
    }))
}

/// Get a video by ID; private videos are only visible to their uploader
pub async fn get(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<VideoDoc>> {
    let row = state
        .video_repository
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get video", e))?
        .ok_or(ApiError::NotFound)?;

    let viewer = viewer.map(|Extension(user)| user);
    if !can_view(row.uploader_id, row.is_public, viewer.as_ref()) {
        return Err(ApiError::NotFound);
    }

    Ok(Json(row.into()))
}

/// Upload a video to the CDN and record it
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<VideoDoc>)> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let title = form.required_text("title")?;
    let is_public = form.flag("isPublic", true)?;
    let duration = form.number("duration")?;
    let file = form.take_file(MediaKind::Video)?;

    let stored = state
        .media_store
        .upload(
            MediaKind::Video,
            user.id,
            &file.file_name,
            &file.content_type,
            file.bytes,
        )
        .await
        .map_err(media_error)?;

    let new_video = NewVideo {
        title,
        description: form.text("description"),
        video_url: stored.url,
        thumbnail_url: stored.thumbnail_url,
        uploader_id: user.id,
        category: form.text("category"),
        tags: form.tags(),
        is_public,
        duration,
        size: i64::try_from(stored.size).unwrap_or(i64::MAX),
    };

    let row = match state.video_repository.create(&new_video).await {
        Ok(row) => row,
        Err(e) => {
            discard_media(&state, [new_video.video_url.as_str()]).await;
            return Err(ApiError::internal("Failed to create video", e));
        }
    };

    info!("{} ({}) uploaded video {}", user.name, user.id, row.id);
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Update a video's text fields
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVideoRequest>,
) -> ApiResult<Json<VideoDoc>> {
    check_title(payload.title.as_deref())?;

    let row = state
        .video_repository
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get video", e))?
        .ok_or(ApiError::NotFound)?;
    ensure_owner(row.uploader_id, &user)?;

    let row = state
        .video_repository
        .update(id, &payload)
        .await
        .map_err(|e| ApiError::internal("Failed to update video", e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(row.into()))
}

/// Delete a video and its CDN object
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let row = state
        .video_repository
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get video", e))?
        .ok_or(ApiError::NotFound)?;
    ensure_owner(row.uploader_id, &user)?;

    let deleted = state
        .video_repository
        .delete(id, row.uploader_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete video", e))?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    discard_media(&state, [row.video_url.as_str()]).await;
    info!("User {} deleted video {}", user.id, id);

    Ok(Json(json!({"message": "Video deleted successfully"})))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::routes::tests::{RecordingStore, multipart_request, send, test_state};

    #[tokio::test]
    async fn test_create_rejects_image() {
        let store = Arc::new(RecordingStore::default());
        let (status, body) = send(
            test_state(store.clone()),
            multipart_request(
                "/videos",
                &[("title", "Timelapse")],
                Some(("image/jpeg", &b"jpg"[..])),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unsupported content type image/jpeg for video");
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_duration() {
        let (status, body) = send(
            test_state(Arc::default()),
            multipart_request(
                "/videos",
                &[("title", "Timelapse"), ("duration", "long")],
                Some(("video/mp4", &b"mp4"[..])),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "duration must be a non-negative number");
    }
}
