//! Journal listing and owner-scoped CRUD

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use media::{MediaKind, MediaStore};
use search::JournalDoc;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use super::{check_title, discard_media};
use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, can_view, ensure_owner},
    models::{CreateJournalRequest, ListQuery, ListResponse, UpdateJournalRequest},
    state::AppState,
    upload::{UploadForm, media_error},
};

/// Get journals with pagination and filtering
pub async fn list(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<JournalDoc>>> {
    let include_private = query.includes_private(viewer.map(|Extension(user)| user.id));
    let (rows, total) = state
        .journal_repository
        .list(&query, include_private)
        .await
        .map_err(|e| ApiError::internal("Failed to list journals", e))?;

    let pagination = query.pagination();
    Ok(Json(ListResponse {
        items: rows.into_iter().map(JournalDoc::from).collect(),
        page: pagination.page,
        limit: pagination.limit,
        total,
    }))
}

/// Get a journal by ID; private entries are only visible to their author
pub async fn get(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<JournalDoc>> {
    let row = state
        .journal_repository
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get journal", e))?
        .ok_or(ApiError::NotFound)?;

    let viewer = viewer.map(|Extension(user)| user);
    if !can_view(row.author_id, row.is_public, viewer.as_ref()) {
        return Err(ApiError::NotFound);
    }

    Ok(Json(row.into()))
}

/// Create a journal entry
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateJournalRequest>,
) -> ApiResult<(StatusCode, Json<JournalDoc>)> {
    payload.validate().map_err(ApiError::BadRequest)?;
    check_attachments(state.media_store.as_ref(), user.id, &payload.attachments)?;

    let row = state
        .journal_repository
        .create(user.id, &payload)
        .await
        .map_err(|e| ApiError::internal("Failed to create journal", e))?;

    info!("{} ({}) wrote journal {}", user.name, user.id, row.id);
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Update a journal's fields
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJournalRequest>,
) -> ApiResult<Json<JournalDoc>> {
    check_title(payload.title.as_deref())?;
    if payload.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(ApiError::BadRequest("Content cannot be empty".to_string()));
    }
    if let Some(attachments) = &payload.attachments {
        check_attachments(state.media_store.as_ref(), user.id, attachments)?;
    }

    let row = state
        .journal_repository
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get journal", e))?
        .ok_or(ApiError::NotFound)?;
    ensure_owner(row.author_id, &user)?;

    let row = state
        .journal_repository
        .update(id, &payload)
        .await
        .map_err(|e| ApiError::internal("Failed to update journal", e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(row.into()))
}

/// Delete a journal and any attachments stored on the CDN
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let row = state
        .journal_repository
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal("Failed to get journal", e))?
        .ok_or(ApiError::NotFound)?;
    ensure_owner(row.author_id, &user)?;

    let deleted = state
        .journal_repository
        .delete(id, row.author_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete journal", e))?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    discard_attachments(&state, row.author_id, &row.attachments).await;
    info!("User {} deleted journal {}", user.id, id);

    Ok(Json(json!({"message": "Journal deleted successfully"})))
}

/// Upload a file for use as a journal attachment
pub async fn upload_attachment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let file = form.take_file(MediaKind::Attachment)?;

    let stored = state
        .media_store
        .upload(
            MediaKind::Attachment,
            user.id,
            &file.file_name,
            &file.content_type,
            file.bytes,
        )
        .await
        .map_err(media_error)?;

    info!("User {} uploaded attachment {}", user.id, stored.key);
    Ok((
        StatusCode::CREATED,
        Json(json!({"url": stored.url, "size": stored.size})),
    ))
}

/// Whether `url` points at an attachment `owner` uploaded to the CDN
fn is_own_attachment(store: &dyn MediaStore, owner: Uuid, url: &str) -> bool {
    store
        .key_from_url(url)
        .is_some_and(|key| MediaKind::Attachment.is_owned_by(&key, owner))
}

/// CDN-hosted attachments must be the author's own uploads; external links pass
fn check_attachments(store: &dyn MediaStore, owner: Uuid, urls: &[String]) -> ApiResult<()> {
    let foreign = urls
        .iter()
        .any(|url| store.key_from_url(url).is_some() && !is_own_attachment(store, owner, url));
    if foreign {
        return Err(ApiError::BadRequest(
            "Attachments must be uploaded by the author".to_string(),
        ));
    }
    Ok(())
}

/// Remove the author's own attachment objects; anything else is left alone
async fn discard_attachments(state: &AppState, owner: Uuid, urls: &[String]) {
    let store = state.media_store.as_ref();
    let owned = urls
        .iter()
        .map(String::as_str)
        .filter(|url| is_own_attachment(store, owner, url))
        .collect::<Vec<_>>();
    discard_media(state, owned).await;
}
