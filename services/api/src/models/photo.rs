//! Photo rows and payloads

use chrono::{DateTime, Utc};
use search::{OwnerSummary, PhotoDoc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Photo joined with its uploader's display fields
#[derive(Debug, Clone, FromRow)]
pub struct PhotoRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub uploader_id: Uuid,
    pub uploader_name: String,
    pub uploader_avatar: Option<String>,
    pub album: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PhotoRow> for PhotoDoc {
    fn from(row: PhotoRow) -> Self {
        PhotoDoc {
            id: row.id,
            title: Some(row.title),
            description: row.description,
            url: Some(row.url),
            thumbnail_url: row.thumbnail_url,
            uploader: Some(OwnerSummary {
                id: row.uploader_id,
                name: row.uploader_name,
                avatar: row.uploader_avatar,
            }),
            album: row.album,
            location: row.location,
            tags: Some(row.tags),
            is_public: row.is_public,
            created_at: row.created_at,
        }
    }
}

/// Fields of a photo about to be inserted
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub uploader_id: Uuid,
    pub album: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
}

/// Partial update of a photo's text fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhotoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub album: Option<String>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}
