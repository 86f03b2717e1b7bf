//! Video rows and payloads

use chrono::{DateTime, Utc};
use search::{OwnerSummary, VideoDoc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Video joined with its uploader's display fields
#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub uploader_id: Uuid,
    pub uploader_name: String,
    pub uploader_avatar: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub duration: Option<f64>,
    pub size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<VideoRow> for VideoDoc {
    fn from(row: VideoRow) -> Self {
        VideoDoc {
            id: row.id,
            title: Some(row.title),
            description: row.description,
            video_url: Some(row.video_url),
            thumbnail_url: row.thumbnail_url,
            uploader: Some(OwnerSummary {
                id: row.uploader_id,
                name: row.uploader_name,
                avatar: row.uploader_avatar,
            }),
            category: row.category,
            tags: Some(row.tags),
            is_public: row.is_public,
            duration: row.duration,
            size: row.size,
            created_at: row.created_at,
        }
    }
}

/// Fields of a video about to be inserted
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub uploader_id: Uuid,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub duration: Option<f64>,
    pub size: i64,
}

/// Partial update of a video's text fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}
