//! Journal rows and payloads

use chrono::{DateTime, Utc};
use search::{JournalDoc, OwnerSummary};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Journal joined with its author's display fields
#[derive(Debug, Clone, FromRow)]
pub struct JournalRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub mood: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub attachments: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<JournalRow> for JournalDoc {
    fn from(row: JournalRow) -> Self {
        JournalDoc {
            id: row.id,
            title: Some(row.title),
            content: Some(row.content),
            author: Some(OwnerSummary {
                id: row.author_id,
                name: row.author_name,
                avatar: row.author_avatar,
            }),
            mood: row.mood,
            location: row.location,
            tags: Some(row.tags),
            attachments: Some(row.attachments),
            is_public: row.is_public,
            created_at: row.created_at,
        }
    }
}

fn default_public() -> bool {
    true
}

/// Request for a new journal entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub mood: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

impl CreateJournalRequest {
    /// Check required fields, returning the first problem found
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("Content is required".to_string());
        }
        Ok(())
    }
}

/// Partial update of a journal's text fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJournalRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<String>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
    pub attachments: Option<Vec<String>>,
    pub is_public: Option<bool>,
}
