//! Content documents and search request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// One of the three independently persisted content kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Photo,
    Video,
    Journal,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Photo, ContentType::Video, ContentType::Journal];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Photo => "photo",
            ContentType::Video => "video",
            ContentType::Journal => "journal",
        }
    }

    /// Path segment of the listing endpoint serving this type
    pub fn collection(&self) -> &'static str {
        match self {
            ContentType::Photo => "photos",
            ContentType::Video => "videos",
            ContentType::Journal => "journals",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner reference populated with display fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

fn default_public() -> bool {
    true
}

/// Photo document as served by the photos endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDoc {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub uploader: Option<OwnerSummary>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Video document as served by the videos endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDoc {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub uploader: Option<OwnerSummary>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Journal document as served by the journals endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDoc {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<OwnerSummary>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub attachments: Option<Vec<String>>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// A content document of any kind, tagged with its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Photo(PhotoDoc),
    Video(VideoDoc),
    Journal(JournalDoc),
}

impl ContentItem {
    pub fn id(&self) -> Uuid {
        match self {
            ContentItem::Photo(p) => p.id,
            ContentItem::Video(v) => v.id,
            ContentItem::Journal(j) => j.id,
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentItem::Photo(_) => ContentType::Photo,
            ContentItem::Video(_) => ContentType::Video,
            ContentItem::Journal(_) => ContentType::Journal,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ContentItem::Photo(p) => p.title.as_deref(),
            ContentItem::Video(v) => v.title.as_deref(),
            ContentItem::Journal(j) => j.title.as_deref(),
        }
    }

    /// Tags of the item; absent tags read as empty
    pub fn tags(&self) -> &[String] {
        let tags = match self {
            ContentItem::Photo(p) => &p.tags,
            ContentItem::Video(v) => &v.tags,
            ContentItem::Journal(j) => &j.tags,
        };
        tags.as_deref().unwrap_or(&[])
    }

    /// Free text body: journal content, otherwise the description
    pub fn body(&self) -> Option<&str> {
        match self {
            ContentItem::Photo(p) => p.description.as_deref(),
            ContentItem::Video(v) => v.description.as_deref(),
            ContentItem::Journal(j) => j.content.as_deref(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            ContentItem::Photo(p) => p.created_at,
            ContentItem::Video(v) => v.created_at,
            ContentItem::Journal(j) => j.created_at,
        }
    }
}

/// Which content types a search covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    #[default]
    All,
    Photos,
    Videos,
    Journals,
}

impl ContentFilter {
    pub fn includes(&self, content_type: ContentType) -> bool {
        match self {
            ContentFilter::All => true,
            ContentFilter::Photos => content_type == ContentType::Photo,
            ContentFilter::Videos => content_type == ContentType::Video,
            ContentFilter::Journals => content_type == ContentType::Journal,
        }
    }
}

impl FromStr for ContentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(ContentFilter::All),
            "photos" => Ok(ContentFilter::Photos),
            "videos" => Ok(ContentFilter::Videos),
            "journals" => Ok(ContentFilter::Journals),
            other => Err(format!("unknown content filter: {}", other)),
        }
    }
}

/// Ordering applied to the merged result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Relevance,
    Date,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "relevance" => Ok(SortMode::Relevance),
            "date" => Ok(SortMode::Date),
            other => Err(format!("unknown sort mode: {}", other)),
        }
    }
}

/// Input of one search cycle
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    /// Restrict to one owner's items, including their private ones
    pub owner: Option<Uuid>,
    pub filter: ContentFilter,
    pub sort: SortMode,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn owner(mut self, owner: Uuid) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn filter(mut self, filter: ContentFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }
}

/// A scored, type-tagged search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub item: ContentItem,
    pub relevance: i64,
}

/// Sorted results partitioned by type, order preserved within each group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedResults {
    pub photos: Vec<SearchResult>,
    pub videos: Vec<SearchResult>,
    pub journals: Vec<SearchResult>,
}

/// Result of one search cycle
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query was blank; nothing was fetched
    NotSearched,
    /// The search ran. `failed` is set when every enabled fetch failed.
    Completed {
        results: Vec<SearchResult>,
        failed: bool,
    },
}

impl SearchOutcome {
    pub fn results(&self) -> &[SearchResult] {
        match self {
            SearchOutcome::NotSearched => &[],
            SearchOutcome::Completed { results, .. } => results,
        }
    }

    pub fn is_searched(&self) -> bool {
        matches!(self, SearchOutcome::Completed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SearchOutcome::Completed { failed: true, .. })
    }
}
