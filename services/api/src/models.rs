//! API models for request and response payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod journal;
pub mod photo;
pub mod user;
pub mod video;

pub use journal::{CreateJournalRequest, JournalRow, UpdateJournalRequest};
pub use photo::{NewPhoto, PhotoRow, UpdatePhotoRequest};
pub use user::{UpdateProfileRequest, UserProfile};
pub use video::{NewVideo, UpdateVideoRequest, VideoRow};

/// Default page size of the listing endpoints
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page size the listing endpoints serve
pub const MAX_LIMIT: u32 = 100;

/// Query parameters shared by the photo, video and journal listings.
///
/// Type-specific filters (`album`, `category`, `mood`) are ignored by the
/// listings they do not apply to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Case-insensitive substring matched against title, body and tags
    pub search: Option<String>,
    /// Restrict to one owner
    pub user_id: Option<Uuid>,
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
    pub album: Option<String>,
    pub category: Option<String>,
    pub mood: Option<String>,
    pub tag: Option<String>,
}

impl ListQuery {
    /// Effective page and limit after defaults and clamping
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page.unwrap_or(1).max(1),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// Search term with blank values treated as absent
    pub fn search_term(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    /// Private items are listed only when the viewer scopes the listing to themselves
    pub fn includes_private(&self, viewer: Option<Uuid>) -> bool {
        self.user_id.is_some() && self.user_id == viewer
    }
}

/// Trim `value` and drop it when nothing is left
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Page window of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// Response for listings with pagination
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

/// Split a comma-separated tag field into trimmed, non-empty tags
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_clamping() {
        let query = ListQuery::default();
        assert_eq!(query.pagination(), Pagination { page: 1, limit: 20 });
        assert_eq!(query.pagination().offset(), 0);

        let query = ListQuery {
            page: Some(0),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(query.pagination(), Pagination { page: 1, limit: 100 });

        let query = ListQuery {
            page: Some(3),
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(query.pagination(), Pagination { page: 3, limit: 1 });
        assert_eq!(query.pagination().offset(), 2);
    }

    #[test]
    fn test_query_uses_camel_case_user_id() {
        let id = Uuid::new_v4();
        let query: ListQuery =
            serde_json::from_value(serde_json::json!({ "userId": id, "search": "  " })).unwrap();
        assert_eq!(query.user_id, Some(id));
        assert_eq!(query.search_term(), None);
    }

    #[test]
    fn test_private_items_only_for_the_owner_scoping_to_themselves() {
        let owner = Uuid::new_v4();
        let scoped = ListQuery {
            user_id: Some(owner),
            ..Default::default()
        };

        assert!(scoped.includes_private(Some(owner)));
        assert!(!scoped.includes_private(None));
        assert!(!scoped.includes_private(Some(Uuid::new_v4())));
        assert!(!ListQuery::default().includes_private(Some(owner)));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" sunset, beach ,,paris "), vec!["sunset", "beach", "paris"]);
        assert!(parse_tags("").is_empty());
    }
}
