//! Search candidates read straight from the repositories

use async_trait::async_trait;
use search::{ContentFetcher, ContentItem, ContentType, FetchError};
use uuid::Uuid;

use crate::{
    models::{ListQuery, MAX_LIMIT},
    repositories::{JournalRepository, PhotoRepository, VideoRepository},
};

/// [`ContentFetcher`] backed by the listing queries, without an HTTP hop.
///
/// Candidates are read on behalf of `viewer`: an owner-scoped search sees
/// private items only when that owner is the viewer.
#[derive(Clone)]
pub struct RepositoryFetcher {
    photos: PhotoRepository,
    videos: VideoRepository,
    journals: JournalRepository,
    viewer: Option<Uuid>,
}

impl RepositoryFetcher {
    pub fn new(photos: PhotoRepository, videos: VideoRepository, journals: JournalRepository) -> Self {
        Self {
            photos,
            videos,
            journals,
            viewer: None,
        }
    }

    /// The same fetcher reading on behalf of `viewer`
    pub fn for_viewer(&self, viewer: Option<Uuid>) -> Self {
        Self {
            viewer,
            ..self.clone()
        }
    }
}

fn candidate_query(query: &str, owner: Option<Uuid>) -> ListQuery {
    ListQuery {
        search: Some(query.to_string()),
        user_id: owner,
        limit: Some(MAX_LIMIT),
        ..Default::default()
    }
}

#[async_trait]
impl ContentFetcher for RepositoryFetcher {
    async fn fetch(
        &self,
        content_type: ContentType,
        query: &str,
        owner: Option<Uuid>,
    ) -> Result<Vec<ContentItem>, FetchError> {
        let list_query = candidate_query(query, owner);
        let include_private = list_query.includes_private(self.viewer);
        let backend = |e: anyhow::Error| FetchError::Backend(e.to_string());

        let items = match content_type {
            ContentType::Photo => {
                let (rows, _) = self.photos.list(&list_query, include_private).await.map_err(backend)?;
                rows.into_iter()
                    .map(|row| ContentItem::Photo(row.into()))
                    .collect()
            }
            ContentType::Video => {
                let (rows, _) = self.videos.list(&list_query, include_private).await.map_err(backend)?;
                rows.into_iter()
                    .map(|row| ContentItem::Video(row.into()))
                    .collect()
            }
            ContentType::Journal => {
                let (rows, _) = self.journals.list(&list_query, include_private).await.map_err(backend)?;
                rows.into_iter()
                    .map(|row| ContentItem::Journal(row.into()))
                    .collect()
            }
        };

        Ok(items)
    }
}
