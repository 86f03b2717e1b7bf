//! Concurrent fetch, scoring and ranking of the three content types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::FetchError,
    scorer::RelevanceScorer,
    types::{
        ContentItem, ContentType, GroupedResults, SearchOutcome, SearchRequest, SearchResult,
        SortMode,
    },
};

/// Source of candidate items for one content type.
///
/// Implementations apply the coarse server-side filter: substring match of
/// `query` against title, body and tags, public items only unless `owner`
/// is set, in which case all of that owner's items are returned.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(
        &self,
        content_type: ContentType,
        query: &str,
        owner: Option<Uuid>,
    ) -> Result<Vec<ContentItem>, FetchError>;
}

#[async_trait]
impl<T: ContentFetcher + ?Sized> ContentFetcher for Arc<T> {
    async fn fetch(
        &self,
        content_type: ContentType,
        query: &str,
        owner: Option<Uuid>,
    ) -> Result<Vec<ContentItem>, FetchError> {
        (**self).fetch(content_type, query, owner).await
    }
}

#[async_trait]
impl<T: ContentFetcher + ?Sized> ContentFetcher for &T {
    async fn fetch(
        &self,
        content_type: ContentType,
        query: &str,
        owner: Option<Uuid>,
    ) -> Result<Vec<ContentItem>, FetchError> {
        (**self).fetch(content_type, query, owner).await
    }
}

/// Merges per-type fetches into one ranked result list
pub struct ResultAggregator<F, S> {
    fetcher: F,
    scorer: S,
}

impl<F, S> ResultAggregator<F, S>
where
    F: ContentFetcher,
    S: RelevanceScorer,
{
    pub fn new(fetcher: F, scorer: S) -> Self {
        Self { fetcher, scorer }
    }

    /// Run one search cycle against the current time
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        self.search_at(request, Utc::now()).await
    }

    /// Run one search cycle, scoring recency relative to `now`
    pub async fn search_at(&self, request: &SearchRequest, now: DateTime<Utc>) -> SearchOutcome {
        let query = request.query.trim();
        if query.is_empty() {
            return SearchOutcome::NotSearched;
        }

        let (photos, videos, journals) = tokio::join!(
            self.fetch_enabled(ContentType::Photo, request, query),
            self.fetch_enabled(ContentType::Video, request, query),
            self.fetch_enabled(ContentType::Journal, request, query),
        );

        let mut attempted = 0;
        let mut failures = 0;
        let mut results = Vec::new();

        for (content_type, fetched) in [
            (ContentType::Photo, photos),
            (ContentType::Video, videos),
            (ContentType::Journal, journals),
        ] {
            let Some(fetched) = fetched else { continue };
            attempted += 1;

            match fetched {
                Ok(items) => {
                    debug!("Fetched {} {} items", items.len(), content_type);
                    results.extend(items.into_iter().map(|item| SearchResult {
                        id: item.id(),
                        content_type: item.content_type(),
                        relevance: self.scorer.score(&item, query, now),
                        item,
                    }));
                }
                Err(e) => {
                    failures += 1;
                    warn!("Search fetch for {} failed, skipping: {}", content_type, e);
                }
            }
        }

        sort_results(&mut results, request.sort);

        SearchOutcome::Completed {
            results,
            failed: attempted > 0 && failures == attempted,
        }
    }

    async fn fetch_enabled(
        &self,
        content_type: ContentType,
        request: &SearchRequest,
        query: &str,
    ) -> Option<Result<Vec<ContentItem>, FetchError>> {
        if !request.filter.includes(content_type) {
            return None;
        }
        Some(self.fetcher.fetch(content_type, query, request.owner).await)
    }
}

/// Order results in place.
///
/// Relevance mode breaks ties by newest first; both modes fall back to the id
/// so the order is total.
pub fn sort_results(results: &mut [SearchResult], mode: SortMode) {
    match mode {
        SortMode::Relevance => results.sort_by(|a, b| {
            b.relevance
                .cmp(&a.relevance)
                .then_with(|| b.item.created_at().cmp(&a.item.created_at()))
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortMode::Date => results.sort_by(|a, b| {
            b.item
                .created_at()
                .cmp(&a.item.created_at())
                .then_with(|| a.id.cmp(&b.id))
        }),
    }
}

/// Stable partition of sorted results by content type
pub fn group_by_type(results: &[SearchResult]) -> GroupedResults {
    let mut grouped = GroupedResults::default();
    for result in results {
        let bucket = match result.content_type {
            ContentType::Photo => &mut grouped.photos,
            ContentType::Video => &mut grouped.videos,
            ContentType::Journal => &mut grouped.journals,
        };
        bucket.push(result.clone());
    }
    grouped
}
