//! Guard against slow, superseded searches overwriting newer results
//!
//! Every search cycle takes a ticket with a generation number. A completed
//! outcome is only displayed if its ticket is still the newest one issued;
//! anything older is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    aggregator::{ContentFetcher, ResultAggregator},
    scorer::RelevanceScorer,
    types::{SearchOutcome, SearchRequest},
};

/// Generation token handed out when a search starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Whether a completed outcome replaced the displayed results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    Stale,
}

struct Displayed {
    generation: u64,
    outcome: SearchOutcome,
}

/// Owns the displayed result set of one search box
pub struct SearchSession<F, S> {
    aggregator: ResultAggregator<F, S>,
    latest: AtomicU64,
    displayed: RwLock<Displayed>,
}

impl<F, S> SearchSession<F, S>
where
    F: ContentFetcher,
    S: RelevanceScorer,
{
    pub fn new(aggregator: ResultAggregator<F, S>) -> Self {
        Self {
            aggregator,
            latest: AtomicU64::new(0),
            displayed: RwLock::new(Displayed {
                generation: 0,
                outcome: SearchOutcome::NotSearched,
            }),
        }
    }

    /// Start a new cycle, superseding every earlier ticket
    pub fn begin(&self) -> SearchTicket {
        SearchTicket {
            generation: self.latest.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    /// Display `outcome` unless a newer cycle has started since `ticket`
    pub async fn commit(&self, ticket: SearchTicket, outcome: SearchOutcome) -> Commit {
        let mut displayed = self.displayed.write().await;

        if ticket.generation != self.latest.load(Ordering::SeqCst)
            || ticket.generation <= displayed.generation
        {
            debug!(
                "Discarding stale search results (generation {})",
                ticket.generation
            );
            return Commit::Stale;
        }

        displayed.generation = ticket.generation;
        displayed.outcome = outcome;
        Commit::Applied
    }

    /// Run a full cycle: take a ticket, search, then commit
    pub async fn run(&self, request: &SearchRequest) -> Commit {
        let ticket = self.begin();
        let outcome = self.aggregator.search(request).await;
        self.commit(ticket, outcome).await
    }

    /// Currently displayed outcome
    pub async fn current(&self) -> SearchOutcome {
        self.displayed.read().await.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::FetchError,
        scorer::WeightedScorer,
        types::{ContentItem, ContentType, PhotoDoc},
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::{sync::Arc, time::Duration};
    use uuid::Uuid;

    /// Echoes the query back as a photo title, slowly for queries starting with "slow"
    struct EchoFetcher;

    #[async_trait]
    impl ContentFetcher for EchoFetcher {
        async fn fetch(
            &self,
            content_type: ContentType,
            query: &str,
            _owner: Option<Uuid>,
        ) -> Result<Vec<ContentItem>, FetchError> {
            if query.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(150)).await;
            }
            if content_type != ContentType::Photo {
                return Ok(vec![]);
            }
            Ok(vec![ContentItem::Photo(PhotoDoc {
                id: Uuid::new_v4(),
                title: Some(query.to_string()),
                description: None,
                url: None,
                thumbnail_url: None,
                uploader: None,
                album: None,
                location: None,
                tags: None,
                is_public: true,
                created_at: Utc::now(),
            })])
        }
    }

    fn session() -> SearchSession<EchoFetcher, WeightedScorer> {
        SearchSession::new(ResultAggregator::new(EchoFetcher, WeightedScorer::default()))
    }

    fn displayed_title(outcome: &SearchOutcome) -> Option<String> {
        outcome
            .results()
            .first()
            .and_then(|r| r.item.title().map(str::to_string))
    }

    #[tokio::test]
    async fn test_older_ticket_is_discarded() {
        let session = session();
        let first = session.begin();
        let second = session.begin();

        let completed = SearchOutcome::Completed {
            results: vec![],
            failed: false,
        };
        assert_eq!(session.commit(second, completed.clone()).await, Commit::Applied);
        assert_eq!(
            session.commit(first, SearchOutcome::NotSearched).await,
            Commit::Stale
        );
        assert_eq!(session.current().await, completed);
    }

    #[tokio::test]
    async fn test_slow_previous_search_does_not_clobber_newer_one() {
        let session = Arc::new(session());

        let slow = {
            let session = session.clone();
            tokio::spawn(async move { session.run(&SearchRequest::new("slow query")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fast = session.run(&SearchRequest::new("fast query")).await;

        assert_eq!(fast, Commit::Applied);
        assert_eq!(slow.await.unwrap(), Commit::Stale);
        assert_eq!(
            displayed_title(&session.current().await),
            Some("fast query".to_string())
        );
    }

    #[tokio::test]
    async fn test_sequential_searches_all_apply() {
        let session = session();
        assert_eq!(session.current().await, SearchOutcome::NotSearched);

        assert_eq!(session.run(&SearchRequest::new("one")).await, Commit::Applied);
        assert_eq!(session.run(&SearchRequest::new("two")).await, Commit::Applied);
        assert_eq!(
            displayed_title(&session.current().await),
            Some("two".to_string())
        );
    }
}
