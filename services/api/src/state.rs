//! Application state shared across handlers

use std::sync::Arc;

use media::MediaStore;
use search::{ResultAggregator, WeightedScorer};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    middleware::JwtVerifier,
    repositories::{JournalRepository, PhotoRepository, UserRepository, VideoRepository},
    search_source::RepositoryFetcher,
};

/// Search over the local repositories
pub type Search = ResultAggregator<RepositoryFetcher, WeightedScorer>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repository: UserRepository,
    pub photo_repository: PhotoRepository,
    pub video_repository: VideoRepository,
    pub journal_repository: JournalRepository,
    pub media_store: Arc<dyn MediaStore>,
    pub search_source: RepositoryFetcher,
    pub scorer: WeightedScorer,
    pub jwt_verifier: JwtVerifier,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wire repositories and search over one pool
    pub fn new(
        pool: PgPool,
        media_store: Arc<dyn MediaStore>,
        jwt_verifier: JwtVerifier,
        max_upload_bytes: usize,
    ) -> Self {
        let photo_repository = PhotoRepository::new(pool.clone());
        let video_repository = VideoRepository::new(pool.clone());
        let journal_repository = JournalRepository::new(pool.clone());

        let search_source = RepositoryFetcher::new(
            photo_repository.clone(),
            video_repository.clone(),
            journal_repository.clone(),
        );

        Self {
            user_repository: UserRepository::new(pool),
            photo_repository,
            video_repository,
            journal_repository,
            media_store,
            search_source,
            scorer: WeightedScorer::default(),
            jwt_verifier,
            max_upload_bytes,
        }
    }

    /// Search pipeline reading on behalf of `viewer`
    pub fn search_for(&self, viewer: Option<Uuid>) -> Search {
        ResultAggregator::new(self.search_source.for_viewer(viewer), self.scorer.clone())
    }
}
