//! Relevance-ranked search across photos, videos and journals
//!
//! The three content types are stored and served independently. This crate
//! fetches them concurrently through a [`ContentFetcher`], scores every item
//! against the query with a [`RelevanceScorer`], and merges them into one
//! ranked list that can be partitioned back by type for display.
//!
//! ```rust,no_run
//! use search::{HttpContentFetcher, ResultAggregator, SearchRequest, WeightedScorer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = HttpContentFetcher::new("http://localhost:3001")?;
//!     let aggregator = ResultAggregator::new(fetcher, WeightedScorer::default());
//!     let outcome = aggregator.search(&SearchRequest::new("sunset")).await;
//!     println!("{} results", outcome.results().len());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod error;
pub mod http;
pub mod scorer;
pub mod session;
pub mod types;

pub use aggregator::{ContentFetcher, ResultAggregator, group_by_type, sort_results};
pub use error::FetchError;
pub use http::HttpContentFetcher;
pub use scorer::{RelevanceScorer, ScoreWeights, WeightedScorer};
pub use session::{Commit, SearchSession, SearchTicket};
pub use types::{
    ContentFilter, ContentItem, ContentType, GroupedResults, JournalDoc, OwnerSummary, PhotoDoc,
    SearchOutcome, SearchRequest, SearchResult, SortMode, VideoDoc,
};
