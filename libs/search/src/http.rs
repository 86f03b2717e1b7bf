//! [`ContentFetcher`] over the public listing endpoints
//!
//! Each content type is served at `{base}/{photos|videos|journals}` and
//! answers `?search=<query>&limit=<n>&userId=<owner>` with `{ "items": [...] }`.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    aggregator::ContentFetcher,
    error::FetchError,
    types::{ContentItem, ContentType, JournalDoc, PhotoDoc, VideoDoc},
};

/// Largest page the listing endpoints serve
const CANDIDATE_LIMIT: &str = "100";

#[derive(Deserialize)]
struct ListEnvelope {
    items: Vec<serde_json::Value>,
}

/// Decode each listed item on its own; malformed items are skipped
fn decode_items<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, FetchError> {
    let envelope: ListEnvelope = serde_json::from_slice(body)?;

    let items = envelope
        .items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed item {}: {}", index, e);
                None
            }
        })
        .collect();

    Ok(items)
}

/// HTTP client for the three listing endpoints
#[derive(Clone)]
pub struct HttpContentFetcher {
    client: Client,
    base_url: Url,
}

impl HttpContentFetcher {
    /// Create a fetcher rooted at `base_url` using a default client
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a fetcher sharing an existing client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, FetchError> {
        // Url::join replaces the last path segment unless the base ends in '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self { client, base_url })
    }

    /// Listing URL for one content type with the search parameters applied
    pub fn listing_url(
        &self,
        content_type: ContentType,
        query: &str,
        owner: Option<Uuid>,
    ) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join(content_type.collection())
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("search", query);
            pairs.append_pair("limit", CANDIDATE_LIMIT);
            if let Some(owner) = owner {
                pairs.append_pair("userId", &owner.to_string());
            }
        }

        Ok(url)
    }

    async fn get_items<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        decode_items(&body)
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(
        &self,
        content_type: ContentType,
        query: &str,
        owner: Option<Uuid>,
    ) -> Result<Vec<ContentItem>, FetchError> {
        let url = self.listing_url(content_type, query, owner)?;

        let items = match content_type {
            ContentType::Photo => self
                .get_items::<PhotoDoc>(url)
                .await?
                .into_iter()
                .map(ContentItem::Photo)
                .collect(),
            ContentType::Video => self
                .get_items::<VideoDoc>(url)
                .await?
                .into_iter()
                .map(ContentItem::Video)
                .collect(),
            ContentType::Journal => self
                .get_items::<JournalDoc>(url)
                .await?
                .into_iter()
                .map(ContentItem::Journal)
                .collect(),
        };

        Ok(items)
    }
}
