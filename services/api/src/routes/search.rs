//! Relevance search across photos, videos and journals

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use ::search::{ContentFilter, GroupedResults, SearchRequest, SearchResult, SortMode, group_by_type};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    state::AppState,
};

/// Query parameters of `/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub sort: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,
}

impl SearchParams {
    fn into_request(self) -> Result<SearchRequest, String> {
        let filter: ContentFilter = self.content_type.as_deref().unwrap_or_default().parse()?;
        let sort: SortMode = self.sort.as_deref().unwrap_or_default().parse()?;

        let mut request = SearchRequest::new(self.q).filter(filter).sort(sort);
        if let Some(owner) = self.user_id {
            request = request.owner(owner);
        }
        Ok(request)
    }
}

/// Response of `/search`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// False when the query was blank and nothing ran
    pub searched: bool,
    /// True when every content fetch failed
    pub failed: bool,
    pub total: usize,
    pub results: Vec<SearchResult>,
    pub grouped: GroupedResults,
}

/// Run a ranked search
pub async fn search(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let request = params.into_request().map_err(ApiError::BadRequest)?;
    let viewer = viewer.map(|Extension(user)| user.id);
    let outcome = state.search_for(viewer).search(&request).await;

    let results = outcome.results().to_vec();
    Ok(Json(SearchResponse {
        searched: outcome.is_searched(),
        failed: outcome.is_failed(),
        total: results.len(),
        grouped: group_by_type(&results),
        results,
    }))
}
