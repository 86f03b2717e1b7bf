//! End-to-end search over HTTP against a local stub of the listing endpoints

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{Duration, Utc};
use search::{
    ContentType, HttpContentFetcher, ResultAggregator, SearchRequest, SortMode, WeightedScorer,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Deserialize)]
struct ListingQuery {
    search: String,
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

async fn photos(Query(query): Query<ListingQuery>) -> impl IntoResponse {
    assert_eq!(query.search, "sunset");
    assert!(query.user_id.is_none());
    Json(json!({
        "items": [
            {
                "id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
                "title": "Beautiful Sunset",
                "url": "https://cdn.example.com/photos/1.jpg",
                "uploader": {"id": "7d444840-9dc0-11d1-b245-5ffdce74fad2", "name": "Lea", "avatar": null},
                "tags": ["sunset"],
                "isPublic": true,
                "createdAt": Utc::now().to_rfc3339()
            },
            {
                "id": "1b4e28ba-2fa1-11d2-883f-0016d3cca428",
                "title": "Harbour",
                "description": "sunset over the harbour",
                "createdAt": (Utc::now() - Duration::days(90)).to_rfc3339()
            }
        ],
        "page": 1,
        "limit": 20,
        "total": 2
    }))
}

async fn videos() -> impl IntoResponse {
    Json(json!({
        "items": [
            {
                "id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
                "title": "Sunset timelapse",
                "videoUrl": "https://cdn.example.com/videos/1.mp4",
                "tags": null,
                "duration": 42.5,
                "size": 1048576,
                "createdAt": (Utc::now() - Duration::days(10)).to_rfc3339()
            },
            {
                "title": "Sunset without an id",
                "createdAt": Utc::now().to_rfc3339()
            }
        ]
    }))
}

async fn journals_broken() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Internal server error"})),
    )
}

async fn spawn_stub() -> anyhow::Result<String> {
    let app = Router::new()
        .route("/photos", get(photos))
        .route("/videos", get(videos))
        .route("/journals", get(journals_broken));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn test_failed_endpoint_and_malformed_item_keep_other_results() -> anyhow::Result<()> {
    let base = spawn_stub().await?;
    let aggregator =
        ResultAggregator::new(HttpContentFetcher::new(&base)?, WeightedScorer::default());

    let outcome = aggregator.search(&SearchRequest::new("sunset")).await;

    assert!(outcome.is_searched());
    assert!(!outcome.is_failed());

    let ranked: Vec<(ContentType, i64)> = outcome
        .results()
        .iter()
        .map(|r| (r.content_type, r.relevance))
        .collect();
    assert_eq!(
        ranked,
        vec![
            // title substring 10, exact tag 12, created today 2
            (ContentType::Photo, 24),
            // title substring 10 + prefix 5, ten days old 1
            (ContentType::Video, 16),
            // one body occurrence 3 + 2
            (ContentType::Photo, 5),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_date_sort_over_http() -> anyhow::Result<()> {
    let base = spawn_stub().await?;
    let aggregator =
        ResultAggregator::new(HttpContentFetcher::new(&base)?, WeightedScorer::default());

    let outcome = aggregator
        .search(&SearchRequest::new("sunset").sort(SortMode::Date))
        .await;

    let titles: Vec<&str> = outcome
        .results()
        .iter()
        .filter_map(|r| r.item.title())
        .collect();
    assert_eq!(titles, vec!["Beautiful Sunset", "Sunset timelapse", "Harbour"]);

    Ok(())
}

#[tokio::test]
async fn test_unreachable_endpoints_report_failure() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let fetcher = HttpContentFetcher::new(&format!("http://{}", addr))?;
    let aggregator = ResultAggregator::new(fetcher, WeightedScorer::default());

    let outcome = aggregator.search(&SearchRequest::new("sunset")).await;

    assert!(outcome.is_failed());
    assert!(outcome.results().is_empty());
    Ok(())
}
