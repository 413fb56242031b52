use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use nt_core::{Article, ArticleStorage, Error, FeedConfig, Result};
use nt_storage::InMemoryStorage;
use nt_web::{create_app, AppState};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

fn article(i: i64) -> Article {
    Article {
        article_id: format!("article-{:02}", i),
        article_url: format!("https://tech.example.com/posts/{}", i),
        provider_id: "tech".to_string(),
        provider_name: "Tech Blog".to_string(),
        provider_avatar: "https://tech.example.com/logo.png".to_string(),
        title: format!("Post {}", i),
        thumbnail: format!("https://tech.example.com/thumbs/{}.png", i),
        insert_date: Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap() + Duration::hours(i),
        keywords: vec!["web".to_string()],
    }
}

/// Wraps a real store and counts the calls that reach it.
struct CountingStorage {
    inner: InMemoryStorage,
    calls: AtomicUsize,
    unreachable: bool,
}

impl CountingStorage {
    async fn with_articles(n: i64) -> Self {
        Self {
            inner: InMemoryStorage::with_articles((0..n).map(article)).await.unwrap(),
            calls: AtomicUsize::new(0),
            unreachable: false,
        }
    }

    async fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::with_articles(0).await
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleStorage for CountingStorage {
    async fn find_ordered_slice(&self, skip: u64, limit: u64) -> Result<Vec<Article>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(Error::Database("connection reset by peer at 10.0.0.7:27017".to_string()));
        }
        self.inner.find_ordered_slice(skip, limit).await
    }

    async fn count(&self) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(Error::Database("connection reset by peer at 10.0.0.7:27017".to_string()));
        }
        self.inner.count().await
    }
}

#[derive(Clone, Default)]
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

async fn get(storage: Arc<CountingStorage>, uri: &str) -> (StatusCode, Value) {
    let app = create_app(AppState::new(storage, FeedConfig::default()));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_first_page() {
    let storage = Arc::new(CountingStorage::with_articles(12).await);
    let (status, body) = get(storage, "/article?page=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "");
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"][0]["articleId"], "article-11");
    assert_eq!(body["totalDocs"], 12);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pagingCounter"], 1);
    assert_eq!(body["hasPrevPage"], false);
    assert_eq!(body["hasNextPage"], true);
    assert!(body["prevPage"].is_null());
    assert_eq!(body["nextPage"], 2);
}

#[tokio::test]
async fn test_last_page() {
    let storage = Arc::new(CountingStorage::with_articles(12).await);
    let (status, body) = get(storage, "/article?page=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["hasPrevPage"], true);
    assert_eq!(body["hasNextPage"], false);
    assert_eq!(body["pagingCounter"], 11);
    assert_eq!(body["prevPage"], 2);
    assert!(body["nextPage"].is_null());
}

#[tokio::test]
async fn test_page_beyond_range() {
    let storage = Arc::new(CountingStorage::with_articles(12).await);
    let (status, body) = get(storage, "/article?page=5").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["page"], 5);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["totalDocs"], 12);
}

#[tokio::test]
async fn test_empty_feed() {
    let storage = Arc::new(CountingStorage::with_articles(0).await);
    let (status, body) = get(storage, "/article?page=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDocs"], 0);
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["hasNextPage"], false);
}

#[tokio::test]
async fn test_missing_page_skips_storage() {
    for uri in ["/article", "/article?page=", "/article?other=1"] {
        let storage = Arc::new(CountingStorage::with_articles(12).await);
        let (status, body) = get(storage.clone(), uri).await;

        assert_eq!(status, StatusCode::NOT_ACCEPTABLE, "{}", uri);
        assert!(!body["message"].as_str().unwrap().is_empty());
        assert_eq!(storage.calls(), 0);
    }
}

#[tokio::test]
async fn test_invalid_page_skips_storage() {
    for uri in [
        "/article?page=abc",
        "/article?page=0",
        "/article?page=-2",
        "/article?page=1&page=2",
    ] {
        let storage = Arc::new(CountingStorage::with_articles(12).await);
        let (status, body) = get(storage.clone(), uri).await;

        assert_eq!(status, StatusCode::NOT_ACCEPTABLE, "{}", uri);
        assert!(!body["message"].as_str().unwrap().is_empty());
        assert_eq!(storage.calls(), 0);
    }
}

#[tokio::test]
async fn test_unreachable_storage() {
    let counter = ErrorCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let storage = Arc::new(CountingStorage::unreachable().await);
    let (status, body) = get(storage, "/article?page=1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["message"].as_str().unwrap();
    assert!(!message.is_empty());
    assert!(!message.contains("10.0.0.7"));
    assert!(body.get("data").is_none());
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_page_above_i64_range() {
    let storage = Arc::new(CountingStorage::with_articles(12).await);
    let (status, body) = get(storage, "/article?page=9223372036854775808").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["page"], 9_223_372_036_854_775_808u64);
    assert_eq!(body["totalPages"], 3);
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let storage = Arc::new(CountingStorage::with_articles(12).await);
    let (_, first) = get(storage.clone(), "/article?page=2").await;
    let (_, second) = get(storage, "/article?page=2").await;
    assert_eq!(first, second);
}
