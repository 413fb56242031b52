use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use nt_core::{Article, PageMeta, PageRequest, Paginator, ValidationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub page: Option<String>,
}

/// Body of a successful `GET /article`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub message: String,
    pub data: Vec<Article>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Validates the raw page value and serves it. Storage is not touched when
/// validation fails.
pub async fn feed_page(paginator: &Paginator, raw_page: Option<&str>) -> Result<FeedResponse, ApiError> {
    let request = PageRequest::parse(raw_page)?;
    let result = paginator.fetch_page(request).await?;

    Ok(FeedResponse {
        message: String::new(),
        data: result.docs,
        meta: result.meta,
    })
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Json<FeedResponse>, ApiError> {
    // A query string serde cannot read (e.g. a repeated `page`) is a bad page value.
    let Query(query) = query.map_err(|rejection| ValidationError::InvalidParameter {
        name: "page",
        value: rejection.body_text(),
    })?;
    feed_page(&state.paginator, query.page.as_deref()).await.map(Json)
}
