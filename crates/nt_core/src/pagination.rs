//! Page-number validation and feed pagination.
//!
//! The storage collaborator only has to provide an ordered slice and a count;
//! everything else about a page (totals, neighbours, counters) is computed here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::storage::ArticleStorage;
use crate::types::Article;
use crate::{Error, Result};

/// Records per page when nothing else is configured.
pub const DEFAULT_PAGE_LIMIT: u64 = 5;

const PAGE_PARAM: &str = "page";

/// A validated, 1-indexed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
}

impl PageRequest {
    /// Parses the raw `page` query value.
    ///
    /// Absent or blank input is a missing parameter. Anything that is not a
    /// positive base-10 integer is rejected rather than coerced.
    pub fn parse(raw: Option<&str>) -> std::result::Result<Self, ValidationError> {
        let raw = match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(ValidationError::MissingParameter(PAGE_PARAM)),
        };

        let invalid = || ValidationError::InvalidParameter {
            name: PAGE_PARAM,
            value: raw.to_string(),
        };

        let page = raw.parse::<u64>().map_err(|_| invalid())?;
        if page == 0 {
            return Err(invalid());
        }
        Ok(Self { page })
    }

    pub fn new(page: u64) -> std::result::Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::InvalidParameter {
                name: PAGE_PARAM,
                value: page.to_string(),
            });
        }
        Ok(Self { page })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// Number of records preceding this page.
    pub fn skip(&self, limit: u64) -> u64 {
        (self.page - 1).saturating_mul(limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    limit: u64,
}

impl FeedConfig {
    pub fn with_limit(limit: u64) -> Result<Self> {
        if limit == 0 {
            return Err(Error::Config("page limit must be at least 1".to_string()));
        }
        Ok(Self { limit })
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Paging metadata for one served page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_docs: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub page: u64,
    pub paging_counter: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl PageMeta {
    /// Out-of-range pages are echoed back unchanged, never clamped.
    pub fn compute(request: PageRequest, limit: u64, total_docs: u64) -> Self {
        let page = request.page();
        let total_pages = total_docs.div_ceil(limit);
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            total_docs,
            limit,
            total_pages,
            page,
            paging_counter: request.skip(limit).saturating_add(1),
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub docs: Vec<Article>,
    pub meta: PageMeta,
}

/// Serves pages of the feed from an injected storage collaborator.
#[derive(Clone)]
pub struct Paginator {
    storage: Arc<dyn ArticleStorage>,
    config: FeedConfig,
}

impl Paginator {
    pub fn new(storage: Arc<dyn ArticleStorage>, config: FeedConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> FeedConfig {
        self.config
    }

    /// Fetches one page, newest articles first.
    ///
    /// Storage errors are returned as-is; nothing is retried.
    pub async fn fetch_page(&self, request: PageRequest) -> Result<PageResult> {
        let limit = self.config.limit();
        let skip = request.skip(limit);

        let (docs, total_docs) = tokio::try_join!(
            self.storage.find_ordered_slice(skip, limit),
            self.storage.count(),
        )?;

        let meta = PageMeta::compute(request, limit, total_docs);
        debug!(
            page = meta.page,
            returned = docs.len(),
            total_docs = meta.total_docs,
            total_pages = meta.total_pages,
            "served feed page"
        );

        Ok(PageResult { docs, meta })
    }
}
