use nt_core::{ArticleStorage, FeedConfig, Paginator};
use std::sync::Arc;

pub struct AppState {
    pub paginator: Paginator,
}

impl AppState {
    pub fn new(storage: Arc<dyn ArticleStorage>, config: FeedConfig) -> Self {
        Self {
            paginator: Paginator::new(storage, config),
        }
    }
}
