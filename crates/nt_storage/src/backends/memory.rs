use async_trait::async_trait;
use nt_core::{Article, ArticleStorage, Result};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

/// Articles kept newest first, ties broken by id.
#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
}

fn feed_order(a: &Article, b: &Article) -> Ordering {
    b.insert_date
        .cmp(&a.insert_date)
        .then_with(|| a.article_id.cmp(&b.article_id))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_article(&mut self, article: &Article) {
        if let Some(existing) = self.articles.iter_mut().find(|a| a.article_id == article.article_id) {
            *existing = article.clone();
        } else {
            self.articles.push(article.clone());
        }
        self.articles.sort_by(feed_order);
    }

    pub fn find_ordered_slice(&self, skip: u64, limit: u64) -> Vec<Article> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        self.articles.iter().skip(skip).take(limit).cloned().collect()
    }

    pub fn count(&self) -> u64 {
        self.articles.len() as u64
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub async fn with_articles(articles: impl IntoIterator<Item = Article>) -> Result<Self> {
        let storage = Self::default();
        for article in articles {
            storage.store_article(&article).await;
        }
        Ok(storage)
    }

    /// Inserts or replaces an article by id. Seeding only; the feed never writes.
    pub async fn store_article(&self, article: &Article) {
        self.store.write().await.store_article(article);
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn new() -> Result<Self> where Self: Sized {
        Ok(Self::default())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn find_ordered_slice(&self, skip: u64, limit: u64) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.find_ordered_slice(skip, limit))
    }

    async fn count(&self) -> Result<u64> {
        let store = self.store.read().await;
        Ok(store.count())
    }
}
