use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

/// Read side of the article collection.
///
/// Implementations must tolerate concurrent readers. The two calls are not
/// expected to observe the same snapshot.
#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Articles ordered by insertion time, newest first, after skipping `skip`
    /// and returning at most `limit`.
    async fn find_ordered_slice(&self, skip: u64, limit: u64) -> Result<Vec<Article>>;

    /// Total number of articles in the collection.
    async fn count(&self) -> Result<u64>;
}
