use async_trait::async_trait;
use nt_core::{ArticleStorage, Error, Result};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn get_error_message() -> &'static str;
    async fn new() -> Result<Self> where Self: Sized;
}

/// Builds the backend named by `kind`. For SQLite, `url` is the database path.
#[cfg_attr(not(feature = "sqlite"), allow(unused_variables))]
pub async fn create_storage(kind: &str, url: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    match kind {
        "memory" => {
            info!("📝 Using in-memory storage");
            let storage = <InMemoryStorage as StorageBackend>::new().await.map_err(|e| {
                Error::Storage(format!("{} ({})", InMemoryStorage::get_error_message(), e))
            })?;
            Ok(Arc::new(storage))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let storage = match url {
                Some(path) => SQLiteStorage::new_with_path(std::path::Path::new(path)).await,
                None => <SQLiteStorage as StorageBackend>::new().await,
            }
            .map_err(|e| {
                Error::Storage(format!("{} ({})", SQLiteStorage::get_error_message(), e))
            })?;
            info!("📝 Using SQLite storage at {}", storage.get_db_path().display());
            Ok(Arc::new(storage))
        }
        other => Err(Error::Storage(format!("Unsupported storage backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}
