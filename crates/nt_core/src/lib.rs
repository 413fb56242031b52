pub mod error;
pub mod pagination;
pub mod storage;
pub mod types;

pub use error::{Error, ValidationError};
pub use pagination::{FeedConfig, PageMeta, PageRequest, PageResult, Paginator, DEFAULT_PAGE_LIMIT};
pub use storage::ArticleStorage;
pub use types::Article;

pub type Result<T> = std::result::Result<T, Error>;
