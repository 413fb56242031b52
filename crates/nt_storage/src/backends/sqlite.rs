use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use nt_core::{Article, ArticleStorage, Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::StorageBackend;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        article_id TEXT PRIMARY KEY,
        article_url TEXT NOT NULL,
        provider_id TEXT NOT NULL,
        provider_name TEXT NOT NULL,
        provider_avatar TEXT NOT NULL,
        title TEXT NOT NULL,
        thumbnail TEXT NOT NULL,
        insert_date TEXT NOT NULL,
        keywords TEXT NOT NULL DEFAULT '[]'
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_articles_insert_date
    ON articles (insert_date DESC, article_id ASC)
    "#,
];

// Fixed width UTC so that text order matches time order.
fn encode_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    let keywords: String = row.get("keywords");
    let insert_date: String = row.get("insert_date");

    Ok(Article {
        article_id: row.get("article_id"),
        article_url: row.get("article_url"),
        provider_id: row.get("provider_id"),
        provider_name: row.get("provider_name"),
        provider_avatar: row.get("provider_avatar"),
        title: row.get("title"),
        thumbnail: row.get("thumbnail"),
        insert_date: DateTime::parse_from_rfc3339(&insert_date)
            .map_err(|e| Error::Database(format!("Failed to parse date {}: {}", insert_date, e)))?
            .with_timezone(&Utc),
        keywords: serde_json::from_str(&keywords)?,
    })
}

pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be available at ./articles.db"
    }

    async fn new() -> Result<Self> {
        Self::new_with_path(Path::new("articles.db")).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Inserts or replaces an article. Used for seeding; the feed itself is read-only.
    pub async fn store_article(&self, article: &Article) -> Result<()> {
        let keywords = serde_json::to_string(&article.keywords)?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO articles
            (article_id, article_url, provider_id, provider_name, provider_avatar,
             title, thumbnail, insert_date, keywords)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.article_id)
        .bind(&article.article_url)
        .bind(&article.provider_id)
        .bind(&article.provider_name)
        .bind(&article.provider_avatar)
        .bind(&article.title)
        .bind(&article.thumbnail)
        .bind(encode_date(&article.insert_date))
        .bind(keywords)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to store article: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn find_ordered_slice(&self, skip: u64, limit: u64) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM articles
            ORDER BY insert_date DESC, article_id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(skip).unwrap_or(i64::MAX))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to fetch articles: {}", e)))?;

        rows.iter().map(article_from_row).collect()
    }

    async fn count(&self) -> Result<u64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to count articles: {}", e)))?;

        Ok(total as u64)
    }
}
