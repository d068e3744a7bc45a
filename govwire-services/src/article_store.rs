//! Article Store
//!
//! SQLite-backed append-only storage of articles with uniqueness by URL.
//! Insertion is idempotent: re-inserting an existing URL is a no-op.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use govwire_core::Article;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of an insert attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The article was stored for the first time
    Inserted,
    /// An article with this URL is already stored
    AlreadyExists,
}

/// SQLite-backed article store.
///
/// The connection sits behind a mutex, which is the serialization point that
/// makes `try_insert` atomic with respect to concurrent callers: the
/// `url UNIQUE` constraint plus `INSERT OR IGNORE` guarantees that no two
/// inserts of the same URL both report `Inserted`. Readers never observe a
/// half-inserted record because every row lands in a single statement.
pub struct ArticleStore {
    db: Arc<Mutex<Connection>>,
}

impl ArticleStore {
    /// Open (or create) the store at the given path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(db_path.as_ref())?;
        let store = Self::from_connection(conn)?;
        info!("Initialized article store at: {}", db_path.as_ref().display());
        Ok(store)
    }

    /// Create an in-memory store (for tests)
    pub fn new_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                department TEXT NOT NULL,
                officials JSON NOT NULL,
                date INTEGER NOT NULL,
                url TEXT NOT NULL UNIQUE,
                source TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_articles_date
            ON articles(date DESC);

            CREATE INDEX IF NOT EXISTS idx_articles_department
            ON articles(department);
            "#,
        )?;

        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    /// Attempt to insert an article, deduplicating by URL.
    ///
    /// Idempotent: a second insert of the same URL returns `AlreadyExists`
    /// and leaves the stored record untouched.
    pub fn try_insert(&self, article: &Article) -> Result<InsertOutcome, StoreError> {
        let officials = serde_json::to_string(&article.officials)?;

        let conn = self.db.lock();
        let changed = conn.execute(
            "INSERT OR IGNORE INTO articles
             (title, content, department, officials, date, url, source)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                article.title,
                article.content,
                article.department,
                officials,
                article.date.timestamp_micros(),
                article.url,
                article.source,
            ],
        )?;

        if changed == 1 {
            debug!("Stored new article: {}", article.url);
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }

    /// All stored articles, most recent first
    pub fn list_all(&self) -> Result<Vec<Article>, StoreError> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare(
            "SELECT title, content, department, officials, date, url, source
             FROM articles
             ORDER BY date DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<String>>(6)?,
            ))
        })?;

        let mut articles = Vec::new();
        for row in rows {
            let (title, content, department, officials_json, date_micros, url, source) = row?;
            articles.push(Article {
                title,
                content,
                department,
                officials: serde_json::from_str(&officials_json)?,
                date: DateTime::from_timestamp_micros(date_micros).unwrap_or_default(),
                url,
                source,
            });
        }

        Ok(articles)
    }

    /// Number of stored articles
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.db.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Article counts keyed by department
    pub fn count_by_department(&self) -> Result<HashMap<String, u64>, StoreError> {
        let conn = self.db.lock();
        let mut stmt =
            conn.prepare("SELECT department, COUNT(*) FROM articles GROUP BY department")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (department, count) = row?;
            counts.insert(department, count as u64);
        }

        Ok(counts)
    }
}

impl Clone for ArticleStore {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}
