//! Official Registry
//!
//! Durable set of tracked officials with a monotonically non-decreasing
//! mention counter per official. The tracked set is closed over the
//! seeded/administered list: unknown names never auto-register.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use govwire_core::Official;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown official: {0}")]
    UnknownOfficial(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}

/// SQLite-backed registry of tracked officials.
///
/// The connection mutex serializes every read-modify-write, so concurrent
/// `increment_mentions` calls never lose an increment: the UPDATE is a single
/// statement executed under the lock.
pub struct OfficialRegistry {
    db: Arc<Mutex<Connection>>,
}

impl OfficialRegistry {
    /// Open (or create) the registry at the given path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, RegistryError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(db_path.as_ref())?;
        let registry = Self::from_connection(conn)?;
        info!(
            "Initialized official registry at: {}",
            db_path.as_ref().display()
        );
        Ok(registry)
    }

    /// Create an in-memory registry (for tests)
    pub fn new_in_memory() -> Result<Self, RegistryError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, RegistryError> {
        conn.busy_timeout(Duration::from_secs(5))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS officials (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                department TEXT NOT NULL,
                mentions_count INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    /// Seed the tracked set. Idempotent: already-registered names keep their
    /// existing counter.
    pub fn seed(&self, officials: &[(&str, &str)]) -> Result<(), RegistryError> {
        let conn = self.db.lock();
        for (name, department) in officials {
            conn.execute(
                "INSERT OR IGNORE INTO officials (name, department, mentions_count)
                 VALUES (?1, ?2, 0)",
                params![name, department],
            )?;
        }
        debug!("Seeded {} tracked officials", officials.len());
        Ok(())
    }

    /// Credit one mention to a tracked official and return the new count.
    ///
    /// Fails with `UnknownOfficial` if the name is not tracked; callers at
    /// the ingestion boundary ignore that case rather than registering the
    /// name.
    pub fn increment_mentions(&self, name: &str) -> Result<u64, RegistryError> {
        let conn = self.db.lock();

        let changed = conn.execute(
            "UPDATE officials SET mentions_count = mentions_count + 1 WHERE name = ?1",
            params![name],
        )?;
        if changed == 0 {
            return Err(RegistryError::UnknownOfficial(name.to_string()));
        }

        let count: i64 = conn.query_row(
            "SELECT mentions_count FROM officials WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// All tracked officials in registration order
    pub fn snapshot_all(&self) -> Result<Vec<Official>, RegistryError> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare(
            "SELECT name, department, mentions_count FROM officials ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Official {
                name: row.get(0)?,
                department: row.get(1)?,
                mentions_count: row.get::<_, i64>(2)? as u64,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Names of all tracked officials in registration order
    pub fn tracked_names(&self) -> Result<Vec<String>, RegistryError> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare("SELECT name FROM officials ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Number of officials with at least one mention credit
    pub fn featured_count(&self) -> Result<u64, RegistryError> {
        let conn = self.db.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM officials WHERE mentions_count > 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Current mention count for a tracked official
    pub fn mentions_count(&self, name: &str) -> Result<u64, RegistryError> {
        let conn = self.db.lock();
        let count: Option<i64> = conn
            .query_row(
                "SELECT mentions_count FROM officials WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        count
            .map(|c| c as u64)
            .ok_or_else(|| RegistryError::UnknownOfficial(name.to_string()))
    }
}

impl Clone for OfficialRegistry {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}
