//! SQLite-backed catalog item store.
//!
//! One table, `menu`, holding the last successfully fetched catalog, plus a
//! small `sync_meta` table recording when it was written. The whole table is
//! replaced on every sync cycle; there are no partial upserts.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::models::CatalogItem;

use super::StorageError;

/// How long to wait on a locked database before failing.
/// Reads may run concurrently with a sync cycle; SQLite serializes them.
const BUSY_TIMEOUT_SECS: u64 = 30;

/// Consider the stored catalog stale after 1 hour.
/// Staleness is advisory only - a populated store always satisfies a load.
const STORE_STALE_MINUTES: i64 = 60;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS menu (
        id          INTEGER PRIMARY KEY,
        name        TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price       REAL NOT NULL,
        image       TEXT,
        category    TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_menu_category ON menu(category);

    CREATE TABLE IF NOT EXISTS sync_meta (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

enum Location {
    File(PathBuf),
    Memory,
}

/// Durable storage for catalog items.
///
/// Construct one instance and hand it (via `Arc`) to the sync coordinator and
/// search engine at composition time. The coordinator is the only writer; the
/// internal mutex serializes access to the single connection, and SQLite's
/// transaction atomicity covers readers running alongside a sync cycle.
///
/// The connection is opened lazily by `init()`. Every other method returns
/// `StorageError::NotInitialized` until `init()` has succeeded once.
pub struct MenuStore {
    location: Location,
    conn: Mutex<Option<Connection>>,
}

impl MenuStore {
    /// Create a store backed by a database file at `path`.
    /// The file is not touched until `init()`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            location: Location::File(path),
            conn: Mutex::new(None),
        }
    }

    /// Create a store backed by an in-memory database (for testing).
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        // A poisoned mutex only means a previous caller panicked mid-call;
        // the connection itself is still usable.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn open_connection(&self) -> Result<Connection, StorageError> {
        let conn = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDir {
                        path: path.clone(),
                        source: e,
                    })?;
                }
                Connection::open(path).map_err(|e| StorageError::Open {
                    path: path.clone(),
                    source: e,
                })?
            }
            Location::Memory => Connection::open_in_memory()?,
        };
        conn.busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS))?;
        Ok(conn)
    }

    /// Ensure the database is open and the schema exists. Idempotent.
    pub fn init(&self) -> Result<(), StorageError> {
        let mut guard = self.lock();
        if guard.is_none() {
            *guard = Some(self.open_connection()?);
            debug!("menu store opened");
        }
        if let Some(conn) = guard.as_ref() {
            conn.execute_batch(SCHEMA)?;
        }
        Ok(())
    }

    /// Whether at least one item is currently persisted.
    pub fn has_data(&self) -> Result<bool, StorageError> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(StorageError::NotInitialized)?;
        let exists: i64 =
            conn.query_row("SELECT EXISTS(SELECT 1 FROM menu)", [], |row| row.get(0))?;
        Ok(exists == 1)
    }

    /// Atomically replace the entire persisted catalog with `items`.
    ///
    /// Delete-all then insert-all inside one transaction: afterward either all
    /// rows are present or, on failure, the prior content is untouched.
    pub fn save(&self, items: &[CatalogItem]) -> Result<(), StorageError> {
        let mut guard = self.lock();
        let conn = guard.as_mut().ok_or(StorageError::NotInitialized)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM menu", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO menu (id, name, description, price, image, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for item in items {
                stmt.execute(params![
                    item.id,
                    item.name,
                    item.description,
                    item.price,
                    item.image,
                    item.category,
                ])?;
            }
        }
        tx.execute(
            "INSERT INTO sync_meta (key, value) VALUES ('last_synced_at', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        debug!(count = items.len(), "catalog persisted");
        Ok(())
    }

    /// Every persisted item, order unspecified.
    pub fn get_all(&self) -> Result<Vec<CatalogItem>, StorageError> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(StorageError::NotInitialized)?;
        let mut stmt =
            conn.prepare("SELECT id, name, description, price, image, category FROM menu")?;
        let rows = stmt.query_map([], Self::row_to_item)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// The distinct categories currently persisted, sorted case-insensitively.
    pub fn categories(&self) -> Result<Vec<String>, StorageError> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(StorageError::NotInitialized)?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT category FROM menu
             WHERE category IS NOT NULL
             ORDER BY category COLLATE NOCASE ASC",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Persisted items matching a category selection and a case-insensitive
    /// name substring, ordered by name ascending.
    ///
    /// An empty `categories` slice skips the category predicate; blank
    /// `search_text` skips the name predicate.
    pub fn filter(
        &self,
        categories: &[String],
        search_text: &str,
    ) -> Result<Vec<CatalogItem>, StorageError> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(StorageError::NotInitialized)?;

        let mut sql =
            String::from("SELECT id, name, description, price, image, category FROM menu");
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if !categories.is_empty() {
            let placeholders = vec!["?"; categories.len()].join(", ");
            clauses.push(format!("category IN ({})", placeholders));
            params.extend(categories.iter().cloned());
        }

        let needle = search_text.trim();
        if !needle.is_empty() {
            clauses.push("name LIKE ? ESCAPE '\\'".to_string());
            params.push(format!("%{}%", escape_like(needle)));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY name COLLATE NOCASE ASC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), Self::row_to_item)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Item count and last sync time, for display.
    pub fn status(&self) -> Result<StoreStatus, StorageError> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(StorageError::NotInitialized)?;
        let item_count: i64 = conn.query_row("SELECT COUNT(*) FROM menu", [], |row| row.get(0))?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM sync_meta WHERE key = 'last_synced_at'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let last_synced_at = value
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|dt| dt.with_timezone(&Utc));
        Ok(StoreStatus {
            item_count: item_count as usize,
            last_synced_at,
        })
    }

    fn row_to_item(row: &Row<'_>) -> rusqlite::Result<CatalogItem> {
        Ok(CatalogItem {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            image: row.get(4)?,
            category: row.get(5)?,
        })
    }
}

/// Escape LIKE metacharacters in user-supplied search text.
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Snapshot of the store's contents for status display.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStatus {
    pub item_count: usize,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl StoreStatus {
    pub fn age_minutes(&self) -> Option<i64> {
        self.last_synced_at.map(|at| (Utc::now() - at).num_minutes())
    }

    /// Whether the stored catalog is older than `STORE_STALE_MINUTES`.
    /// Advisory only; callers may use it to suggest a refresh.
    pub fn is_stale(&self) -> bool {
        match self.age_minutes() {
            Some(minutes) => minutes > STORE_STALE_MINUTES,
            None => true,
        }
    }

    pub fn age_display(&self) -> String {
        let minutes = match self.age_minutes() {
            Some(m) => m,
            None => return "never".to_string(),
        };
        if minutes < 1 {
            // Covers clock skew (negative ages) as well
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
