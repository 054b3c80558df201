//! Persistent availability cache backed by SQLite.
//!
//! One table, keyed by domain. Entries are only ever inserted or overwritten;
//! nothing here deletes or expires them.

use crate::error::DomainSieveError;
use crate::types::{CacheEntry, Domain};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS domain_cache (
    domain TEXT PRIMARY KEY,
    available INTEGER NOT NULL,
    checked_at INTEGER NOT NULL
)";

/// Handle to the `domain_cache` table.
///
/// Opened once per process and passed explicitly to whoever needs it.
pub struct CacheStore {
    conn: Connection,
}

impl CacheStore {
    /// Open (or create) the cache database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DomainSieveError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            DomainSieveError::store(format!("Failed to open {}: {}", path.display(), e))
        })?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let store = Self::from_connection(conn)?;
        info!("Domain cache opened at {}", path.display());
        Ok(store)
    }

    /// Open a throwaway in-memory cache.
    pub fn open_in_memory() -> Result<Self, DomainSieveError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DomainSieveError> {
        conn.execute(CREATE_TABLE, [])?;
        Ok(Self { conn })
    }

    /// Look up the cached entry for `domain`.
    pub fn get(&self, domain: &Domain) -> Result<Option<CacheEntry>, DomainSieveError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT domain, available, checked_at FROM domain_cache WHERE domain = ?1",
        )?;
        let entry = stmt
            .query_row(params![domain.as_str()], row_to_entry)
            .optional()?;
        Ok(entry)
    }

    /// Insert or overwrite the entry for `domain`, stamped with the current time.
    ///
    /// A single statement writes both columns, so readers never see a new
    /// availability with an old timestamp or the reverse.
    pub fn upsert(&self, domain: &Domain, available: bool) -> Result<CacheEntry, DomainSieveError> {
        self.upsert_at(domain, available, now_millis())
    }

    pub(crate) fn upsert_at(
        &self,
        domain: &Domain,
        available: bool,
        checked_at: i64,
    ) -> Result<CacheEntry, DomainSieveError> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO domain_cache (domain, available, checked_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(domain) DO UPDATE SET
                available = excluded.available,
                checked_at = excluded.checked_at
             RETURNING domain, available, checked_at",
        )?;
        let entry = stmt.query_row(params![domain.as_str(), available, checked_at], row_to_entry)?;
        debug!("Cached {} (available: {})", entry.domain, entry.available);
        Ok(entry)
    }

    /// Number of cached domains.
    pub fn len(&self) -> Result<usize, DomainSieveError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM domain_cache", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, DomainSieveError> {
        Ok(self.len()? == 0)
    }
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<CacheEntry> {
    let raw: String = row.get(0)?;
    let domain = Domain::parse(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(CacheEntry {
        domain,
        available: row.get(1)?,
        checked_at: row.get(2)?,
    })
}

/// Current time in Unix epoch milliseconds.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
