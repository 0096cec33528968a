//! SQLite-backed key-value store via libsql. Implements KeyValueStore.
//!
//! Single `kv` table keyed by the session key. Expiry is stored as unix
//! milliseconds and enforced on read; expired rows are purged at startup.

use crate::domain::DomainError;
use crate::ports::KeyValueStore;
use libsql::{Connection, Database, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const KV_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    expires_at INTEGER
)"#;
const KV_EXPIRY_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_kv_expires ON kv (expires_at)";
/// Concurrent writers wait this long for the file lock instead of failing.
const BUSY_TIMEOUT: &str = "PRAGMA busy_timeout = 5000";

fn store_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Store(e.to_string())
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Expiry for a TTL starting now. `None` when it does not fit in unix millis.
fn expiry_millis(ttl: Duration) -> Option<i64> {
    i64::try_from(ttl.as_millis())
        .ok()
        .and_then(|ms| now_millis().checked_add(ms))
}

/// SQLite key-value store. One database file shared by all sessions; each
/// operation opens its own connection.
pub struct SqliteStore {
    db: Database,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema exists.
    /// Call this once at startup; the returned store is safe to share via Arc.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(store_err)?;
        }
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(store_err)?;
        let conn = db.connect().map_err(store_err)?;

        // PRAGMA returns a row; use query and drain it (execute fails when rows are returned).
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| DomainError::Store(format!("WAL pragma failed: {}", e)))?;
        while wal_rows.next().await.map_err(store_err)?.is_some() {}

        conn.execute(KV_TABLE, ()).await.map_err(store_err)?;
        conn.execute(KV_EXPIRY_INDEX, ()).await.map_err(store_err)?;

        let store = Self { db, db_path };
        let purged = store.purge_expired().await?;
        info!(
            path = %store.db_path.display(),
            purged,
            "SQLite session store ready"
        );
        Ok(store)
    }

    async fn conn(&self) -> Result<Connection, DomainError> {
        let conn = self.db.connect().map_err(store_err)?;
        let mut rows = conn.query(BUSY_TIMEOUT, ()).await.map_err(store_err)?;
        while rows.next().await.map_err(store_err)?.is_some() {}
        Ok(conn)
    }

    /// Delete rows whose TTL has passed. Returns how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, DomainError> {
        let conn = self.conn().await?;
        conn.execute(
            "DELETE FROM kv WHERE expires_at IS NOT NULL AND expires_at <= ?1",
            params![now_millis()],
        )
        .await
        .map_err(store_err)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let conn = self.conn().await?;
        let mut rows = conn
            .query(
                r#"
                SELECT value FROM kv
                WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)
                "#,
                params![key, now_millis()],
            )
            .await
            .map_err(store_err)?;

        match rows.next().await.map_err(store_err)? {
            Some(row) => Ok(Some(row.get::<String>(0).map_err(store_err)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), DomainError> {
        // A TTL past the representable range never expires.
        let expires_at: Option<i64> = ttl.and_then(expiry_millis);
        let conn = self.conn().await?;
        conn.execute(
            r#"
            INSERT INTO kv (key, value, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at
            "#,
            params![key, value, expires_at],
        )
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let conn = self.conn().await?;
        let mut rows = conn.query("SELECT 1", ()).await.map_err(store_err)?;
        while rows.next().await.map_err(store_err)?.is_some() {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_store_roundtrip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::connect(dir.path().join("budget.db"))
            .await
            .unwrap();
        store.ping().await.unwrap();

        assert_eq!(store.get("budget:user:a").await.unwrap(), None);
        store.set("budget:user:a", "{}", None).await.unwrap();
        store
            .set("budget:user:a", r#"{"transactions":[]}"#, None)
            .await
            .unwrap();
        assert_eq!(
            store.get("budget:user:a").await.unwrap().as_deref(),
            Some(r#"{"transactions":[]}"#)
        );
        assert_eq!(store.get("budget:user:b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_store_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::connect(dir.path().join("nested/budget.db"))
            .await
            .unwrap();

        store
            .set("gone", "v", Some(Duration::from_millis(5)))
            .await
            .unwrap();
        store
            .set("kept", "v", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;

        assert_eq!(store.get("gone").await.unwrap(), None);
        assert_eq!(store.get("kept").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.purge_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_store_huge_ttl_never_expires() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::connect(dir.path().join("budget.db"))
            .await
            .unwrap();

        store.set("k", "v", Some(Duration::MAX)).await.unwrap();
        store
            .set("near", "v", Some(Duration::from_millis(i64::MAX as u64)))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.get("near").await.unwrap().as_deref(), Some("v"));
        assert_eq!(expiry_millis(Duration::MAX), None);
    }

    #[tokio::test]
    async fn test_sqlite_store_concurrent_writers() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(
            SqliteStore::connect(dir.path().join("budget.db"))
                .await
                .unwrap(),
        );
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.set(&format!("k{}", i), "v", None).await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        for i in 0..8 {
            assert!(store.get(&format!("k{}", i)).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.db");
        {
            let store = SqliteStore::connect(&path).await.unwrap();
            store.set("k", "v", None).await.unwrap();
        }
        let store = SqliteStore::connect(&path).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
