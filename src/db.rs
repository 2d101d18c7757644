use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

/// Idempotent bootstrap DDL, safe to re-run on every process start.
///
/// The trigger refreshes `updated_at` on every UPDATE to a row, even
/// when the written values equal the stored ones.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT DEFAULT '',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TRIGGER IF NOT EXISTS trg_items_updated_at
AFTER UPDATE ON items
FOR EACH ROW BEGIN
    UPDATE items SET updated_at = CURRENT_TIMESTAMP WHERE id = OLD.id;
END;
"#;

/// A single item row with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const ITEM_COLUMNS: &str = "id, title, description, created_at, updated_at";

fn item_from_row(row: &Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        // SQLite CURRENT_TIMESTAMP stores UTC without an offset marker
        created_at: row.get::<_, NaiveDateTime>("created_at")?.and_utc(),
        updated_at: row.get::<_, NaiveDateTime>("updated_at")?.and_utc(),
    })
}

/// Shareable SQLite-backed item store for use across async handlers
///
/// Wraps one long-lived connection opened at startup; all requests go
/// through it for the life of the process. SQLite serializes writers
/// itself, so no extra locking is layered on top.
#[derive(Clone)]
pub struct ItemStore {
    conn: Connection,
}

impl ItemStore {
    /// Open (creating if absent) the database file and run the bootstrap
    ///
    /// Enables write-ahead logging so readers are not blocked during a
    /// writer transaction, then ensures the `items` table and its
    /// update-timestamp trigger exist. A failure here (e.g. unwritable
    /// path) is fatal and aborts startup.
    pub async fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .with_context(|| format!("Failed to open database file: {}", path))?;

        conn.call(|conn| {
            conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .context("Failed to bootstrap items schema")?;

        tracing::info!("Opened SQLite database: {}", path);
        Ok(Self { conn })
    }

    /// Insert a new item and return the stored row
    ///
    /// `title` is expected to be trimmed and non-empty already (the
    /// create handler validates this). The row is re-read by its newly
    /// assigned id so the returned item carries the real timestamps.
    pub async fn insert(&self, title: String, description: String) -> Result<Item> {
        let item = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO items (title, description) VALUES (?1, ?2)",
                    params![title, description],
                )?;
                let id = conn.last_insert_rowid();
                let item = conn.query_row(
                    &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
                    params![id],
                    item_from_row,
                )?;
                Ok(item)
            })
            .await
            .context("Failed to insert item")?;

        tracing::debug!("Inserted item with id: {}", item.id);
        Ok(item)
    }

    /// List items, newest first, with optional substring filter
    ///
    /// A non-empty `q` matches rows whose title or description contains
    /// it as a substring. SQLite's default LIKE collation applies, so
    /// the match is case-insensitive for ASCII. `limit` and `offset`
    /// arrive pre-clamped by the query layer.
    pub async fn list(&self, q: String, limit: i64, offset: i64) -> Result<Vec<Item>> {
        let items = self
            .conn
            .call(move |conn| {
                let items = if q.is_empty() {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM items ORDER BY id DESC LIMIT ?1 OFFSET ?2",
                        ITEM_COLUMNS
                    ))?;
                    stmt.query_map(params![limit, offset], item_from_row)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                } else {
                    let pattern = format!("%{}%", q);
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM items WHERE title LIKE ?1 OR description LIKE ?1 \
                         ORDER BY id DESC LIMIT ?2 OFFSET ?3",
                        ITEM_COLUMNS
                    ))?;
                    stmt.query_map(params![pattern, limit, offset], item_from_row)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                };
                Ok(items)
            })
            .await
            .context("Failed to list items")?;

        Ok(items)
    }

    /// Read an item by id, `None` when no such row exists
    pub async fn get(&self, id: i64) -> Result<Option<Item>> {
        let item = self
            .conn
            .call(move |conn| {
                let item = conn
                    .query_row(
                        &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
                        params![id],
                        item_from_row,
                    )
                    .optional()?;
                Ok(item)
            })
            .await
            .context("Failed to read item")?;

        Ok(item)
    }

    /// Partially update an item, returning the post-update row
    ///
    /// Returns `Ok(None)` without writing when the id does not exist.
    /// A present, non-empty-after-trim `title` overrides the stored one;
    /// a whitespace-only or absent title keeps it. Any present
    /// `description`, empty string included, overrides. Both columns are
    /// written unconditionally so the trigger refreshes `updated_at`
    /// even when the values are unchanged.
    pub async fn update(
        &self,
        id: i64,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Option<Item>> {
        let item = self
            .conn
            .call(move |conn| {
                let existing = conn
                    .query_row(
                        &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
                        params![id],
                        item_from_row,
                    )
                    .optional()?;

                let Some(existing) = existing else {
                    return Ok(None);
                };

                let new_title = match title.as_deref().map(str::trim) {
                    Some(t) if !t.is_empty() => t.to_string(),
                    _ => existing.title,
                };
                let new_description = description.unwrap_or(existing.description);

                conn.execute(
                    "UPDATE items SET title = ?1, description = ?2 WHERE id = ?3",
                    params![new_title, new_description, id],
                )?;

                let updated = conn.query_row(
                    &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
                    params![id],
                    item_from_row,
                )?;
                Ok(Some(updated))
            })
            .await
            .context("Failed to update item")?;

        if item.is_some() {
            tracing::debug!("Updated item with id: {}", id);
        }
        Ok(item)
    }

    /// Hard-delete an item, `false` when no row was affected
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .call(move |conn| {
                let affected = conn.execute("DELETE FROM items WHERE id = ?1", params![id])?;
                Ok(affected)
            })
            .await
            .context("Failed to delete item")?;

        if affected > 0 {
            tracing::debug!("Deleted item with id: {}", id);
        }
        Ok(affected > 0)
    }

    /// Lightweight liveness query used by the health endpoint
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .context("Failed to execute health check query")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_test_store() -> (TempDir, ItemStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.sqlite");
        let store = ItemStore::open(path.to_str().unwrap()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.sqlite");
        let path = path.to_str().unwrap();

        let store = ItemStore::open(path).await.unwrap();
        store.insert("first".to_string(), "".to_string()).await.unwrap();
        drop(store);

        // Re-opening the same file must not fail or lose data
        let store = ItemStore::open(path).await.unwrap();
        let items = store.list("".to_string(), 20, 0).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "first");
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (_dir, store) = open_test_store().await;

        let created = store
            .insert("Buy milk".to_string(), "".to_string())
            .await
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.title, "Buy milk");
        assert_eq!(created.description, "");
        assert!(created.updated_at >= created.created_at);

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));

        let missing = store.get(999999).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_list_orders_by_descending_id() {
        let (_dir, store) = open_test_store().await;

        let a = store.insert("a".to_string(), "".to_string()).await.unwrap();
        let b = store.insert("b".to_string(), "".to_string()).await.unwrap();
        let c = store.insert("c".to_string(), "".to_string()).await.unwrap();

        let items = store.list("".to_string(), 20, 0).await.unwrap();
        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn test_list_substring_filter() {
        let (_dir, store) = open_test_store().await;

        store
            .insert("Buy milk".to_string(), "".to_string())
            .await
            .unwrap();
        store
            .insert("Walk dog".to_string(), "before the milk run".to_string())
            .await
            .unwrap();
        store
            .insert("Pay rent".to_string(), "".to_string())
            .await
            .unwrap();

        let items = store.list("milk".to_string(), 20, 0).await.unwrap();
        assert_eq!(items.len(), 2, "matches in title or description");
        assert!(items.windows(2).all(|w| w[0].id > w[1].id));

        let items = store.list("nothing-here".to_string(), 20, 0).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let (_dir, store) = open_test_store().await;

        for i in 0..5 {
            store
                .insert(format!("item {}", i), "".to_string())
                .await
                .unwrap();
        }

        let page = store.list("".to_string(), 2, 0).await.unwrap();
        assert_eq!(page.len(), 2);

        let page = store.list("".to_string(), 2, 4).await.unwrap();
        assert_eq!(page.len(), 1);

        let page = store.list("".to_string(), 2, 10).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_update_overrides_and_keeps_fields() {
        let (_dir, store) = open_test_store().await;

        let created = store
            .insert("original".to_string(), "desc".to_string())
            .await
            .unwrap();

        // Absent fields keep the stored values
        let updated = store.update(created.id, None, None).await.unwrap().unwrap();
        assert_eq!(updated.title, "original");
        assert_eq!(updated.description, "desc");

        // Whitespace-only title keeps the stored title
        let updated = store
            .update(created.id, Some("   ".to_string()), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "original");

        // Non-empty title is trimmed and overrides; empty description overrides
        let updated = store
            .update(
                created.id,
                Some("  new title  ".to_string()),
                Some("".to_string()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "new title");
        assert_eq!(updated.description, "");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_id_does_not_write() {
        let (_dir, store) = open_test_store().await;

        let result = store
            .update(424242, Some("ghost".to_string()), None)
            .await
            .unwrap();
        assert_eq!(result, None);

        let items = store.list("".to_string(), 20, 0).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, store) = open_test_store().await;

        let created = store.insert("doomed".to_string(), "".to_string()).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert_eq!(store.get(created.id).await.unwrap(), None);

        // Second delete affects no rows
        assert!(!store.delete(created.id).await.unwrap());
        assert!(!store.delete(999999).await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let (_dir, store) = open_test_store().await;

        let first = store.insert("first".to_string(), "".to_string()).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());

        let second = store.insert("second".to_string(), "".to_string()).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_ping() {
        let (_dir, store) = open_test_store().await;
        store.ping().await.unwrap();
    }

    #[test]
    fn test_store_is_clonable_send_sync() {
        // Required for sharing across Axum handlers
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<ItemStore>();
        assert_send_sync::<ItemStore>();
    }
}
