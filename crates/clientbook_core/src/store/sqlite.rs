//! SQLite-backed collection snapshot store.
//!
//! # Responsibility
//! - Persist one JSON array snapshot per named collection in the
//!   `collections` table, overwriting on every save.
//!
//! # Invariants
//! - Construction rejects connections whose schema has not been migrated.
//! - `updated_at` is refreshed on every overwrite (informational only).

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::migrations::latest_version;
use crate::store::{CollectionStore, StoreError, StoreResult};

/// Durable collection store over a migrated SQLite connection.
pub struct SqliteCollectionStore {
    conn: Connection,
}

impl SqliteCollectionStore {
    /// Wraps a connection produced by `db::open_db` / `db::open_db_in_memory`.
    ///
    /// # Errors
    /// - `StoreError::UninitializedDb` when the connection's schema version
    ///   does not match this binary's migrations.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedDb {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl CollectionStore for SqliteCollectionStore {
    fn save(&self, collection: &str, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO collections (name, payload, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![collection, payload],
        )?;
        Ok(())
    }

    fn load(&self, collection: &str) -> StoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM collections WHERE name = ?1;",
                params![collection],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteCollectionStore;
    use crate::db::open_db_in_memory;
    use crate::store::{CollectionStore, StoreError};
    use rusqlite::Connection;

    #[test]
    fn save_overwrites_previous_snapshot() {
        let store = SqliteCollectionStore::try_new(open_db_in_memory().unwrap()).unwrap();

        store.save("companies", "[1]").unwrap();
        store.save("companies", "[1,2]").unwrap();

        assert_eq!(store.load("companies").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn load_of_unknown_collection_is_none() {
        let store = SqliteCollectionStore::try_new(open_db_in_memory().unwrap()).unwrap();
        assert!(store.load("never-saved").unwrap().is_none());
    }

    #[test]
    fn rejects_unmigrated_connections() {
        let conn = Connection::open_in_memory().unwrap();
        let result = SqliteCollectionStore::try_new(conn);
        assert!(matches!(
            result,
            Err(StoreError::UninitializedDb {
                actual_version: 0,
                ..
            })
        ));
    }
}
