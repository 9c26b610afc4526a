//! Favorites persistence.
//!
//! A small SQLite store holding the user's favorite dragon ids. The
//! visualization core never depends on this; only the shell reads and
//! writes it.

use drakonomi_core::DragonId;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const TABLE_STATEMENTS: &[&str] = &["CREATE TABLE IF NOT EXISTS favorite (
        dragon_id INTEGER PRIMARY KEY
    )"];

pub struct FavoritesStore {
    conn: Connection,
}

impl FavoritesStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        // Avoid flaky "database is locked" errors if two shell instances
        // touch the same profile.
        let _ = conn.busy_timeout(Duration::from_millis(2_500));
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let _ = conn.pragma_update(None, "synchronous", "NORMAL");
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn new_in_memory() -> Result<Self, StorageError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<(), StorageError> {
        for statement in TABLE_STATEMENTS {
            self.conn.execute(statement, [])?;
        }
        Ok(())
    }

    pub fn add(&self, id: DragonId) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO favorite (dragon_id) VALUES (?1)",
            params![id.0 as i64],
        )?;
        Ok(())
    }

    pub fn remove(&self, id: DragonId) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM favorite WHERE dragon_id = ?1",
            params![id.0 as i64],
        )?;
        Ok(())
    }

    /// Flip membership; returns whether the id is a favorite afterwards.
    pub fn toggle(&self, id: DragonId) -> Result<bool, StorageError> {
        if self.contains(id)? {
            self.remove(id)?;
            Ok(false)
        } else {
            self.add(id)?;
            Ok(true)
        }
    }

    pub fn contains(&self, id: DragonId) -> Result<bool, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM favorite WHERE dragon_id = ?1",
            params![id.0 as i64],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn all(&self) -> Result<HashSet<DragonId>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT dragon_id FROM favorite")?;
        let mut favorites = HashSet::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let raw: i64 = row.get(0)?;
            favorites.insert(DragonId(raw as u64));
        }
        Ok(favorites)
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM favorite", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let store = FavoritesStore::new_in_memory().unwrap();

        assert!(!store.contains(DragonId(7)).unwrap());
        assert!(store.toggle(DragonId(7)).unwrap());
        assert!(store.contains(DragonId(7)).unwrap());
        assert!(!store.toggle(DragonId(7)).unwrap());
        assert!(!store.contains(DragonId(7)).unwrap());
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = FavoritesStore::new_in_memory().unwrap();
        store.add(DragonId(1)).unwrap();
        store.add(DragonId(1)).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_all_returns_every_favorite() {
        let store = FavoritesStore::new_in_memory().unwrap();
        store.add(DragonId(1)).unwrap();
        store.add(DragonId(2)).unwrap();
        store.add(DragonId(9)).unwrap();
        store.remove(DragonId(2)).unwrap();

        let favorites = store.all().unwrap();
        assert_eq!(
            favorites,
            [DragonId(1), DragonId(9)].into_iter().collect()
        );
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.db");

        {
            let store = FavoritesStore::open(&path).unwrap();
            store.add(DragonId(3)).unwrap();
        }

        let reopened = FavoritesStore::open(&path).unwrap();
        assert!(reopened.contains(DragonId(3)).unwrap());
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
