//! Persistent playlist backed by SQLite.
//!
//! One table, `songs (filename TEXT)`, holds the playlist in insertion order.
//! The implicit `rowid` identifies a specific entry, so duplicated paths can
//! be removed one at a time.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("playlist database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to prepare playlist directory: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored playlist row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: i64,
    pub path: PathBuf,
}

pub struct PlaylistStore {
    conn: Connection,
}

impl PlaylistStore {
    /// Open (or create) the playlist database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        run_migrations(&conn)?;
        log::debug!("playlist store opened at {}", db_path.display());
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Full scan of the playlist in insertion order.
    pub fn load(&self) -> Result<Vec<PlaylistEntry>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT rowid, filename FROM songs ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, filename) = row?;
            // Rows written by hand can have a NULL filename; they are not playable.
            if let Some(filename) = filename {
                entries.push(PlaylistEntry {
                    id,
                    path: PathBuf::from(filename),
                });
            }
        }
        Ok(entries)
    }

    /// Append `paths` to the end of the playlist. Returns how many rows were written.
    pub fn append<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, StoreError> {
        if paths.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO songs (filename) VALUES (?1)")?;
            for path in paths {
                stmt.execute(params![path.as_ref().to_string_lossy()])?;
            }
        }
        tx.commit()?;
        Ok(paths.len())
    }

    /// Delete the entry with row id `id`. Returns whether a row was removed.
    pub fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM songs WHERE rowid = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute("CREATE TABLE IF NOT EXISTS songs (filename TEXT)", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn paths(entries: &[PlaylistEntry]) -> Vec<PathBuf> {
        entries.iter().map(|e| e.path.clone()).collect()
    }

    #[test]
    fn append_then_load_preserves_order_and_duplicates() {
        let mut store = PlaylistStore::open_in_memory().unwrap();
        store.append(&["/music/b.mp3", "/music/a.mp3"]).unwrap();
        store.append(&["/music/b.mp3"]).unwrap();

        let entries = store.load().unwrap();
        assert_eq!(
            paths(&entries),
            vec![
                PathBuf::from("/music/b.mp3"),
                PathBuf::from("/music/a.mp3"),
                PathBuf::from("/music/b.mp3"),
            ]
        );
        assert!(entries.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn remove_deletes_only_the_given_row() {
        let mut store = PlaylistStore::open_in_memory().unwrap();
        store
            .append(&["/music/x.mp3", "/music/y.mp3", "/music/x.mp3"])
            .unwrap();
        let entries = store.load().unwrap();

        assert!(store.remove(entries[2].id).unwrap());
        assert!(!store.remove(entries[2].id).unwrap());

        assert_eq!(
            paths(&store.load().unwrap()),
            vec![PathBuf::from("/music/x.mp3"), PathBuf::from("/music/y.mp3")]
        );
    }

    #[test]
    fn append_empty_is_a_noop() {
        let mut store = PlaylistStore::open_in_memory().unwrap();
        let none: [&str; 0] = [];
        assert_eq!(store.append(&none).unwrap(), 0);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn open_creates_parent_dirs_and_persists_between_opens() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("nested").join("playlist.db");

        {
            let mut store = PlaylistStore::open(&db).unwrap();
            store.append(&["/music/keep.mp3"]).unwrap();
        }

        let store = PlaylistStore::open(&db).unwrap();
        assert_eq!(
            paths(&store.load().unwrap()),
            vec![PathBuf::from("/music/keep.mp3")]
        );
    }

    #[test]
    fn load_skips_null_filenames() {
        let store = PlaylistStore::open_in_memory().unwrap();
        store
            .conn
            .execute("INSERT INTO songs (filename) VALUES (NULL)", [])
            .unwrap();
        store
            .conn
            .execute("INSERT INTO songs (filename) VALUES ('/music/ok.mp3')", [])
            .unwrap();

        assert_eq!(
            paths(&store.load().unwrap()),
            vec![PathBuf::from("/music/ok.mp3")]
        );
    }
}
