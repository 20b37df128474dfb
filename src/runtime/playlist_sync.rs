//! Keeps the in-memory playlist a copy of the store after every change.

use std::path::Path;

use crate::app::App;
use crate::config::LibrarySettings;
use crate::library::load_tracks;
use crate::store::{PlaylistStore, StoreError};

/// Persist `paths` at the end of the playlist and rebuild it. Returns how many rows were added.
pub fn append<P: AsRef<Path>>(
    store: &mut PlaylistStore,
    app: &mut App,
    paths: &[P],
    library: &LibrarySettings,
) -> Result<usize, StoreError> {
    let added = store.append(paths)?;
    reload(store, app, library)?;
    Ok(added)
}

/// Delete the highlighted entry. The highlight survives a failed delete.
pub fn remove_current(
    store: &mut PlaylistStore,
    app: &mut App,
    library: &LibrarySettings,
) -> Result<bool, StoreError> {
    let Some(id) = app.current_row_id() else {
        return Ok(false);
    };
    let removed = store.remove(id)?;
    if !removed {
        log::warn!("playlist row {id} was already gone");
    }
    app.current = None;
    reload(store, app, library)?;
    Ok(removed)
}

pub fn reload(
    store: &PlaylistStore,
    app: &mut App,
    library: &LibrarySettings,
) -> Result<(), StoreError> {
    let entries = store.load()?;
    app.set_tracks(load_tracks(&entries, library));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Instant;

    fn assert_mirrors(store: &PlaylistStore, app: &App) {
        let stored: Vec<(i64, PathBuf)> = store
            .load()
            .unwrap()
            .into_iter()
            .map(|e| (e.id, e.path))
            .collect();
        let shown: Vec<(i64, PathBuf)> = app
            .tracks
            .iter()
            .map(|t| (t.id, t.path.clone()))
            .collect();
        assert_eq!(shown, stored);
    }

    #[test]
    fn add_and_remove_keep_the_list_in_step_with_the_store() {
        let mut store = PlaylistStore::open_in_memory().unwrap();
        let mut app = App::new(Vec::new());
        let library = LibrarySettings::default();

        let added = append(
            &mut store,
            &mut app,
            &["/music/a.mp3", "/music/b.mp3", "/music/a.mp3"],
            &library,
        )
        .unwrap();
        assert_eq!(added, 3);
        assert_mirrors(&store, &app);

        app.current = Some(2);
        let duplicate = app.current_row_id();
        assert!(remove_current(&mut store, &mut app, &library).unwrap());
        assert_mirrors(&store, &app);
        assert_eq!(app.current, None);
        assert_eq!(app.tracks.len(), 2);
        assert!(app.tracks.iter().all(|t| Some(t.id) != duplicate));
        assert_eq!(app.tracks[0].path, PathBuf::from("/music/a.mp3"));

        assert!(!remove_current(&mut store, &mut app, &library).unwrap());
        assert_mirrors(&store, &app);
    }

    #[test]
    fn failed_delete_keeps_list_and_highlight() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("playlist.db");
        let mut store = PlaylistStore::open(&db).unwrap();
        let mut app = App::new(Vec::new());
        let library = LibrarySettings::default();
        append(&mut store, &mut app, &["/music/a.mp3", "/music/b.mp3"], &library).unwrap();
        app.play(1, Instant::now());

        rusqlite::Connection::open(&db)
            .unwrap()
            .execute("DROP TABLE songs", [])
            .unwrap();

        assert!(remove_current(&mut store, &mut app, &library).is_err());
        assert_eq!(app.current, Some(1));
        assert_eq!(app.tracks.len(), 2);
    }
}
