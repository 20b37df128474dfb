use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};

use crate::config::LibrarySettings;
use crate::store::PlaylistEntry;

use super::display::display_from_fields;

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Row id of the playlist entry this track came from.
    pub id: i64,
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub display: String,
}

impl Track {
    /// Build a track for `path`, reading tags when the file is readable.
    pub fn load(id: i64, path: &Path, settings: &LibrarySettings) -> Self {
        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist: Option<String> = None;
        let mut album: Option<String> = None;
        let mut duration: Option<Duration> = None;

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());

                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.title().map(|v| v.trim().to_string()) {
                        if !v.is_empty() {
                            title = v;
                        }
                    }
                    artist = tag
                        .artist()
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty());
                    album = tag
                        .album()
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty());
                }
            }
            Err(e) => log::debug!("no readable tags in {}: {e}", path.display()),
        }

        let display = display_from_fields(
            path,
            &title,
            artist.as_deref(),
            album.as_deref(),
            &settings.display_fields,
            &settings.display_separator,
        );

        Self {
            id,
            path: path.to_path_buf(),
            title,
            artist,
            album,
            duration,
            display,
        }
    }
}

/// Rebuild the in-memory playlist from stored entries, keeping their order.
pub fn load_tracks(entries: &[PlaylistEntry], settings: &LibrarySettings) -> Vec<Track> {
    entries
        .iter()
        .map(|e| Track::load(e.id, &e.path, settings))
        .collect()
}
