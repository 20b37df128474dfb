use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// Whether `path` has one of the configured audio extensions (case-insensitive).
pub fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    settings.extensions.iter().any(|wanted| {
        let wanted = wanted.trim().trim_start_matches('.');
        !wanted.is_empty() && wanted.eq_ignore_ascii_case(ext)
    })
}

fn is_dotfile(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Collect the audio files under `dir`, sorted by path.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Depth 1 is the picked folder's own files.
    let max_depth = match settings.recursive {
        true => settings.max_depth,
        false => Some(1),
    };
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut found: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_dotfile(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_audio_file(p, settings))
        .collect();

    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Music/
    ///   intro.FLAC, notes.txt, .cover.mp3
    ///   Artist/Album/01 - song.mp3, 02 - song.ogg, folder.jpg
    ///   Artist/Album/Disc 2/01 - bonus.wav
    ///   .trash/old.mp3
    fn music_folder() -> TempDir {
        let root = tempfile::tempdir().unwrap();
        let album = root.path().join("Artist").join("Album");
        let disc2 = album.join("Disc 2");
        let trash = root.path().join(".trash");
        fs::create_dir_all(&disc2).unwrap();
        fs::create_dir_all(&trash).unwrap();

        for file in [
            root.path().join("intro.FLAC"),
            root.path().join("notes.txt"),
            root.path().join(".cover.mp3"),
            album.join("01 - song.mp3"),
            album.join("02 - song.ogg"),
            album.join("folder.jpg"),
            disc2.join("01 - bonus.wav"),
            trash.join("old.mp3"),
        ] {
            fs::write(file, b"").unwrap();
        }
        root
    }

    fn relative(root: &TempDir, found: Vec<PathBuf>) -> Vec<String> {
        found
            .iter()
            .map(|p| p.strip_prefix(root.path()).unwrap().display().to_string())
            .collect()
    }

    #[test]
    fn extension_match_ignores_case_and_leading_dot() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("Song.Mp3"), &settings));
        assert!(is_audio_file(Path::new("/x/y.WAV"), &settings));
        assert!(!is_audio_file(Path::new("/x/cover.jpg"), &settings));
        assert!(!is_audio_file(Path::new("/x/README"), &settings));

        let custom = LibrarySettings {
            extensions: vec![".Opus".into(), "".into()],
            ..LibrarySettings::default()
        };
        assert!(is_audio_file(Path::new("a.opus"), &custom));
        assert!(!is_audio_file(Path::new("a.mp3"), &custom));
        assert!(!is_audio_file(Path::new("a."), &custom));
    }

    #[test]
    fn whole_tree_is_scanned_in_path_order_without_dotfiles() {
        let root = music_folder();
        let found = relative(&root, scan(root.path(), &LibrarySettings::default()));
        assert_eq!(
            found,
            vec![
                "Artist/Album/01 - song.mp3",
                "Artist/Album/02 - song.ogg",
                "Artist/Album/Disc 2/01 - bonus.wav",
                "intro.FLAC",
            ]
        );
    }

    #[test]
    fn dotfiles_are_included_on_request() {
        let root = music_folder();
        let settings = LibrarySettings {
            include_hidden: true,
            ..LibrarySettings::default()
        };
        let found = relative(&root, scan(root.path(), &settings));
        assert!(found.contains(&".cover.mp3".to_string()));
        assert!(found.contains(&".trash/old.mp3".to_string()));
        assert_eq!(found.len(), 6);
    }

    #[test]
    fn flat_scan_stays_in_the_picked_folder() {
        let root = music_folder();
        let settings = LibrarySettings {
            recursive: false,
            max_depth: Some(10),
            ..LibrarySettings::default()
        };
        assert_eq!(relative(&root, scan(root.path(), &settings)), vec!["intro.FLAC"]);
    }

    #[test]
    fn depth_limit_cuts_off_nested_discs() {
        let root = music_folder();
        let settings = LibrarySettings {
            max_depth: Some(3),
            ..LibrarySettings::default()
        };
        let found = relative(&root, scan(root.path(), &settings));
        assert_eq!(found.len(), 3);
        assert!(!found.iter().any(|p| p.contains("Disc 2")));
    }
}
