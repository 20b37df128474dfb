use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config;
use crate::library::{is_audio_file, scan};

pub fn apply_playback_defaults(app: &mut App, audio_player: &AudioPlayer, settings: &config::Settings) {
    app.repeat = settings.playback.repeat;
    app.volume_step = settings.audio.volume_step;
    app.seek_grace = Duration::from_millis(settings.playback.seek_grace_ms);

    let cmd = app.set_volume(settings.audio.volume);
    let _ = audio_player.send(cmd);
}

/// Expand command-line arguments into audio files: folders are scanned,
/// files are kept when their extension is a configured audio type.
pub fn collect_paths<I, P>(args: I, library: &config::LibrarySettings) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut out = Vec::new();
    for arg in args {
        let path = arg.as_ref();
        if path.is_dir() {
            out.extend(scan(path, library));
        } else if path.is_file() && is_audio_file(path, library) {
            out.push(path.to_path_buf());
        } else {
            log::warn!("ignoring {}: not an audio file or folder", path.display());
        }
    }
    out
}
