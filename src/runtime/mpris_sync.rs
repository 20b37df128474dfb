use crate::app::{App, PlaybackState};
use crate::mpris::MprisHandle;

/// Last values pushed to MPRIS, so unchanged frames skip the update.
#[derive(Debug, Default)]
pub struct MprisSync {
    last_token: Option<u64>,
    last_playback: PlaybackState,
}

impl MprisSync {
    /// Return true when `app` differs from what was last published.
    pub fn needs_update(&mut self, app: &App) -> bool {
        let token = Some(app.load_token());
        if token == self.last_token && app.playback == self.last_playback {
            return false;
        }
        self.last_token = token;
        self.last_playback = app.playback;
        true
    }
}

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    mpris.set_track_metadata(app.now_playing.as_ref());
    mpris.set_playback(app.playback);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn updates_only_when_track_or_state_changes() {
        let mut app = App::new(Vec::new());
        let mut sync = MprisSync::default();

        assert!(sync.needs_update(&app), "first frame always publishes");
        assert!(!sync.needs_update(&app));

        app.playback = PlaybackState::Paused;
        assert!(sync.needs_update(&app));
        assert!(!sync.needs_update(&app));

        app.seek_to(std::time::Duration::ZERO, Instant::now());
        assert!(!sync.needs_update(&app), "seek without a track is a no-op");
    }
}
