//! MPRIS2 service so media keys and `playerctl` can drive the player.
//!
//! The D-Bus object lives on its own thread. Method calls are forwarded as
//! `ControlCmd`s over a channel drained by the UI loop; properties are read
//! from a small shared state that the UI loop keeps current.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::app::PlaybackState;
use crate::library::Track;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.encore";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Raise,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    /// Publish the loaded track, or clear the metadata when `track` is `None`.
    /// The track id is derived from the store row id so duplicates stay distinct.
    pub fn set_track_metadata(&self, track: Option<&Track>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };

        match track {
            Some(t) => {
                s.title = Some(t.title.clone());
                s.artist = t.artist.iter().cloned().collect();
                s.album = t.album.clone();
                s.url = Some(format!("file://{}", t.path.display()));
                s.length_micros = t
                    .duration
                    .and_then(|d| i64::try_from(d.as_micros()).ok());
                s.track_id = track_object_path(t.id);
            }
            None => {
                s.title = None;
                s.artist.clear();
                s.album = None;
                s.url = None;
                s.length_micros = None;
                s.track_id = None;
            }
        }
    }
}

fn track_object_path(id: i64) -> Option<OwnedObjectPath> {
    ObjectPath::try_from(format!("{OBJECT_PATH}/track/{id}"))
        .ok()
        .map(OwnedObjectPath::from)
}

fn owned<'a>(value: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(value.into()).ok()
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        let _ = self.tx.send(ControlCmd::Raise);
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "Encore"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Option<OwnedValue>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };

        put(
            "mpris:trackid",
            s.track_id
                .as_ref()
                .and_then(|p| owned(p.clone().into_inner())),
        );
        put("xesam:title", s.title.clone().and_then(owned));
        if !s.artist.is_empty() {
            put("xesam:artist", owned(s.artist.clone()));
        }
        put("xesam:album", s.album.clone().and_then(owned));
        put("xesam:url", s.url.clone().and_then(owned));
        put("mpris:length", s.length_micros.and_then(owned));

        map
    }
}

/// Register the MPRIS service on a background thread. Bus failures are logged
/// and leave the returned handle working as a no-op sink for updates.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    let spawned = std::thread::Builder::new()
        .name("mpris".into())
        .spawn(move || {
            block_on(async move {
                let connection = match Connection::session().await {
                    Ok(c) => c,
                    Err(e) => {
                        log::warn!("MPRIS: failed to connect to session bus: {e}");
                        return;
                    }
                };

                if let Err(e) = connection.request_name(BUS_NAME).await {
                    log::warn!("MPRIS: failed to acquire {BUS_NAME}: {e}");
                    return;
                }

                let object_server = connection.object_server();

                if let Err(e) = object_server
                    .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                    .await
                {
                    log::warn!("MPRIS: failed to register root iface: {e}");
                    return;
                }

                if let Err(e) = object_server
                    .at(
                        OBJECT_PATH,
                        PlayerIface {
                            tx,
                            state: state_for_thread,
                        },
                    )
                    .await
                {
                    log::warn!("MPRIS: failed to register player iface: {e}");
                    return;
                }

                log::info!("MPRIS: registered as {BUS_NAME}");

                // Keep the connection alive.
                loop {
                    Timer::after(std::time::Duration::from_secs(3600)).await;
                }
            });
        });

    if let Err(e) = spawned {
        log::warn!("MPRIS: failed to spawn service thread: {e}");
    }

    MprisHandle { state }
}
