//! Playback engine.
//!
//! A dedicated thread owns the `rodio` output stream and at most one sink.
//! It executes `AudioCmd`s, publishes its position through a shared
//! `PlaybackInfo`, and reports `AudioEvent`s back; deciding what plays next
//! is left to the caller.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, AudioEvent, PlaybackInfo};
