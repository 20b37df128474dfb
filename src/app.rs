//! Application module: exposes the player model used by the UI and runtime.
//!
//! The `App` model lives in `app::model` and holds the playlist, the current
//! index and playback state.

mod model;

pub use model::*;
