//! Track metadata, folder scanning, and embedded cover art.
//!
//! Tracks are built from stored playlist paths; tags are read with `lofty`
//! and anything unreadable degrades to file-name based defaults.

mod art;
mod display;
mod model;
mod scan;

pub use art::{cover_art, decode_art, placeholder};
pub use display::display_from_fields;
pub use model::{Track, load_tracks};
pub use scan::{is_audio_file, scan};

#[cfg(test)]
mod tests;
