use std::path::Path;

use crate::config::TrackDisplayField;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// This composes metadata fields in the configured order and falls back to
/// `title` when no parts were produced.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    let non_empty = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                parts.extend(non_empty(artist));
                parts.extend(non_empty(Some(title)));
            }
            TrackDisplayField::Title => parts.extend(non_empty(Some(title))),
            TrackDisplayField::Artist => parts.extend(non_empty(artist)),
            TrackDisplayField::Album => parts.extend(non_empty(album)),
            TrackDisplayField::Filename => {
                parts.extend(non_empty(path.file_name().and_then(|s| s.to_str())));
            }
            TrackDisplayField::Stem => {
                parts.extend(non_empty(path.file_stem().and_then(|s| s.to_str())));
            }
            TrackDisplayField::Path => parts.push(path.display().to_string()),
        }
    }

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
