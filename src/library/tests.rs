use super::*;
use crate::config::{LibrarySettings, TrackDisplayField};
use crate::store::PlaylistEntry;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[test]
fn display_from_fields_can_format_artist_title() {
    let p = Path::new("/tmp/Song.mp3");
    let fields = [TrackDisplayField::Artist, TrackDisplayField::Title];
    assert_eq!(
        display_from_fields(p, "Song", Some("Artist"), None, &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(p, "Song", Some("  Artist  "), None, &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(p, "Song", None, None, &fields, " - "),
        "Song"
    );
}

#[test]
fn display_from_fields_filename_keeps_extension_and_stem_drops_it() {
    let p = Path::new("/music/Intro Track.mp3");
    assert_eq!(
        display_from_fields(p, "x", None, None, &[TrackDisplayField::Filename], "|"),
        "Intro Track.mp3"
    );
    assert_eq!(
        display_from_fields(p, "x", None, None, &[TrackDisplayField::Stem], "|"),
        "Intro Track"
    );
    assert_eq!(
        display_from_fields(
            p,
            "x",
            Some("A"),
            Some("B"),
            &[TrackDisplayField::Album, TrackDisplayField::Display],
            "|"
        ),
        "B|A|x"
    );
}

#[test]
fn load_tracks_keeps_order_ids_and_falls_back_for_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("first.mp3");
    std::fs::write(&a, b"definitely not audio").unwrap();
    let missing = PathBuf::from("/nonexistent/encore/second.mp3");

    let entries = vec![
        PlaylistEntry { id: 7, path: a.clone() },
        PlaylistEntry { id: 3, path: missing.clone() },
    ];
    let tracks = load_tracks(&entries, &LibrarySettings::default());

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id, 7);
    assert_eq!(tracks[0].path, a);
    assert_eq!(tracks[0].title, "first");
    assert_eq!(tracks[0].display, "first.mp3");
    assert_eq!(tracks[0].duration, None);
    assert_eq!(tracks[1].id, 3);
    assert_eq!(tracks[1].display, "second.mp3");
    assert_eq!(tracks[1].artist, None);
}

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn decode_art_resizes_to_exact_square() {
    let art = decode_art(&png_bytes(64, 32), 50).unwrap();
    assert_eq!(art.dimensions(), (50, 50));
    assert_eq!(art.get_pixel(25, 25), &Rgba([10, 20, 30, 255]));
}

#[test]
fn decode_art_rejects_garbage() {
    assert!(decode_art(b"not an image", 50).is_none());
}

#[test]
fn untagged_file_has_no_art_and_placeholder_is_accent_square() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("plain.mp3");
    std::fs::write(&p, b"no tags here").unwrap();

    assert!(cover_art(&p).is_none());
    let thumb = placeholder(50);
    assert_eq!(thumb.dimensions(), (50, 50));
    assert_eq!(thumb.get_pixel(0, 0), &Rgba([0x1D, 0xB9, 0x54, 0xFF]));
    assert_eq!(thumb.get_pixel(49, 49), &Rgba([0x1D, 0xB9, 0x54, 0xFF]));
}
