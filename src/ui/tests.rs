use super::*;
use crate::config::TrackDisplayField;
use eframe::egui::RawInput;
use std::path::PathBuf;

fn track(name: &str) -> Track {
    Track {
        id: 1,
        path: PathBuf::from(format!("/nowhere/{name}.flac")),
        title: "Song".to_string(),
        artist: Some("Band".to_string()),
        album: None,
        duration: Some(Duration::from_secs(200)),
        display: format!("{name}.flac"),
    }
}

#[test]
fn format_mmss_pads_minutes_and_seconds() {
    assert_eq!(format_mmss(Duration::ZERO), "00:00");
    assert_eq!(format_mmss(Duration::from_millis(61_900)), "01:01");
    assert_eq!(format_mmss(Duration::from_secs(3605)), "60:05");
}

#[test]
fn now_playing_text_uses_prefix_and_file_name_by_default() {
    let ui = UiSettings::default();
    let t = track("intro");
    assert_eq!(
        now_playing_text(Some(&t), &ui),
        "Now Playing: intro.flac"
    );
    assert_eq!(now_playing_text(None, &ui), "Nothing playing");
}

#[test]
fn now_playing_text_follows_configured_fields() {
    let ui = UiSettings {
        now_playing_prefix: "> ".to_string(),
        now_playing_track_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
        now_playing_track_separator: " / ".to_string(),
        ..UiSettings::default()
    };
    assert_eq!(now_playing_text(Some(&track("x")), &ui), "> Band / Song");
}

#[test]
fn missing_art_shares_one_placeholder_texture() {
    let ctx = Context::default();
    let mut art = ArtworkCache::new(16, 64, None);

    let a = art.thumbnail(&ctx, &PathBuf::from("/nowhere/a.mp3"));
    let b = art.thumbnail(&ctx, &PathBuf::from("/nowhere/b.mp3"));
    assert_eq!(a.id(), b.id());
    assert_eq!(a.size(), [16, 16]);
    assert_eq!(art.cached_thumbnails(), 2);

    let keep = vec![PathBuf::from("/nowhere/b.mp3")];
    art.retain(keep.iter());
    assert_eq!(art.cached_thumbnails(), 1);

    assert!(art.cover(&ctx, &PathBuf::from("/nowhere/a.mp3")).is_none());
}

#[test]
fn broken_or_absent_logo_is_ignored() {
    let ctx = Context::default();
    assert!(ArtworkCache::new(16, 64, None).logo(&ctx).is_none());

    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("logo.png");
    std::fs::write(&bogus, b"not a png").unwrap();
    assert!(ArtworkCache::new(16, 64, Some(bogus)).logo(&ctx).is_none());
}

#[test]
fn logo_is_loaded_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.png");
    image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
        .save(&path)
        .unwrap();

    let ctx = Context::default();
    let logo = ArtworkCache::new(16, 64, Some(path)).logo(&ctx).unwrap();
    assert_eq!(logo.size(), [4, 2]);
}

#[test]
fn idle_frame_produces_no_actions() {
    let ctx = Context::default();
    let settings = UiSettings::default();
    let mut art = ArtworkCache::new(settings.thumbnail_size, settings.cover_size, None);
    let app = App::new(vec![track("a"), track("b")]);
    let mut preview = None;
    let mut actions = vec![UiAction::Quit];

    let _ = ctx.run(RawInput::default(), |ctx| {
        actions = draw(ctx, &app, &mut art, Some(1), &mut preview, &settings);
    });

    assert!(actions.is_empty());
    assert_eq!(preview, None);
    assert!(art.cached_thumbnails() > 0);
}
