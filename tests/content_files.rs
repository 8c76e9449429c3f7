use std::fs;
use std::sync::Arc;
use std::time::Instant;

use chrono::{TimeZone, Utc};
use indoc::indoc;

use term_card::clock::FixedClock;
use term_card::components::DebugLogHandle;
use term_card::config::{Config, Metrics};
use term_card::content::{CardContent, PhotoGallery, PhotoPair};
use term_card::error::CardError;
use term_card::layout::Size;
use term_card::window::WindowManager;

#[test]
fn content_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("card.toml");
    fs::write(
        &path,
        indoc! {r#"
            recipient = "Robin"
            birthday = { month = 2, day = 29 }
            reasons = ["You always show up."]

            [templates.playlist]
            title = "Our Playlist"
            body = "Track one"
        "#},
    )
    .unwrap();

    let content = CardContent::load(&path).expect("content loads");
    assert_eq!(content.recipient, "Robin");
    assert_eq!(content.birthday.month, 2);
    assert_eq!(content.reasons, vec!["You always show up.".to_string()]);
    // templates replace the default set
    assert!(content.templates.contains_key("playlist"));
    assert!(!content.templates.contains_key("birthday-vault"));
    assert_eq!(content.letters, CardContent::default().letters);
}

#[test]
fn missing_content_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CardContent::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, CardError::Io(_)));
}

#[test]
fn invalid_content_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("card.toml");
    fs::write(&path, "birthday = \"soon\"\n").unwrap();
    let err = CardContent::load(&path).unwrap_err();
    assert!(matches!(err, CardError::ContentParse(_)));
    assert!(err.to_string().contains("TOML"));
}

#[test]
fn gallery_hides_missing_photos() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("beach.jpg"), [0u8; 2048]).unwrap();
    fs::write(dir.path().join("cake.png"), [0u8; 10]).unwrap();
    let names = vec![
        "beach.jpg".to_string(),
        "gone.jpg".to_string(),
        "cake.png".to_string(),
    ];

    let gallery = PhotoGallery::load(Some(dir.path()), &names, None);
    let shown: Vec<&str> = gallery.photos().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(shown, vec!["beach.jpg", "cake.png"]);
    assert_eq!(gallery.photos()[0].size_label(), "2 KB");
}

#[test]
fn comparison_needs_both_photos() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("then.jpg"), b"then").unwrap();
    fs::write(dir.path().join("now.jpg"), b"now").unwrap();
    fs::write(dir.path().join("party.gif"), b"party").unwrap();

    let pair = PhotoPair {
        then: "then.jpg".to_string(),
        now: "now.jpg".to_string(),
    };
    let gallery = PhotoGallery::load(Some(dir.path()), &[], Some(&pair));
    assert!(gallery.comparison().is_some());
    let listed: Vec<&str> = gallery.photos().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(listed, vec!["party.gif"]);

    let broken = PhotoPair {
        then: "then.jpg".to_string(),
        now: "missing.jpg".to_string(),
    };
    let gallery = PhotoGallery::load(Some(dir.path()), &[], Some(&broken));
    assert!(gallery.comparison().is_none());
    assert_eq!(gallery.photos().len(), 3);
}

#[test]
fn empty_photo_folder_opens_an_empty_gallery() {
    let dir = tempfile::tempdir().unwrap();
    let gallery = PhotoGallery::load(Some(dir.path()), &[], None);
    assert!(gallery.is_empty());

    let mut config = Config::new(Metrics::cells());
    config.lock_on_start = false;
    config.show_boot = false;
    config.photo_dir = Some(dir.path().to_path_buf());
    let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 10, 1, 6, 0, 0).unwrap()));
    let mut wm = WindowManager::with_debug_log(
        config,
        Size::new(120, 40),
        clock,
        Instant::now(),
        DebugLogHandle::default(),
    );
    let id = wm.open("photo-memory");
    assert!(wm.content(id).is_some());
    assert_eq!(wm.list_open().len(), 1);
}
