//! File loaders for animations and fonts.

#![allow(clippy::float_cmp)]

mod common;

use common::{AssetDir, PAIR_ANI, TEST_FONT, WALK_ANI};
use cutekit::{Animation, Error, Font, ImageMap};

#[test]
fn load_animation_from_file() {
    let assets = AssetDir::new();
    let path = assets.write("walk.ani", WALK_ANI.as_bytes());

    let mut images = ImageMap::new();
    let mut ani = Animation::load(&path, &mut images).unwrap();
    assert_eq!(ani.frame_count(), 3);
    assert!((ani.duration() - 0.4).abs() < 1e-6);

    ani.update(0.15);
    assert_eq!(images.name(ani.current_image()), Some("walk_1.png"));
}

#[test]
fn animations_share_image_ids() {
    let mut images = ImageMap::new();
    let all = Animation::parse_all(PAIR_ANI, &mut images).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(images.len(), 3);
    assert_eq!(all[0].frames()[0].image, all[1].frames()[1].image);
}

#[test]
fn load_missing_animation_is_io_error() {
    let assets = AssetDir::new();
    let mut images = ImageMap::new();
    let err = Animation::load(assets.path("nope.ani"), &mut images).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn load_truncated_animation_fails() {
    let assets = AssetDir::new();
    let path = assets.write("cut.ani", b"\"a.png\" 0.1 \"b.png\"");
    let mut images = ImageMap::new();
    let err = Animation::load(&path, &mut images).unwrap_err();
    assert!(matches!(err, Error::PrematureEnd));
}

#[test]
fn load_font_from_file() {
    let assets = AssetDir::new();
    let path = assets.write("test.fnt", TEST_FONT.as_bytes());

    let font = Font::load(&path).unwrap();
    assert_eq!(font.face, "Test Sans");
    assert_eq!(font.text_width("AV"), 16);
    assert_eq!(font.layout("AVA", 0.0, 0.0).len(), 3);
}

#[test]
fn load_font_with_crlf_line_endings() {
    let assets = AssetDir::new();
    let path = assets.write("crlf.fnt", TEST_FONT.replace('\n', "\r\n").as_bytes());
    let font = Font::load(&path).unwrap();
    assert_eq!(font.glyphs().len(), 3);
    assert_eq!(font.kerning('A', 'V'), -2);
}

#[test]
fn load_non_utf8_font_fails() {
    let assets = AssetDir::new();
    let path = assets.write("bad.fnt", &[0xff, 0xfe, 0x00, 0x41]);
    assert!(Font::load(&path).is_err());
}
