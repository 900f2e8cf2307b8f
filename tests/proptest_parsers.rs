//! Property-based tests for the text parsers and path helpers.
//!
//! Parsers must return `Ok` or `Err` on any input, never panic.

mod common;

use common::TEST_FONT;
use cutekit::{Animation, Font, ImageMap, path};
use proptest::prelude::*;

/// Text built from the tokens the animation grammar cares about.
fn ani_like_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("\"".to_string()),
            Just("\\".to_string()),
            Just("end".to_string()),
            Just(" ".to_string()),
            Just("\n".to_string()),
            Just("-1".to_string()),
            Just("0.25".to_string()),
            Just("NaN".to_string()),
            "[a-z._]{1,6}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

/// Font text with one byte range replaced by junk.
fn mangled_font_strategy() -> impl Strategy<Value = String> {
    (0..TEST_FONT.len(), 0usize..40, "[ =\"a-z0-9\\n-]{0,20}").prop_map(|(start, len, junk)| {
        let mut text = TEST_FONT.to_string();
        let start = (0..=start).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
        let end = (start + len).min(text.len());
        let end = (end..=text.len()).find(|&i| text.is_char_boundary(i)).unwrap_or(text.len());
        text.replace_range(start..end, &junk);
        text
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn animation_parser_never_panics(src in any::<String>()) {
        let mut images = ImageMap::new();
        let _ = Animation::parse(&src, &mut images);
        let _ = Animation::parse_all(&src, &mut images);
    }

    #[test]
    fn animation_parser_structured_input(src in ani_like_strategy()) {
        let mut images = ImageMap::new();
        if let Ok((ani, consumed)) = Animation::parse_prefix(&src, &mut images) {
            prop_assert!(consumed <= src.len());
            prop_assert!(ani.frame_count() >= 1);
            prop_assert!(ani.frames().iter().all(|f| f.seconds >= 0.0));
        }
    }

    #[test]
    fn animation_update_stays_in_range(
        durations in prop::collection::vec(0.0f32..1.0, 1..8),
        steps in prop::collection::vec(0.0f32..2.0, 0..20),
        looping in any::<bool>(),
    ) {
        let mut images = ImageMap::new();
        let src: String = durations
            .iter()
            .enumerate()
            .map(|(i, d)| format!("\"f{i}\" {d} "))
            .chain(std::iter::once("end".to_string()))
            .collect();
        let mut ani = Animation::parse(&src, &mut images).unwrap();
        ani.set_looping(looping);
        for dt in steps {
            ani.update(dt);
            prop_assert!(ani.current_frame() < ani.frame_count());
            prop_assert!(images.name(ani.current_image()).is_some());
        }
    }

    #[test]
    fn font_parser_never_panics(src in any::<String>()) {
        let _ = Font::parse(&src);
    }

    #[test]
    fn font_parser_mangled_input(src in mangled_font_strategy()) {
        if let Ok(font) = Font::parse(&src) {
            let _ = font.layout("AV A\nVA", 0.0, 0.0);
            let _ = font.text_width("AVAV");
            let _ = font.text_height("A\n\nA");
        }
    }

    #[test]
    fn path_helpers_never_panic(p in "[a-z./\\\\é]{0,24}", n in 0usize..30) {
        let (parent, name) = path::pop(&p);
        prop_assert!(parent.len() + name.len() <= p.len());
        let _ = path::pop_ext(&p);
        let _ = path::folder_name(&p);
        let normalized = path::normalize(&p);
        prop_assert!(!normalized.contains('\\'));
        prop_assert!(!normalized.contains("//"));
        let compacted = path::compact(&p, n);
        prop_assert!(compacted.chars().count() <= n);
    }
}
