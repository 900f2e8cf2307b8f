//! Fuzz target for BMFont text parsing.
//!
//! Tests that Font::parse handles arbitrary strings without panicking, and
//! that measuring and laying out text with any accepted font is safe.

#![no_main]

use cutekit::font::Font;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(font) = Font::parse(data) else {
        return;
    };

    // Use the font's own face name as sample text
    let sample = format!("{} AV\n{}", font.face, data.len());
    let _ = font.text_width(&sample);
    let _ = font.text_height(&sample);
    let _ = font.layout(&sample, 0.0, 0.0);
});
