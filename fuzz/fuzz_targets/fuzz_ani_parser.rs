//! Fuzz target for animation parsing.
//!
//! Tests that the animation parser and player handle arbitrary text without
//! panicking.

#![no_main]

use cutekit::ani::{Animation, ImageMap};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let mut images = ImageMap::new();

    if let Ok(mut ani) = Animation::parse(data, &mut images) {
        // Drive the player through a few updates, including degenerate steps
        for dt in [0.0, 0.016, 1.0, f32::MAX, -1.0, f32::NAN] {
            ani.update(dt);
            assert!(ani.current_frame() < ani.frame_count());
        }
        ani.set_looping(false);
        ani.update(1e9);
        let _ = ani.set_frame(ani.frame_count());
    }

    let _ = Animation::parse_all(data, &mut images);
});
