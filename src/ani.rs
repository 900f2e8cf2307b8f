//! Frame animations.
//!
//! An animation file is a whitespace-separated list of `"image" seconds` pairs
//! terminated by the bare word `end`:
//!
//! ```text
//! "walk_0.png" 0.1
//! "walk_1.png" 0.1
//! "walk_2.png" 0.15
//! end
//! ```
//!
//! Image names are interned through an [`ImageMap`], so the same image used by
//! many animations is stored once and compared by id.
//!
//! # Usage
//!
//! ```
//! use cutekit::ani::{Animation, ImageMap};
//!
//! let mut images = ImageMap::new();
//! let mut ani = Animation::parse("\"a\" 0.5 \"b\" 0.5 end", &mut images).unwrap();
//!
//! ani.update(0.6);
//! assert_eq!(images.name(ani.current_image()), Some("b"));
//! ```

use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use crate::handle::Handle;
use crate::strpool::{PoolConfig, StringPool};
use std::path::Path;

/// Maximum number of frames in one animation.
pub const MAX_FRAMES: usize = 1024;

/// Maximum image name length in bytes.
pub const MAX_NAME_LEN: usize = 1024;

/// Interned image name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(Handle);

impl ImageId {
    #[must_use]
    pub const fn handle(self) -> Handle {
        self.0
    }
}

/// Maps image names to stable ids.
#[derive(Debug)]
pub struct ImageMap {
    pool: StringPool,
}

impl Default for ImageMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageMap {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: StringPool::default(),
        }
    }

    /// Create a map backed by a pool with the given configuration.
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        Ok(Self {
            pool: StringPool::new(config)?,
        })
    }

    /// Intern an image name.
    pub fn add(&mut self, name: &str) -> ImageId {
        ImageId(self.pool.inject(name))
    }

    /// Name of an image id.
    #[must_use]
    pub fn name(&self, id: ImageId) -> Option<&str> {
        self.pool.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

/// One frame of an animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub image: ImageId,
    pub seconds: f32,
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| !c.is_ascii_whitespace()) {
            self.bump();
        }
        // Split points are ASCII whitespace, so the slice stays valid UTF-8.
        std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default()
    }

    fn quoted(&mut self) -> Result<String> {
        self.bump();
        let mut out = Vec::new();
        loop {
            let c = self.bump().ok_or(Error::PrematureEnd)?;
            let byte = match c {
                b'"' => break,
                b'\\' => match self.bump().ok_or(Error::PrematureEnd)? {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    b'\\' => b'\\',
                    b'"' => b'"',
                    b'\'' => b'\'',
                    other => {
                        return Err(Error::parse(
                            self.line,
                            format!("unknown escape sequence `\\{}`", char::from(other)),
                        ));
                    }
                },
                other => other,
            };
            if out.len() == MAX_NAME_LEN {
                return Err(Error::StringTooLarge {
                    len: out.len() + 1,
                    max: MAX_NAME_LEN,
                });
            }
            out.push(byte);
        }
        String::from_utf8(out).map_err(|_| Error::parse(self.line, "image name is not UTF-8"))
    }
}

/// Animation player.
#[derive(Clone, Debug)]
pub struct Animation {
    frames: Vec<Frame>,
    current: usize,
    seconds: f32,
    paused: bool,
    looping: bool,
    finished: bool,
}

impl Animation {
    /// Build an animation from frames.
    pub fn new(frames: Vec<Frame>) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::parse(1, "animation has no frames"));
        }
        if frames.len() > MAX_FRAMES {
            return Err(Error::parse(1, format!("more than {MAX_FRAMES} frames")));
        }
        Ok(Self {
            frames,
            current: 0,
            seconds: 0.0,
            paused: false,
            looping: true,
            finished: false,
        })
    }

    /// Parse one animation from text. Anything after `end` is ignored.
    pub fn parse(src: &str, images: &mut ImageMap) -> Result<Self> {
        Self::parse_prefix(src, images).map(|(ani, _)| ani)
    }

    /// Parse one animation and report how many bytes it spanned, including
    /// the terminating `end`.
    pub fn parse_prefix(src: &str, images: &mut ImageMap) -> Result<(Self, usize)> {
        let mut lex = Lexer::new(src);
        let mut frames = Vec::new();
        loop {
            lex.skip_whitespace();
            match lex.peek() {
                None => return Err(Error::PrematureEnd),
                Some(b'"') => {
                    let name = lex.quoted()?;
                    lex.skip_whitespace();
                    let line = lex.line;
                    let token = lex.word();
                    if token.is_empty() {
                        return Err(Error::PrematureEnd);
                    }
                    let seconds: f32 = token.parse().map_err(|_| {
                        Error::parse(line, format!("expected frame duration, found `{token}`"))
                    })?;
                    if !seconds.is_finite() || seconds < 0.0 {
                        return Err(Error::parse(
                            line,
                            format!("frame duration must be a non-negative number, found `{token}`"),
                        ));
                    }
                    if frames.len() == MAX_FRAMES {
                        return Err(Error::parse(line, format!("more than {MAX_FRAMES} frames")));
                    }
                    frames.push(Frame {
                        image: images.add(&name),
                        seconds,
                    });
                }
                Some(_) => {
                    let line = lex.line;
                    let token = lex.word();
                    if token == "end" {
                        break;
                    }
                    return Err(Error::parse(
                        line,
                        format!("expected quoted image name or `end`, found `{token}`"),
                    ));
                }
            }
        }
        let consumed = lex.pos;
        Ok((Self::new(frames)?, consumed))
    }

    /// Parse every animation in `src`, back to back.
    pub fn parse_all(src: &str, images: &mut ImageMap) -> Result<Vec<Self>> {
        let mut out = Vec::new();
        let mut rest = src;
        while !rest.trim_start().is_empty() {
            let (ani, consumed) = Self::parse_prefix(rest, images)?;
            out.push(ani);
            rest = &rest[consumed..];
        }
        Ok(out)
    }

    /// Load an animation file.
    pub fn load(path: impl AsRef<Path>, images: &mut ImageMap) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, images).inspect_err(|e| {
            emit_log(
                LogLevel::Warn,
                &format!("failed to load animation {}: {e}", path.display()),
            );
        })
    }

    /// Advance the animation clock by `dt` seconds.
    ///
    /// Steps through as many frames as `dt` covers. Looping animations wrap to
    /// the first frame; others stop on the last frame and report finished.
    /// Non-finite `dt` values are ignored and negative ones count as zero.
    pub fn update(&mut self, dt: f32) {
        if self.paused || self.finished || !dt.is_finite() {
            return;
        }

        let total = self.duration();
        if total <= 0.0 {
            self.step();
            return;
        }
        let dt = dt.max(0.0);
        // Whole passes are dropped up front so the clock never overflows.
        self.seconds += if self.looping { dt % total } else { dt };
        if self.looping && self.seconds >= total {
            self.seconds %= total;
        }

        loop {
            let duration = self.frames[self.current].seconds;
            if self.seconds < duration {
                break;
            }
            if self.current + 1 == self.frames.len() && !self.looping {
                self.seconds = duration;
                self.finished = true;
                break;
            }
            self.seconds -= duration;
            self.step();
        }
    }

    fn step(&mut self) {
        if self.current + 1 < self.frames.len() {
            self.current += 1;
        } else if self.looping {
            self.current = 0;
        } else {
            self.finished = true;
        }
    }

    /// Rewind to the first frame.
    pub fn reset(&mut self) {
        self.current = 0;
        self.seconds = 0.0;
        self.finished = false;
    }

    /// Jump to a frame and restart its clock. Returns `false` if out of range.
    pub fn set_frame(&mut self, index: usize) -> bool {
        if index >= self.frames.len() {
            return false;
        }
        self.current = index;
        self.seconds = 0.0;
        self.finished = false;
        true
    }

    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_image(&self) -> ImageId {
        self.frames[self.current].image
    }

    /// Seconds spent on the current frame.
    #[must_use]
    pub fn frame_time(&self) -> f32 {
        self.seconds
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total length of one pass in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.frames.iter().map(|f| f.seconds).sum()
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// A non-looping animation that has reached the end of its last frame.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
