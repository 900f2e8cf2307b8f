//! BMFont text-format loader and text layout.
//!
//! Reads the AngelCode BMFont `.fnt` text format:
//!
//! ```text
//! info face="Arial" size=32 bold=0 italic=0 ...
//! common lineHeight=32 base=26 scaleW=256 scaleH=256 pages=1 packed=0
//! page id=0 file="arial_0.png"
//! chars count=95
//! char id=32 x=0 y=0 width=0 height=0 xoffset=0 yoffset=0 xadvance=8 page=0 chnl=15
//! ...
//! kernings count=91
//! kerning first=32 second=65 amount=-2
//! ```
//!
//! # Format rules
//!
//! - Records must appear in exactly this order: `info`, `common`, one `page`
//!   per declared page, `chars`, the declared number of `char` records, then
//!   optionally `kernings` with its declared number of `kerning` records.
//! - Each record's keys follow the fixed BMFont order. Keys the loader does
//!   not read may be left out, but unknown, repeated or reordered keys are
//!   errors.
//! - Every key this loader reads must be present.
//! - Blank lines are ignored; any other trailing content is an error.

use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use bitflags::bitflags;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Upper bound on preallocation from declared counts.
const PREALLOC_LIMIT: usize = 4096;

bitflags! {
    /// Texture channels a glyph is stored in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Channels: u8 {
        const BLUE = 1;
        const GREEN = 2;
        const RED = 4;
        const ALPHA = 8;
        const ALL = Self::BLUE.bits() | Self::GREEN.bits() | Self::RED.bits() | Self::ALPHA.bits();
    }
}

/// One glyph of a bitmap font, in texture pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub id: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub xoffset: i32,
    pub yoffset: i32,
    pub xadvance: i32,
    pub page: u32,
    pub channels: Channels,
}

impl Glyph {
    /// Normalized texture rectangle `[u0, v0, u1, v1]`.
    #[must_use]
    pub fn uv(&self, scale_w: u32, scale_h: u32) -> [f32; 4] {
        let w = scale_w.max(1) as f32;
        let h = scale_h.max(1) as f32;
        [
            self.x as f32 / w,
            self.y as f32 / h,
            self.x.saturating_add(self.width) as f32 / w,
            self.y.saturating_add(self.height) as f32 / h,
        ]
    }
}

/// A textured rectangle produced by [`Font::layout`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
    pub page: u32,
}

/// Keys each record tag may carry, in file order.
fn known_keys(tag: &str) -> Option<&'static [&'static str]> {
    let keys: &'static [&'static str] = match tag {
        "info" => &[
            "face", "size", "bold", "italic", "charset", "unicode", "stretchH", "smooth", "aa",
            "padding", "spacing", "outline",
        ],
        "common" => &[
            "lineHeight",
            "base",
            "scaleW",
            "scaleH",
            "pages",
            "packed",
            "alphaChnl",
            "redChnl",
            "greenChnl",
            "blueChnl",
        ],
        "page" => &["id", "file"],
        "chars" | "kernings" => &["count"],
        "char" => &[
            "id", "x", "y", "width", "height", "xoffset", "yoffset", "xadvance", "page", "chnl",
        ],
        "kerning" => &["first", "second", "amount"],
        _ => return None,
    };
    Some(keys)
}

struct Record<'a> {
    tag: &'a str,
    line: usize,
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> Record<'a> {
    fn parse(line: usize, text: &'a str) -> Result<Self> {
        let text = text.trim();
        let (tag, mut rest) = text
            .split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((text, ""));
        let mut fields = Vec::new();
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }
            let key_end = rest
                .find(|c: char| c == '=' || c.is_ascii_whitespace())
                .unwrap_or(rest.len());
            if !rest[key_end..].starts_with('=') {
                return Err(Error::parse(
                    line,
                    format!("expected `key=value`, found `{}`", &rest[..key_end]),
                ));
            }
            let key = &rest[..key_end];
            let after = &rest[key_end + 1..];
            let (value, remaining) = if let Some(quoted) = after.strip_prefix('"') {
                let close = quoted
                    .find('"')
                    .ok_or_else(|| Error::parse(line, format!("unterminated string for `{key}`")))?;
                (&quoted[..close], &quoted[close + 1..])
            } else {
                let end = after
                    .find(|c: char| c.is_ascii_whitespace())
                    .unwrap_or(after.len());
                (&after[..end], &after[end..])
            };
            fields.push((key, value));
            rest = remaining;
        }
        let record = Self { tag, line, fields };
        record.check_keys()?;
        Ok(record)
    }

    fn check_keys(&self) -> Result<()> {
        let known = known_keys(self.tag)
            .ok_or_else(|| Error::parse(self.line, format!("unknown record `{}`", self.tag)))?;
        let mut next = 0;
        for (key, _) in &self.fields {
            match known[next..].iter().position(|k| k == key) {
                Some(offset) => next += offset + 1,
                None if known.iter().any(|k| k == key) => {
                    return Err(Error::parse(
                        self.line,
                        format!("key `{key}` repeated or out of order in `{}` record", self.tag),
                    ));
                }
                None => {
                    return Err(Error::parse(
                        self.line,
                        format!("unknown key `{key}` in `{}` record", self.tag),
                    ));
                }
            }
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<&'a str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                Error::parse(
                    self.line,
                    format!("missing key `{key}` in `{}` record", self.tag),
                )
            })
    }

    fn num<T: FromStr>(&self, key: &str) -> Result<T> {
        let value = self.get(key)?;
        value.parse().map_err(|_| {
            Error::parse(
                self.line,
                format!("invalid number `{value}` for `{key}` in `{}` record", self.tag),
            )
        })
    }
}

struct Records<'a> {
    lines: std::iter::Peekable<Box<dyn Iterator<Item = (usize, &'a str)> + 'a>>,
}

impl<'a> Records<'a> {
    fn new(text: &'a str) -> Self {
        let lines: Box<dyn Iterator<Item = (usize, &'a str)> + 'a> = Box::new(
            text.lines()
                .enumerate()
                .map(|(i, l)| (i + 1, l))
                .filter(|(_, l)| !l.trim().is_empty()),
        );
        Self {
            lines: lines.peekable(),
        }
    }

    fn expect(&mut self, tag: &str) -> Result<Record<'a>> {
        let (line, text) = self.lines.next().ok_or(Error::PrematureEnd)?;
        let record = Record::parse(line, text)?;
        if record.tag != tag {
            return Err(Error::parse(
                line,
                format!("expected `{tag}` record, found `{}`", record.tag),
            ));
        }
        Ok(record)
    }

    fn is_done(&mut self) -> bool {
        self.lines.peek().is_none()
    }
}

/// A parsed bitmap font.
#[derive(Clone, Debug)]
pub struct Font {
    pub face: String,
    pub size: i32,
    pub line_height: u32,
    pub base: u32,
    pub scale_w: u32,
    pub scale_h: u32,
    pub pages: Vec<String>,
    glyphs: Vec<Glyph>,
    lookup: HashMap<u32, usize>,
    kernings: HashMap<(u32, u32), i32>,
}

impl Font {
    /// Parse BMFont text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = Records::new(text);

        let info = records.expect("info")?;
        let face = info.get("face")?.to_string();
        let size = info.num("size")?;

        let common = records.expect("common")?;
        let line_height = common.num("lineHeight")?;
        let base = common.num("base")?;
        let scale_w = common.num("scaleW")?;
        let scale_h = common.num("scaleH")?;
        let page_count: usize = common.num("pages")?;

        let mut pages = Vec::with_capacity(page_count.min(PREALLOC_LIMIT));
        for expected_id in 0..page_count {
            let page = records.expect("page")?;
            let id: usize = page.num("id")?;
            if id != expected_id {
                return Err(Error::parse(
                    page.line,
                    format!("expected page id {expected_id}, found {id}"),
                ));
            }
            pages.push(page.get("file")?.to_string());
        }

        let chars = records.expect("chars")?;
        let char_count: usize = chars.num("count")?;
        let mut glyphs = Vec::with_capacity(char_count.min(PREALLOC_LIMIT));
        let mut lookup = HashMap::with_capacity(char_count.min(PREALLOC_LIMIT));
        for _ in 0..char_count {
            let record = records.expect("char")?;
            let channels = match record.get("chnl") {
                Ok(_) => Channels::from_bits_truncate(record.num("chnl")?),
                Err(_) => Channels::ALL,
            };
            let glyph = Glyph {
                id: record.num("id")?,
                x: record.num("x")?,
                y: record.num("y")?,
                width: record.num("width")?,
                height: record.num("height")?,
                xoffset: record.num("xoffset")?,
                yoffset: record.num("yoffset")?,
                xadvance: record.num("xadvance")?,
                page: record.num("page")?,
                channels,
            };
            if glyph.page as usize >= pages.len() {
                return Err(Error::parse(
                    record.line,
                    format!("glyph {} refers to missing page {}", glyph.id, glyph.page),
                ));
            }
            lookup.insert(glyph.id, glyphs.len());
            glyphs.push(glyph);
        }

        let mut kernings = HashMap::new();
        if !records.is_done() {
            let header = records.expect("kernings")?;
            let count: usize = header.num("count")?;
            kernings.reserve(count.min(PREALLOC_LIMIT));
            for _ in 0..count {
                let record = records.expect("kerning")?;
                let first = record.num("first")?;
                let second = record.num("second")?;
                kernings.insert((first, second), record.num("amount")?);
            }
        }

        if let Some((line, text)) = records.lines.next() {
            return Err(Error::parse(
                line,
                format!("unexpected trailing content `{}`", text.trim()),
            ));
        }

        Ok(Self {
            face,
            size,
            line_height,
            base,
            scale_w,
            scale_h,
            pages,
            glyphs,
            lookup,
            kernings,
        })
    }

    /// Load a `.fnt` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).inspect_err(|e| {
            emit_log(
                LogLevel::Warn,
                &format!("failed to load font {}: {e}", path.display()),
            );
        })
    }

    /// All glyphs in file order.
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Glyph for a character.
    #[must_use]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyph_by_id(c as u32)
    }

    #[must_use]
    pub fn glyph_by_id(&self, id: u32) -> Option<&Glyph> {
        self.lookup.get(&id).map(|&i| &self.glyphs[i])
    }

    /// Kerning adjustment between two characters, 0 if none.
    #[must_use]
    pub fn kerning(&self, first: char, second: char) -> i32 {
        self.kernings
            .get(&(first as u32, second as u32))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn kerning_count(&self) -> usize {
        self.kernings.len()
    }

    /// Width in pixels of the widest line of `text`.
    ///
    /// Characters without a glyph are skipped.
    #[must_use]
    pub fn text_width(&self, text: &str) -> i32 {
        text.split('\n')
            .map(|line| self.line_width(line))
            .max()
            .unwrap_or(0)
    }

    fn line_width(&self, line: &str) -> i32 {
        let mut width = 0;
        let mut prev = None;
        for c in line.chars() {
            let Some(glyph) = self.glyph(c) else {
                prev = None;
                continue;
            };
            if let Some(p) = prev {
                width = self.kerning(p, c).saturating_add(width);
            }
            width = width.saturating_add(glyph.xadvance);
            prev = Some(c);
        }
        width
    }

    /// Height in pixels of `text`: one line height per line.
    #[must_use]
    pub fn text_height(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }
        let lines = text.split('\n').count() as u32;
        lines.saturating_mul(self.line_height)
    }

    /// Lay out `text` starting at `(x, y)` (top-left, y down).
    ///
    /// Produces one quad per visible glyph. Newlines return to `x` and move down
    /// one line height. Characters without a glyph are skipped.
    #[must_use]
    pub fn layout(&self, text: &str, x: f32, y: f32) -> Vec<Quad> {
        let mut quads = Vec::with_capacity(text.len());
        let mut pen_x = x;
        let mut pen_y = y;
        let mut prev = None;
        for c in text.chars() {
            if c == '\n' {
                pen_x = x;
                pen_y += self.line_height as f32;
                prev = None;
                continue;
            }
            let Some(glyph) = self.glyph(c) else {
                prev = None;
                continue;
            };
            if let Some(p) = prev {
                pen_x += self.kerning(p, c) as f32;
            }
            if glyph.width > 0 && glyph.height > 0 {
                let x0 = pen_x + glyph.xoffset as f32;
                let y0 = pen_y + glyph.yoffset as f32;
                let [u0, v0, u1, v1] = glyph.uv(self.scale_w, self.scale_h);
                quads.push(Quad {
                    x0,
                    y0,
                    x1: x0 + glyph.width as f32,
                    y1: y0 + glyph.height as f32,
                    u0,
                    v0,
                    u1,
                    v1,
                    page: glyph.page,
                });
            }
            pen_x += glyph.xadvance as f32;
            prev = Some(c);
        }
        quads
    }
}
