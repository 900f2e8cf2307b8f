//! Font parsing and text layout benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{Criterion, criterion_group, criterion_main};
use cutekit::Font;
use std::fmt::Write;
use std::hint::black_box;

/// A printable-ASCII font with a kerning pair for every adjacent letter pair.
fn build_font() -> String {
    let mut text = String::from(
        "info face=\"Bench\" size=16 bold=0 italic=0\n\
         common lineHeight=18 base=14 scaleW=512 scaleH=512 pages=1\n\
         page id=0 file=\"bench_0.png\"\n",
    );
    let chars: Vec<u32> = (32..127).collect();
    let _ = writeln!(text, "chars count={}", chars.len());
    for (i, id) in chars.iter().enumerate() {
        let _ = writeln!(
            text,
            "char id={id} x={} y={} width=8 height=12 xoffset=0 yoffset=2 xadvance=9 page=0 chnl=15",
            (i % 32) * 10,
            (i / 32) * 14,
        );
    }
    let pairs: Vec<(u32, u32)> = (65..90).map(|a| (a, a + 1)).collect();
    let _ = writeln!(text, "kernings count={}", pairs.len());
    for (first, second) in pairs {
        let _ = writeln!(text, "kerning first={first} second={second} amount=-1");
    }
    text
}

fn parse(c: &mut Criterion) {
    let source = build_font();
    c.bench_function("font_parse_ascii", |b| {
        b.iter(|| Font::parse(black_box(&source)));
    });
}

fn measure_and_layout(c: &mut Criterion) {
    let font = Font::parse(&build_font()).unwrap();
    let paragraph = "The quick brown fox jumps over the lazy dog. ABCDEFGHIJKLMNOPQRSTUVWXYZ\n".repeat(20);

    c.bench_function("font_text_width_paragraph", |b| {
        b.iter(|| font.text_width(black_box(&paragraph)));
    });

    c.bench_function("font_layout_paragraph", |b| {
        b.iter(|| font.layout(black_box(&paragraph), 0.0, 0.0));
    });
}

criterion_group!(benches, parse, measure_and_layout);
criterion_main!(benches);
