#![allow(dead_code)] // Each test binary uses a subset of the fixtures
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

/// Three-frame walk cycle, 0.4 seconds long.
pub const WALK_ANI: &str = r#"
"walk_0.png" 0.1
"walk_1.png" 0.1
"walk_2.png" 0.2
end
"#;

/// Two animations sharing images, written back to back.
pub const PAIR_ANI: &str = r#"
"idle.png" 1.0 end
"run_0.png" 0.05 "idle.png" 0.05 "run_1.png" 0.05 end
"#;

/// Minimal BMFont text file with a space, `A`, `V` and one kerning pair.
pub const TEST_FONT: &str = r#"info face="Test Sans" size=16 bold=0 italic=0 charset="" unicode=1 stretchH=100 smooth=1 aa=1 padding=0,0,0,0 spacing=1,1
common lineHeight=18 base=14 scaleW=128 scaleH=64 pages=1 packed=0
page id=0 file="test_0.png"
chars count=3
char id=32 x=0 y=0 width=0 height=0 xoffset=0 yoffset=0 xadvance=4 page=0 chnl=15
char id=65 x=0 y=0 width=8 height=10 xoffset=0 yoffset=2 xadvance=9 page=0 chnl=15
char id=86 x=8 y=0 width=8 height=10 xoffset=1 yoffset=2 xadvance=9 page=0 chnl=4
kernings count=1
kerning first=65 second=86 amount=-2
"#;

/// Temporary directory holding asset files for one test.
pub struct AssetDir {
    dir: TempDir,
}

impl AssetDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Write `contents` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("create asset file");
        file.write_all(contents).expect("write asset file");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
