//! `cutekit` - small building blocks for 2D games
//!
//! The centerpiece is [`StringPool`], a string interner with generational
//! handles, reference counts and block-allocated storage. Around it sit
//! loaders for frame animations and BMFont text fonts, path-string helpers,
//! synchronization primitives, a frame timer and 2D math.
//!
//! ```
//! use cutekit::{PoolConfig, StringPool};
//!
//! let mut pool = StringPool::new(PoolConfig::default().with_ignore_case(true)).unwrap();
//! let a = pool.inject("Hero.png");
//! let b = pool.inject("hero.PNG");
//! assert_eq!(a, b);
//! assert_eq!(pool.get(a), Some("Hero.png"));
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)] // Unsafe code needs justification (RwLock data cell)
#![allow(clippy::cast_possible_truncation)] // Sizes are bounded before narrowing
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Intentional for timing and layout math
#![allow(clippy::cast_possible_wrap)] // Intentional coordinate conversions
#![allow(clippy::module_name_repetitions)] // Allow PoolConfig in strpool etc
#![allow(clippy::missing_errors_doc)] // Error variants document themselves
#![allow(clippy::missing_panics_doc)] // Only inject panics, documented inline
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::float_cmp)] // Exact comparisons on exact values in tests
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod ani;
pub mod error;
pub mod event;
pub mod font;
pub mod handle;
pub mod hash;
pub mod math2d;
pub mod path;
pub mod strpool;
pub mod sync;
pub mod time;

// Re-export core types at crate root
pub use error::{Error, Result};
pub use event::{LogLevel, clear_log_callback, emit_log, set_log_callback};
pub use handle::{Handle, HandleLayout, HandleTable};
pub use hash::sid;
pub use strpool::{Collated, MAX_STRING_LEN, PoolConfig, PoolStats, StringPool};

// Re-export asset types
pub use ani::{Animation, Frame, ImageId, ImageMap};
pub use font::{Channels, Font, Glyph, Quad};

// Re-export commonly used types
pub use math2d::{Aabb, Circle, Halfspace, Ray, RayHit, Rotation, Transform, V2};
pub use sync::{RwLock, Semaphore, ThreadPool};
pub use time::Timer;
