//! Compressed bitmap-font assets for e-ink text rendering.
//!
//! An asset packs 2-bit antialiased glyph bitmaps into deflate-compressed
//! groups alongside metrics, kerning, and ligature tables. [`FontFace`]
//! gives a validated zero-copy view over the bytes; [`BitmapCache`]
//! inflates groups on demand, keeps the hottest few around, and can
//! prewarm every glyph a page needs into a single lookup buffer.
//!
//! ```
//! use inkline_font::{BitmapCache, FontBuilder, FontFace, FontStyle, GlyphSpec};
//!
//! let mut builder = FontBuilder::new(16, 12, FontStyle::Regular.bit(), 8);
//! builder.glyph('a', vec![GlyphSpec::spacer(7)]);
//! let bytes = builder.build().unwrap();
//!
//! let face = FontFace::parse(&bytes).unwrap();
//! let mut cache = BitmapCache::new();
//! let index = face.glyph_index('a' as u32, FontStyle::Regular).unwrap();
//! assert!(cache.bitmap(&face, index).unwrap().is_empty());
//! ```

#![forbid(unsafe_code)]

pub mod cache;
pub mod encode;
pub mod error;
pub mod face;
pub mod format;

pub use cache::{BitmapCache, CacheStats, DEFAULT_SLOTS, MAX_PAGE_GLYPHS};
pub use encode::{EncodeError, FontBuilder, GlyphSpec};
pub use error::{CacheError, FontError};
pub use face::{FontFace, FontKey, FontStyle, REPLACEMENT};
pub use format::{FONT_MARKER, Glyph, Group, Interval};
