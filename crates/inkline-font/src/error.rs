//! Error types for font asset parsing and the bitmap cache.

use thiserror::Error;

/// Structural problems found while parsing a font asset.
///
/// Parsing is strict: every table is bounds-checked against the buffer and
/// against the header before any glyph is served, so the lookup paths can
/// index without re-validating.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("font asset truncated: need {needed} bytes, have {len}")]
    Truncated { needed: usize, len: usize },

    #[error("bad font marker {0:#06x}")]
    BadMarker(u16),

    #[error("unsupported style mask {0:#04x}")]
    BadStyles(u8),

    #[error("group size must be nonzero")]
    ZeroGroupSize,

    #[error("group count {found} does not cover {glyphs} glyphs of size {size}")]
    GroupCount { found: u16, glyphs: u32, size: u16 },

    #[error("interval {index} out of order")]
    IntervalOrder { index: usize },

    #[error("interval {index} points past the glyph table")]
    IntervalOutOfRange { index: usize },

    #[error("glyph {index} bitmap length disagrees with its dimensions")]
    GlyphGeometry { index: u32 },

    #[error("group {index} compressed range lies outside the blob")]
    GroupBounds { index: u16 },

    #[error("group {index} uncompressed size disagrees with its glyphs")]
    GroupSize { index: u16 },

    #[error("kerning table out of order at pair {index}")]
    KerningOrder { index: usize },

    #[error("ligature table out of order at pair {index}")]
    LigatureOrder { index: usize },
}

/// Failures on the glyph decompression paths.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("glyph index {index} out of range ({count} glyphs)")]
    GlyphOutOfRange { index: u32, count: u32 },

    #[error("group {group} failed to inflate: {source}")]
    Inflate {
        group: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("group {group} inflated to {actual} bytes, expected {expected}")]
    SizeMismatch {
        group: u16,
        expected: usize,
        actual: usize,
    },

    #[error("glyph {index} lies outside its inflated group")]
    Corrupt { index: u32 },
}
