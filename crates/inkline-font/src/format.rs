//! On-disk layout of a compressed font asset.
//!
//! All integers are little-endian. The file is a header followed by five
//! fixed-record tables and a single deflate blob:
//!
//! ```text
//! header     marker u16, height u16, ascender u16, styles u8,
//!            interval_count u16, glyph_count u32, group_size u16,
//!            group_count u16
//! intervals  interval_count x { first u32, last u32, offset u32 }
//! glyphs     glyph_count x { bitmap_len u32, width u16, height u16,
//!            x_advance u16, x_offset i16, y_offset i16 }
//! kerning    count u16, count x { left u32, right u32, adjust i16 }
//! ligatures  count u16, count x { left u32, right u32, ligature u32 }
//! groups     group_count x { compressed_offset u32, compressed_len u32,
//!            uncompressed_len u32 }
//! blob       raw-deflate streams, one per group
//! ```
//!
//! Glyph bitmaps use 2 bits per pixel. Inside a compressed group every
//! bitmap row is padded to a whole byte (`(width + 3) / 4` bytes per row)
//! so rows can be sliced without bit shifting; the cache compacts that to
//! the dense packing (`(width * height + 3) / 4` bytes per glyph) that the
//! renderer consumes.

use crate::error::FontError;

/// Leading magic of every font asset.
pub const FONT_MARKER: u16 = 0xEF01;

pub(crate) const HEADER_LEN: usize = 17;
pub(crate) const INTERVAL_LEN: usize = 12;
pub(crate) const GLYPH_LEN: usize = 14;
pub(crate) const KERNING_LEN: usize = 10;
pub(crate) const LIGATURE_LEN: usize = 12;
pub(crate) const GROUP_LEN: usize = 12;

// ============================================================================
// Records
// ============================================================================

/// Fixed per-asset fields.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Header {
    pub height: u16,
    pub ascender: u16,
    pub styles: u8,
    pub interval_count: u16,
    pub glyph_count: u32,
    pub group_size: u16,
    pub group_count: u16,
}

/// A contiguous codepoint range mapped onto the glyph table.
///
/// `offset` is in glyph-table units; each codepoint in the range owns
/// one glyph per style slot, laid out consecutively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub first: u32,
    pub last: u32,
    pub offset: u32,
}

/// Metrics and bitmap size for one glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub bitmap_len: u32,
    pub width: u16,
    pub height: u16,
    pub x_advance: u16,
    pub x_offset: i16,
    pub y_offset: i16,
}

impl Glyph {
    /// Bytes per bitmap row in the byte-aligned group interior.
    #[must_use]
    pub fn row_stride(&self) -> usize {
        (usize::from(self.width) + 3) / 4
    }

    /// Size of this glyph inside an inflated group.
    #[must_use]
    pub fn aligned_len(&self) -> usize {
        self.row_stride() * usize::from(self.height)
    }

    /// Size of the dense 2-bit packing the cache hands out.
    #[must_use]
    pub fn packed_len(&self) -> usize {
        (usize::from(self.width) * usize::from(self.height) + 3) / 4
    }
}

/// Location of one compressed glyph group inside the blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group {
    pub compressed_offset: u32,
    pub compressed_len: u32,
    pub uncompressed_len: u32,
}

// ============================================================================
// Reader
// ============================================================================

/// Bounds-checked little-endian cursor over the asset bytes.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FontError> {
        let end = self.pos.checked_add(n).ok_or(FontError::Truncated {
            needed: usize::MAX,
            len: self.data.len(),
        })?;
        if end > self.data.len() {
            return Err(FontError::Truncated {
                needed: end,
                len: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), FontError> {
        self.take(n).map(|_| ())
    }

    pub fn u8(&mut self) -> Result<u8, FontError> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, FontError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn i16(&mut self) -> Result<i16, FontError> {
        let b = self.take(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32(&mut self) -> Result<u32, FontError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

// ============================================================================
// Record decoding
// ============================================================================

impl Header {
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self, FontError> {
        let marker = r.u16()?;
        if marker != FONT_MARKER {
            return Err(FontError::BadMarker(marker));
        }
        Ok(Self {
            height: r.u16()?,
            ascender: r.u16()?,
            styles: r.u8()?,
            interval_count: r.u16()?,
            glyph_count: r.u32()?,
            group_size: r.u16()?,
            group_count: r.u16()?,
        })
    }
}

impl Interval {
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self, FontError> {
        Ok(Self {
            first: r.u32()?,
            last: r.u32()?,
            offset: r.u32()?,
        })
    }
}

impl Glyph {
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self, FontError> {
        Ok(Self {
            bitmap_len: r.u32()?,
            width: r.u16()?,
            height: r.u16()?,
            x_advance: r.u16()?,
            x_offset: r.i16()?,
            y_offset: r.i16()?,
        })
    }
}

impl Group {
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self, FontError> {
        Ok(Self {
            compressed_offset: r.u32()?,
            compressed_len: r.u32()?,
            uncompressed_len: r.u32()?,
        })
    }
}
