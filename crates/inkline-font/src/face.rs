//! Parsed view over a font asset: codepoint lookup, style resolution,
//! metrics, kerning, and ligatures.
//!
//! [`FontFace`] borrows the raw asset bytes and validates every table up
//! front, so the per-glyph accessors can slice records without further
//! bounds checks.

use crate::error::FontError;
use crate::format::{
    GLYPH_LEN, GROUP_LEN, Glyph, Group, Header, INTERVAL_LEN, Interval, KERNING_LEN, LIGATURE_LEN,
    Reader,
};

/// Codepoint substituted when a character has no glyph in the asset.
pub const REPLACEMENT: u32 = 0xFFFD;

// ============================================================================
// Styles
// ============================================================================

/// The four face variants an asset may carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    #[must_use]
    pub fn bit(self) -> u8 {
        match self {
            Self::Regular => 1 << 0,
            Self::Bold => 1 << 1,
            Self::Italic => 1 << 2,
            Self::BoldItalic => 1 << 3,
        }
    }
}

/// Pick the variant actually served for `style` under `mask`.
///
/// Missing bold-italic degrades to bold, then italic; missing bold or
/// italic is served by bold-italic when the asset carries one, else by
/// regular. The parser guarantees regular is always present.
fn resolve_style(mask: u8, style: FontStyle) -> FontStyle {
    if mask & style.bit() != 0 {
        return style;
    }
    match style {
        FontStyle::BoldItalic => {
            if mask & FontStyle::Bold.bit() != 0 {
                FontStyle::Bold
            } else if mask & FontStyle::Italic.bit() != 0 {
                FontStyle::Italic
            } else {
                FontStyle::Regular
            }
        }
        FontStyle::Bold | FontStyle::Italic => {
            if mask & FontStyle::BoldItalic.bit() != 0 {
                FontStyle::BoldItalic
            } else {
                FontStyle::Regular
            }
        }
        FontStyle::Regular => FontStyle::Regular,
    }
}

/// Slot index of `style` among the variants present in `mask`.
fn style_slot(mask: u8, style: FontStyle) -> u32 {
    let resolved = resolve_style(mask, style);
    u32::from(mask & (resolved.bit() - 1)).count_ones()
}

// ============================================================================
// FontFace
// ============================================================================

/// Identity of a loaded asset, used to key cache contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontKey {
    ptr: usize,
    len: usize,
}

impl FontKey {
    pub(crate) fn from_raw(ptr: usize, len: usize) -> Self {
        Self { ptr, len }
    }
}

/// A validated, zero-copy view over one font asset.
pub struct FontFace<'a> {
    data: &'a [u8],
    header: Header,
    intervals_at: usize,
    glyphs_at: usize,
    kerning_at: usize,
    kerning_count: usize,
    ligatures_at: usize,
    ligature_count: usize,
    groups_at: usize,
    blob_at: usize,
}

impl<'a> FontFace<'a> {
    /// Parse and validate an asset.
    ///
    /// Every table is checked against the buffer, intervals and pair tables
    /// against their ordering invariants, and each group's uncompressed
    /// size against the byte-aligned sizes of the glyphs it holds.
    pub fn parse(data: &'a [u8]) -> Result<Self, FontError> {
        let mut r = Reader::new(data);
        let header = Header::read(&mut r)?;

        // Regular must be present; the other bits are free.
        if header.styles & FontStyle::Regular.bit() == 0 || header.styles > 0x0F {
            return Err(FontError::BadStyles(header.styles));
        }
        if header.group_size == 0 {
            return Err(FontError::ZeroGroupSize);
        }
        let expected_groups =
            header.glyph_count.div_ceil(u32::from(header.group_size));
        if u32::from(header.group_count) != expected_groups {
            return Err(FontError::GroupCount {
                found: header.group_count,
                glyphs: header.glyph_count,
                size: header.group_size,
            });
        }

        let slots = u32::from(header.styles.count_ones());

        let intervals_at = r.pos();
        let mut prev_last: Option<u32> = None;
        for index in 0..usize::from(header.interval_count) {
            let iv = Interval::read(&mut r)?;
            if iv.last < iv.first || prev_last.is_some_and(|p| iv.first <= p) {
                return Err(FontError::IntervalOrder { index });
            }
            let span = u64::from(iv.last - iv.first) + 1;
            let end = u64::from(iv.offset) + span * u64::from(slots);
            if end > u64::from(header.glyph_count) {
                return Err(FontError::IntervalOutOfRange { index });
            }
            prev_last = Some(iv.last);
        }

        // One pass over the glyph table checks bitmap lengths and
        // accumulates each group's expected inflated size.
        let glyphs_at = r.pos();
        let mut group_sizes = vec![0usize; usize::from(header.group_count)];
        for index in 0..header.glyph_count {
            let g = Glyph::read(&mut r)?;
            if g.bitmap_len as usize != g.packed_len() {
                return Err(FontError::GlyphGeometry { index });
            }
            group_sizes[(index / u32::from(header.group_size)) as usize] += g.aligned_len();
        }

        let kerning_count = usize::from(r.u16()?);
        let kerning_at = r.pos();
        let mut prev_pair: Option<(u32, u32)> = None;
        for index in 0..kerning_count {
            let pair = (r.u32()?, r.u32()?);
            r.skip(2)?;
            if prev_pair.is_some_and(|p| pair <= p) {
                return Err(FontError::KerningOrder { index });
            }
            prev_pair = Some(pair);
        }

        let ligature_count = usize::from(r.u16()?);
        let ligatures_at = r.pos();
        let mut prev_pair: Option<(u32, u32)> = None;
        for index in 0..ligature_count {
            let pair = (r.u32()?, r.u32()?);
            r.skip(4)?;
            if prev_pair.is_some_and(|p| pair <= p) {
                return Err(FontError::LigatureOrder { index });
            }
            prev_pair = Some(pair);
        }

        let groups_at = r.pos();
        let mut groups = Vec::with_capacity(usize::from(header.group_count));
        for _ in 0..header.group_count {
            groups.push(Group::read(&mut r)?);
        }
        let blob_at = r.pos();
        let blob_len = data.len() - blob_at;
        for (index, group) in groups.iter().enumerate() {
            let end = u64::from(group.compressed_offset) + u64::from(group.compressed_len);
            if end > blob_len as u64 {
                return Err(FontError::GroupBounds {
                    index: index as u16,
                });
            }
            if group.uncompressed_len as usize != group_sizes[index] {
                return Err(FontError::GroupSize {
                    index: index as u16,
                });
            }
        }

        Ok(Self {
            data,
            header,
            intervals_at,
            glyphs_at,
            kerning_at,
            kerning_count,
            ligatures_at,
            ligature_count,
            groups_at,
            blob_at,
        })
    }

    // ------------------------------------------------------------------
    // Metrics
    // ------------------------------------------------------------------

    /// Line height in pixels.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.header.height
    }

    /// Baseline distance from the line top, in pixels.
    #[must_use]
    pub fn ascender(&self) -> u16 {
        self.header.ascender
    }

    /// Style variants present in the asset, as a [`FontStyle::bit`] mask.
    #[must_use]
    pub fn styles(&self) -> u8 {
        self.header.styles
    }

    /// Glyphs per codepoint.
    #[must_use]
    pub fn style_slots(&self) -> u32 {
        u32::from(self.header.styles.count_ones())
    }

    #[must_use]
    pub fn glyph_count(&self) -> u32 {
        self.header.glyph_count
    }

    /// Identity key for cache bookkeeping. Two faces over the same bytes
    /// share a key; reloading the asset elsewhere in memory does not.
    #[must_use]
    pub fn key(&self) -> FontKey {
        FontKey {
            ptr: self.data.as_ptr() as usize,
            len: self.data.len(),
        }
    }

    // ------------------------------------------------------------------
    // Raw record access (indices validated by `parse`)
    // ------------------------------------------------------------------

    fn interval(&self, index: usize) -> Interval {
        let at = self.intervals_at + index * INTERVAL_LEN;
        Interval {
            first: read_u32(self.data, at),
            last: read_u32(self.data, at + 4),
            offset: read_u32(self.data, at + 8),
        }
    }

    /// Glyph record for a table index, or `None` past the table.
    #[must_use]
    pub fn glyph(&self, index: u32) -> Option<Glyph> {
        if index >= self.header.glyph_count {
            return None;
        }
        let at = self.glyphs_at + index as usize * GLYPH_LEN;
        Some(Glyph {
            bitmap_len: read_u32(self.data, at),
            width: read_u16(self.data, at + 4),
            height: read_u16(self.data, at + 6),
            x_advance: read_u16(self.data, at + 8),
            x_offset: read_i16(self.data, at + 10),
            y_offset: read_i16(self.data, at + 12),
        })
    }

    /// Group record for a group index, or `None` past the table.
    #[must_use]
    pub fn group(&self, index: u16) -> Option<Group> {
        if index >= self.header.group_count {
            return None;
        }
        let at = self.groups_at + usize::from(index) * GROUP_LEN;
        Some(Group {
            compressed_offset: read_u32(self.data, at),
            compressed_len: read_u32(self.data, at + 4),
            uncompressed_len: read_u32(self.data, at + 8),
        })
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Glyph table index of `cp` rendered in `style`, if the asset covers
    /// the codepoint. Missing styles degrade per [`resolve_style`].
    #[must_use]
    pub fn glyph_index(&self, cp: u32, style: FontStyle) -> Option<u32> {
        let count = usize::from(self.header.interval_count);
        // Intervals are sorted and disjoint; find the first whose end
        // does not precede cp.
        let mut lo = 0usize;
        let mut hi = count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.interval(mid).last < cp {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo == count {
            return None;
        }
        let iv = self.interval(lo);
        if cp < iv.first {
            return None;
        }
        let slot = style_slot(self.header.styles, style);
        Some(iv.offset + (cp - iv.first) * self.style_slots() + slot)
    }

    /// Codepoint lookup with fallback to the replacement glyph.
    #[must_use]
    pub fn glyph_for(&self, cp: u32, style: FontStyle) -> Option<Glyph> {
        let index = self
            .glyph_index(cp, style)
            .or_else(|| self.glyph_index(REPLACEMENT, style))?;
        self.glyph(index)
    }

    /// Group that holds a glyph index.
    #[must_use]
    pub fn group_of(&self, glyph_index: u32) -> u16 {
        (glyph_index / u32::from(self.header.group_size)) as u16
    }

    /// Glyph index range covered by a group.
    #[must_use]
    pub fn group_span(&self, group_index: u16) -> std::ops::Range<u32> {
        let size = u32::from(self.header.group_size);
        let start = u32::from(group_index) * size;
        start..(start + size).min(self.header.glyph_count)
    }

    /// Compressed bytes of a group inside the blob.
    #[must_use]
    pub fn compressed_group(&self, group_index: u16) -> Option<&'a [u8]> {
        let g = self.group(group_index)?;
        let start = self.blob_at + g.compressed_offset as usize;
        Some(&self.data[start..start + g.compressed_len as usize])
    }

    /// Byte offset of a glyph inside its inflated group.
    #[must_use]
    pub fn aligned_offset(&self, glyph_index: u32) -> usize {
        let span = self.group_span(self.group_of(glyph_index));
        let mut offset = 0usize;
        for index in span.start..glyph_index {
            if let Some(g) = self.glyph(index) {
                offset += g.aligned_len();
            }
        }
        offset
    }

    // ------------------------------------------------------------------
    // Pair tables
    // ------------------------------------------------------------------

    /// Kerning adjustment between two codepoints, zero when unlisted.
    #[must_use]
    pub fn kerning(&self, left: u32, right: u32) -> i16 {
        match self.find_pair(self.kerning_at, self.kerning_count, KERNING_LEN, left, right) {
            Some(at) => read_i16(self.data, at + 8),
            None => 0,
        }
    }

    /// Ligature replacing a codepoint pair, if the asset defines one.
    #[must_use]
    pub fn ligature(&self, left: u32, right: u32) -> Option<u32> {
        self.find_pair(
            self.ligatures_at,
            self.ligature_count,
            LIGATURE_LEN,
            left,
            right,
        )
        .map(|at| read_u32(self.data, at + 8))
    }

    /// Table ligature first, then the standard f-ligatures.
    fn ligature_for(&self, left: u32, right: u32) -> Option<u32> {
        self.ligature(left, right).or_else(|| f_ligature(left, right))
    }

    fn find_pair(
        &self,
        table_at: usize,
        count: usize,
        record_len: usize,
        left: u32,
        right: u32,
    ) -> Option<usize> {
        let key = (left, right);
        let mut lo = 0usize;
        let mut hi = count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let at = table_at + mid * record_len;
            let pair = (read_u32(self.data, at), read_u32(self.data, at + 4));
            match pair.cmp(&key) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return Some(at),
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Measurement
    // ------------------------------------------------------------------

    /// Advance width of one codepoint, through the replacement fallback.
    #[must_use]
    pub fn advance_of(&self, cp: u32, style: FontStyle) -> u32 {
        self.glyph_for(cp, style)
            .map_or(0, |g| u32::from(g.x_advance))
    }

    /// Advance width of a string, applying ligature collapsing and,
    /// when `kern` is set, pairwise kerning.
    ///
    /// Ligatures chain left to right, so a table carrying both
    /// (f, f) -> ff and (ff, i) -> ffi collapses "ffi" to one glyph.
    #[must_use]
    pub fn advance(&self, text: &str, style: FontStyle, kern: bool) -> u32 {
        let mut total: i64 = 0;
        let mut pending: Option<u32> = None;
        for ch in text.chars() {
            let cp = u32::from(ch);
            if let Some(prev) = pending {
                if let Some(lig) = self.ligature_for(prev, cp) {
                    if self.glyph_index(lig, style).is_some() {
                        pending = Some(lig);
                        continue;
                    }
                }
                total += i64::from(self.advance_of(prev, style));
                if kern {
                    total += i64::from(self.kerning(prev, cp));
                }
            }
            pending = Some(cp);
        }
        if let Some(prev) = pending {
            total += i64::from(self.advance_of(prev, style));
        }
        total.max(0) as u32
    }
}

/// The Latin f-ligatures, chained so ff + i becomes ffi.
///
/// Substitution only applies when the asset actually carries the target
/// glyph; the caller checks.
fn f_ligature(left: u32, right: u32) -> Option<u32> {
    const F: u32 = 'f' as u32;
    const I: u32 = 'i' as u32;
    const L: u32 = 'l' as u32;
    const FF: u32 = 0xFB00;
    const FI: u32 = 0xFB01;
    const FL: u32 = 0xFB02;
    const FFI: u32 = 0xFB03;
    const FFL: u32 = 0xFB04;
    match (left, right) {
        (F, F) => Some(FF),
        (F, I) => Some(FI),
        (F, L) => Some(FL),
        (FF, I) => Some(FFI),
        (FF, L) => Some(FFL),
        _ => None,
    }
}

#[inline]
fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

#[inline]
fn read_i16(data: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([data[at], data[at + 1]])
}

#[inline]
fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_resolution_degrades() {
        let all = 0b1111;
        assert_eq!(resolve_style(all, FontStyle::BoldItalic), FontStyle::BoldItalic);
        let rb = FontStyle::Regular.bit() | FontStyle::Bold.bit();
        assert_eq!(resolve_style(rb, FontStyle::BoldItalic), FontStyle::Bold);
        assert_eq!(resolve_style(rb, FontStyle::Italic), FontStyle::Regular);
        let ri = FontStyle::Regular.bit() | FontStyle::Italic.bit();
        assert_eq!(resolve_style(ri, FontStyle::BoldItalic), FontStyle::Italic);
        let r = FontStyle::Regular.bit();
        assert_eq!(resolve_style(r, FontStyle::Bold), FontStyle::Regular);

        // Bold-italic stands in for any missing non-regular variant.
        let rbi = FontStyle::Regular.bit() | FontStyle::BoldItalic.bit();
        assert_eq!(resolve_style(rbi, FontStyle::Bold), FontStyle::BoldItalic);
        assert_eq!(resolve_style(rbi, FontStyle::Italic), FontStyle::BoldItalic);
        assert_eq!(resolve_style(rbi, FontStyle::Regular), FontStyle::Regular);
        let no_italic = 0b1011;
        assert_eq!(resolve_style(no_italic, FontStyle::Italic), FontStyle::BoldItalic);
        assert_eq!(resolve_style(no_italic, FontStyle::Bold), FontStyle::Bold);
        let no_bold = 0b1101;
        assert_eq!(resolve_style(no_bold, FontStyle::Bold), FontStyle::BoldItalic);
        assert_eq!(resolve_style(no_bold, FontStyle::Italic), FontStyle::Italic);
    }

    #[test]
    fn style_slots_are_dense() {
        // Regular + italic: italic occupies slot 1, bold degrades to slot 0.
        let ri = FontStyle::Regular.bit() | FontStyle::Italic.bit();
        assert_eq!(style_slot(ri, FontStyle::Regular), 0);
        assert_eq!(style_slot(ri, FontStyle::Italic), 1);
        assert_eq!(style_slot(ri, FontStyle::Bold), 0);
        let all = 0b1111;
        assert_eq!(style_slot(all, FontStyle::BoldItalic), 3);
        // Regular + bold-italic: bold and italic requests land on slot 1.
        let rbi = FontStyle::Regular.bit() | FontStyle::BoldItalic.bit();
        assert_eq!(style_slot(rbi, FontStyle::Bold), 1);
        assert_eq!(style_slot(rbi, FontStyle::Italic), 1);
        assert_eq!(style_slot(rbi, FontStyle::Regular), 0);
    }
}
