//! Font asset encoder.
//!
//! Mirrors the offline conversion tool closely enough that tests and
//! fixtures can build real assets in memory: glyphs are grouped, each
//! group's byte-aligned interior is deflate-compressed, and the tables
//! are emitted in the order [`crate::format`] documents.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;
use thiserror::Error;

use crate::format::FONT_MARKER;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("codepoint {cp:#06x} carries {found} variants, asset has {expected} style slots")]
    StyleCount { cp: u32, expected: u32, found: usize },

    #[error("codepoint {cp:#06x} variant {slot} has {found} pixels, dimensions need {expected}")]
    PixelCount {
        cp: u32,
        slot: usize,
        expected: usize,
        found: usize,
    },

    #[error("codepoint {cp:#06x} variant {slot} has a pixel value above 3")]
    PixelRange { cp: u32, slot: usize },

    #[error("deflate failed: {0}")]
    Deflate(#[from] std::io::Error),
}

/// One glyph variant: metrics plus one byte per pixel, values 0..=3,
/// row-major.
#[derive(Clone, Debug)]
pub struct GlyphSpec {
    pub width: u16,
    pub height: u16,
    pub x_advance: u16,
    pub x_offset: i16,
    pub y_offset: i16,
    pub pixels: Vec<u8>,
}

impl GlyphSpec {
    /// An empty glyph that still advances the pen, e.g. a space.
    #[must_use]
    pub fn spacer(x_advance: u16) -> Self {
        Self {
            width: 0,
            height: 0,
            x_advance,
            x_offset: 0,
            y_offset: 0,
            pixels: Vec::new(),
        }
    }
}

/// In-memory asset builder.
pub struct FontBuilder {
    height: u16,
    ascender: u16,
    styles: u8,
    group_size: u16,
    glyphs: BTreeMap<u32, Vec<GlyphSpec>>,
    kerning: BTreeMap<(u32, u32), i16>,
    ligatures: BTreeMap<(u32, u32), u32>,
}

impl FontBuilder {
    #[must_use]
    pub fn new(height: u16, ascender: u16, styles: u8, group_size: u16) -> Self {
        Self {
            height,
            ascender,
            styles,
            group_size: group_size.max(1),
            glyphs: BTreeMap::new(),
            kerning: BTreeMap::new(),
            ligatures: BTreeMap::new(),
        }
    }

    /// Register a codepoint with one variant per style slot, regular
    /// first, in ascending [`crate::FontStyle::bit`] order.
    pub fn glyph(&mut self, cp: char, variants: Vec<GlyphSpec>) -> &mut Self {
        self.glyphs.insert(u32::from(cp), variants);
        self
    }

    pub fn kerning(&mut self, left: char, right: char, adjust: i16) -> &mut Self {
        self.kerning.insert((u32::from(left), u32::from(right)), adjust);
        self
    }

    pub fn ligature(&mut self, left: char, right: char, replacement: char) -> &mut Self {
        self.ligatures
            .insert((u32::from(left), u32::from(right)), u32::from(replacement));
        self
    }

    /// Serialize the asset.
    pub fn build(&self) -> Result<Vec<u8>, EncodeError> {
        let slots = u32::from(self.styles.count_ones());
        for (&cp, variants) in &self.glyphs {
            if variants.len() != slots as usize {
                return Err(EncodeError::StyleCount {
                    cp,
                    expected: slots,
                    found: variants.len(),
                });
            }
            for (slot, v) in variants.iter().enumerate() {
                let expected = usize::from(v.width) * usize::from(v.height);
                if v.pixels.len() != expected {
                    return Err(EncodeError::PixelCount {
                        cp,
                        slot,
                        expected,
                        found: v.pixels.len(),
                    });
                }
                if v.pixels.iter().any(|&p| p > 3) {
                    return Err(EncodeError::PixelRange { cp, slot });
                }
            }
        }

        // Intervals over consecutive codepoints; offsets in glyph units.
        let mut intervals: Vec<(u32, u32, u32)> = Vec::new();
        let mut offset = 0u32;
        for &cp in self.glyphs.keys() {
            match intervals.last_mut() {
                Some((_, last, _)) if *last + 1 == cp => *last = cp,
                _ => intervals.push((cp, cp, offset)),
            }
            offset += slots;
        }

        // Flat glyph list in table order.
        let flat: Vec<&GlyphSpec> = self.glyphs.values().flatten().collect();
        let glyph_count = flat.len() as u32;
        let group_count = glyph_count.div_ceil(u32::from(self.group_size)) as u16;

        // Compress each group's byte-aligned interior.
        let mut blob = Vec::new();
        let mut groups: Vec<(u32, u32, u32)> = Vec::new();
        for chunk in flat.chunks(usize::from(self.group_size)) {
            let mut raw = Vec::new();
            for spec in chunk {
                pack_aligned(spec, &mut raw);
            }
            let start = blob.len() as u32;
            let mut enc = DeflateEncoder::new(&mut blob, Compression::best());
            enc.write_all(&raw)?;
            enc.finish()?;
            groups.push((start, blob.len() as u32 - start, raw.len() as u32));
        }

        let mut out = Vec::new();
        put_u16(&mut out, FONT_MARKER);
        put_u16(&mut out, self.height);
        put_u16(&mut out, self.ascender);
        out.push(self.styles);
        put_u16(&mut out, intervals.len() as u16);
        put_u32(&mut out, glyph_count);
        put_u16(&mut out, self.group_size);
        put_u16(&mut out, group_count);
        for (first, last, off) in intervals {
            put_u32(&mut out, first);
            put_u32(&mut out, last);
            put_u32(&mut out, off);
        }
        for spec in &flat {
            let packed = (usize::from(spec.width) * usize::from(spec.height) + 3) / 4;
            put_u32(&mut out, packed as u32);
            put_u16(&mut out, spec.width);
            put_u16(&mut out, spec.height);
            put_u16(&mut out, spec.x_advance);
            put_i16(&mut out, spec.x_offset);
            put_i16(&mut out, spec.y_offset);
        }
        put_u16(&mut out, self.kerning.len() as u16);
        for (&(left, right), &adjust) in &self.kerning {
            put_u32(&mut out, left);
            put_u32(&mut out, right);
            put_i16(&mut out, adjust);
        }
        put_u16(&mut out, self.ligatures.len() as u16);
        for (&(left, right), &lig) in &self.ligatures {
            put_u32(&mut out, left);
            put_u32(&mut out, right);
            put_u32(&mut out, lig);
        }
        for (start, len, raw_len) in groups {
            put_u32(&mut out, start);
            put_u32(&mut out, len);
            put_u32(&mut out, raw_len);
        }
        out.extend_from_slice(&blob);
        Ok(out)
    }
}

/// Pack one glyph as 2-bit pixels with every row padded to a byte,
/// first pixel of each byte in the high bits.
fn pack_aligned(spec: &GlyphSpec, out: &mut Vec<u8>) {
    for row in spec.pixels.chunks(usize::from(spec.width).max(1)) {
        let mut byte = 0u8;
        for (x, &px) in row.iter().enumerate() {
            byte |= px << ((3 - (x % 4)) * 2);
            if x % 4 == 3 {
                out.push(byte);
                byte = 0;
            }
        }
        if row.len() % 4 != 0 {
            out.push(byte);
        }
    }
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}
