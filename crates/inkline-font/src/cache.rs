//! Glyph bitmap decompression cache.
//!
//! Bitmaps live in the asset as deflate-compressed groups. The cache
//! keeps a small arena of inflated groups, evicted least-recently-used,
//! plus an optional page buffer: [`BitmapCache::prewarm`] inflates every
//! group a page needs once and keeps only the dense per-glyph bitmaps,
//! so rendering the page never touches the decompressor again.
//!
//! Both paths hand out the same dense packing, 2 bits per pixel with no
//! row padding, and are bit-identical for a given glyph.

use std::io::Read;
use std::time::Instant;

use flate2::read::DeflateDecoder;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::face::{FontFace, FontKey, FontStyle};

/// Inflated groups kept around by default.
pub const DEFAULT_SLOTS: usize = 4;

/// Hard cap on glyphs a page buffer will hold.
pub const MAX_PAGE_GLYPHS: usize = 512;

// ============================================================================
// Stats
// ============================================================================

/// Counters since the last [`BitmapCache::reset_stats`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheStats {
    pub bitmap_calls: u64,
    /// Lookups served from the page buffer.
    pub page_hits: u64,
    /// Lookups served from an already-inflated slot.
    pub cache_hits: u64,
    /// Lookups that had to inflate a group.
    pub cache_misses: u64,
    pub groups_inflated: u64,
    pub inflate_nanos: u64,
    pub lookup_nanos: u64,
    pub page_glyphs: usize,
    pub page_bytes: usize,
    /// Largest transient group buffer prewarm held at once.
    pub peak_temp_bytes: usize,
}

// ============================================================================
// Cache
// ============================================================================

struct Slot {
    key: Option<(FontKey, u16)>,
    buf: Vec<u8>,
    last_used: u64,
}

struct PageEntry {
    glyph_index: u32,
    offset: u32,
    len: u32,
}

struct PageBuffer {
    font: FontKey,
    data: Vec<u8>,
    // Sorted by glyph_index.
    entries: Vec<PageEntry>,
}

impl PageBuffer {
    fn lookup(&self, glyph_index: u32) -> Option<(usize, usize)> {
        self.entries
            .binary_search_by_key(&glyph_index, |e| e.glyph_index)
            .ok()
            .map(|i| (self.entries[i].offset as usize, self.entries[i].len as usize))
    }
}

/// LRU arena of inflated glyph groups with an optional prewarmed page.
pub struct BitmapCache {
    slots: Vec<Slot>,
    clock: u64,
    page: Option<PageBuffer>,
    scratch: Vec<u8>,
    stats: CacheStats,
}

impl Default for BitmapCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BitmapCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_SLOTS)
    }

    #[must_use]
    pub fn with_slots(slots: usize) -> Self {
        let slots = slots.max(1);
        Self {
            slots: (0..slots)
                .map(|_| Slot {
                    key: None,
                    buf: Vec::new(),
                    last_used: 0,
                })
                .collect(),
            clock: 0,
            page: None,
            scratch: Vec::new(),
            stats: CacheStats::default(),
        }
    }

    /// Dense bitmap of one glyph, valid until the next cache call.
    ///
    /// Serves the page buffer first, then the slot arena, inflating the
    /// glyph's group on a miss. The returned slice holds
    /// [`crate::format::Glyph::packed_len`] bytes.
    pub fn bitmap(&mut self, face: &FontFace<'_>, glyph_index: u32) -> Result<&[u8], CacheError> {
        let start = Instant::now();
        self.stats.bitmap_calls += 1;
        let key = face.key();

        let mut page_slice = None;
        if let Some(page) = &self.page {
            if page.font == key {
                page_slice = page.lookup(glyph_index);
            }
        }
        if let Some((offset, len)) = page_slice {
            self.stats.page_hits += 1;
            self.stats.lookup_nanos += start.elapsed().as_nanos() as u64;
            if let Some(page) = &self.page {
                return Ok(&page.data[offset..offset + len]);
            }
        }

        let Some(glyph) = face.glyph(glyph_index) else {
            return Err(CacheError::GlyphOutOfRange {
                index: glyph_index,
                count: face.glyph_count(),
            });
        };
        let group_index = face.group_of(glyph_index);

        let mut found = None;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.key == Some((key, group_index)) {
                found = Some(i);
                break;
            }
        }
        let slot_index = match found {
            Some(i) => {
                self.stats.cache_hits += 1;
                i
            }
            None => {
                self.stats.cache_misses += 1;
                let victim = self.victim();
                // Invalidate first so a failed inflate can't leave a
                // stale key over garbage bytes.
                self.slots[victim].key = None;
                let inflate_start = Instant::now();
                let mut buf = std::mem::take(&mut self.slots[victim].buf);
                let result = load_group(face, group_index, &mut buf);
                self.slots[victim].buf = buf;
                self.stats.inflate_nanos += inflate_start.elapsed().as_nanos() as u64;
                result?;
                self.stats.groups_inflated += 1;
                self.slots[victim].key = Some((key, group_index));
                victim
            }
        };
        self.clock += 1;
        self.slots[slot_index].last_used = self.clock;

        let offset = face.aligned_offset(glyph_index);
        let aligned = glyph.aligned_len();
        if offset + aligned > self.slots[slot_index].buf.len() {
            return Err(CacheError::Corrupt { index: glyph_index });
        }
        self.scratch.clear();
        self.scratch.resize(glyph.packed_len(), 0);
        let slot = &self.slots[slot_index];
        compact_glyph(
            &slot.buf[offset..offset + aligned],
            &mut self.scratch,
            glyph.width,
            glyph.height,
        );
        self.stats.lookup_nanos += start.elapsed().as_nanos() as u64;
        Ok(&self.scratch[..])
    }

    /// Build the page buffer for `text` rendered with `face`.
    ///
    /// Collects every glyph the text can touch, all style variants
    /// included, inflates each needed group once, and keeps only the
    /// dense bitmaps. Replaces any previous page. Returns the number of
    /// glyphs that could not be loaded.
    pub fn prewarm(&mut self, face: &FontFace<'_>, text: &str) -> usize {
        self.page = None;
        self.stats.page_glyphs = 0;
        self.stats.page_bytes = 0;
        let slots = face.style_slots();

        let mut seen = FxHashSet::default();
        let mut needed: Vec<u32> = Vec::new();
        'chars: for ch in text.chars() {
            let cp = u32::from(ch);
            let Some(base) = face
                .glyph_index(cp, FontStyle::Regular)
                .or_else(|| face.glyph_index(crate::face::REPLACEMENT, FontStyle::Regular))
            else {
                continue;
            };
            for slot in 0..slots {
                let index = base + slot;
                if seen.insert(index) {
                    if needed.len() == MAX_PAGE_GLYPHS {
                        debug!(cap = MAX_PAGE_GLYPHS, "page buffer cap reached");
                        break 'chars;
                    }
                    needed.push(index);
                }
            }
        }
        if needed.is_empty() {
            return 0;
        }
        needed.sort_unstable();

        let total: usize = needed
            .iter()
            .filter_map(|&i| face.glyph(i))
            .map(|g| g.packed_len())
            .sum();
        let mut data = Vec::with_capacity(total);
        let mut entries = Vec::with_capacity(needed.len());
        let mut missed = 0usize;

        let mut temp = Vec::new();
        let mut at = 0usize;
        while at < needed.len() {
            let group_index = face.group_of(needed[at]);
            let span = face.group_span(group_index);
            let run_end = needed[at..]
                .iter()
                .position(|&i| i >= span.end)
                .map_or(needed.len(), |p| at + p);

            let inflate_start = Instant::now();
            let loaded = load_group(face, group_index, &mut temp);
            self.stats.inflate_nanos += inflate_start.elapsed().as_nanos() as u64;
            match loaded {
                Ok(()) => {
                    self.stats.groups_inflated += 1;
                    self.stats.peak_temp_bytes = self.stats.peak_temp_bytes.max(temp.len());
                    // Walk the group once, compacting the needed glyphs.
                    let mut aligned_offset = 0usize;
                    let mut cursor = at;
                    for index in span.clone() {
                        let Some(g) = face.glyph(index) else { break };
                        if cursor < run_end && needed[cursor] == index {
                            let packed = g.packed_len();
                            let start = data.len();
                            data.resize(start + packed, 0);
                            compact_glyph(
                                &temp[aligned_offset..aligned_offset + g.aligned_len()],
                                &mut data[start..],
                                g.width,
                                g.height,
                            );
                            entries.push(PageEntry {
                                glyph_index: index,
                                offset: start as u32,
                                len: packed as u32,
                            });
                            cursor += 1;
                        }
                        aligned_offset += g.aligned_len();
                    }
                }
                Err(err) => {
                    warn!(group = group_index, error = %err, "prewarm skipped group");
                    missed += run_end - at;
                }
            }
            at = run_end;
        }

        self.stats.page_glyphs = entries.len();
        self.stats.page_bytes = data.len();
        self.page = Some(PageBuffer {
            font: face.key(),
            data,
            entries,
        });
        missed
    }

    /// Drop the page buffer and every slot.
    pub fn clear(&mut self) {
        self.page = None;
        for slot in &mut self.slots {
            slot.key = None;
            slot.buf = Vec::new();
            slot.last_used = 0;
        }
        self.clock = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Emit the counters through tracing and reset them.
    pub fn log_stats(&mut self, label: &str) {
        let s = self.stats;
        debug!(
            label,
            calls = s.bitmap_calls,
            page_hits = s.page_hits,
            hits = s.cache_hits,
            misses = s.cache_misses,
            groups = s.groups_inflated,
            inflate_us = s.inflate_nanos / 1_000,
            lookup_us = s.lookup_nanos / 1_000,
            page_glyphs = s.page_glyphs,
            page_bytes = s.page_bytes,
            peak_temp = s.peak_temp_bytes,
            "bitmap cache stats"
        );
        self.reset_stats();
    }

    /// First empty slot, else the least recently used one.
    fn victim(&self) -> usize {
        let mut victim = 0usize;
        let mut best = u64::MAX;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.key.is_none() {
                return i;
            }
            if slot.last_used < best {
                best = slot.last_used;
                victim = i;
            }
        }
        victim
    }
}

// ============================================================================
// Inflate and compaction
// ============================================================================

/// Inflate one group into `out`, enforcing the exact declared size.
///
/// The decoder output is capped one byte past the declared size, so a
/// stream that overruns shows up as a length mismatch instead of an
/// unbounded allocation.
fn load_group(face: &FontFace<'_>, group_index: u16, out: &mut Vec<u8>) -> Result<(), CacheError> {
    let (bytes, expected) = match (face.compressed_group(group_index), face.group(group_index)) {
        (Some(bytes), Some(group)) => (bytes, group.uncompressed_len as usize),
        _ => {
            return Err(CacheError::Corrupt {
                index: u32::from(group_index),
            });
        }
    };
    out.clear();
    out.reserve(expected);
    let mut decoder = DeflateDecoder::new(bytes);
    decoder
        .take(expected as u64 + 1)
        .read_to_end(out)
        .map_err(|source| CacheError::Inflate {
            group: group_index,
            source,
        })?;
    if out.len() != expected {
        return Err(CacheError::SizeMismatch {
            group: group_index,
            expected,
            actual: out.len(),
        });
    }
    Ok(())
}

/// Repack a byte-aligned glyph into the dense 2-bit stream.
fn compact_glyph(aligned: &[u8], out: &mut [u8], width: u16, height: u16) {
    let width = usize::from(width);
    let height = usize::from(height);
    let stride = (width + 3) / 4;
    if width % 4 == 0 {
        // No row padding; the aligned bytes already are the dense form.
        out.copy_from_slice(&aligned[..out.len()]);
        return;
    }
    let mut acc = 0u32;
    let mut bits = 0u32;
    let mut written = 0usize;
    for y in 0..height {
        let row = &aligned[y * stride..y * stride + stride];
        for x in 0..width {
            let px = (row[x / 4] >> ((3 - (x % 4)) * 2)) & 0b11;
            acc = (acc << 2) | u32::from(px);
            bits += 2;
            if bits == 8 {
                out[written] = acc as u8;
                written += 1;
                acc = 0;
                bits = 0;
            }
        }
    }
    if bits > 0 {
        out[written] = (acc << (8 - bits)) as u8;
    }
}
