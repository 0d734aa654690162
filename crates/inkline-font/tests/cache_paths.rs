//! Hot-path and page-buffer behavior of the bitmap cache: LRU eviction
//! order, prewarm bit-identity with the cold path, and corrupt-stream
//! detection.

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;
use proptest::prelude::*;

use inkline_font::{BitmapCache, CacheError, FontBuilder, FontFace, FontStyle, GlyphSpec};

fn pixels_for(ch: char, slot: usize) -> Vec<u8> {
    let cp = u32::from(ch) as usize;
    (0..15).map(|i| ((cp + slot * 7 + i * 3) % 4) as u8).collect()
}

fn variant(ch: char, slot: usize) -> GlyphSpec {
    GlyphSpec {
        width: 5,
        height: 3,
        x_advance: 6,
        x_offset: 0,
        y_offset: -2,
        pixels: pixels_for(ch, slot),
    }
}

/// Regular + bold over space, a..c, x..y, and the replacement glyph;
/// two glyphs per group gives one group per codepoint.
fn fixture() -> Vec<u8> {
    let styles = FontStyle::Regular.bit() | FontStyle::Bold.bit();
    let mut b = FontBuilder::new(14, 11, styles, 2);
    b.glyph(' ', vec![GlyphSpec::spacer(4), GlyphSpec::spacer(4)]);
    for ch in ['a', 'b', 'c', 'x', 'y', '\u{FFFD}'] {
        b.glyph(ch, vec![variant(ch, 0), variant(ch, 1)]);
    }
    b.build().unwrap()
}

/// Dense 2-bit packing computed independently of the cache.
fn pack_dense(pixels: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; (pixels.len() + 3) / 4];
    for (i, &px) in pixels.iter().enumerate() {
        out[i / 4] |= px << ((3 - (i % 4)) * 2);
    }
    out
}

fn index(face: &FontFace<'_>, ch: char, style: FontStyle) -> u32 {
    face.glyph_index(u32::from(ch), style).unwrap()
}

#[test]
fn cold_path_yields_dense_pixels() {
    let bytes = fixture();
    let face = FontFace::parse(&bytes).unwrap();
    let mut cache = BitmapCache::new();
    for (ch, style, slot) in [
        ('a', FontStyle::Regular, 0),
        ('a', FontStyle::Bold, 1),
        ('y', FontStyle::Regular, 0),
    ] {
        let got = cache.bitmap(&face, index(&face, ch, style)).unwrap().to_vec();
        assert_eq!(got, pack_dense(&pixels_for(ch, slot)), "glyph {ch:?} {style:?}");
    }
}

#[test]
fn lru_evicts_least_recent_group() {
    let bytes = fixture();
    let face = FontFace::parse(&bytes).unwrap();
    let mut cache = BitmapCache::with_slots(2);

    let a = index(&face, 'a', FontStyle::Regular);
    let a_bold = index(&face, 'a', FontStyle::Bold);
    let b = index(&face, 'b', FontStyle::Regular);
    let c = index(&face, 'c', FontStyle::Regular);

    cache.bitmap(&face, a).unwrap(); // miss, loads a's group
    cache.bitmap(&face, a).unwrap(); // hit
    cache.bitmap(&face, a_bold).unwrap(); // hit, same group
    cache.bitmap(&face, b).unwrap(); // miss, loads b's group
    cache.bitmap(&face, a).unwrap(); // hit, a now most recent
    cache.bitmap(&face, c).unwrap(); // miss, evicts b's group
    cache.bitmap(&face, b).unwrap(); // miss again, b was evicted

    let stats = cache.stats();
    assert_eq!(stats.bitmap_calls, 7);
    assert_eq!(stats.cache_hits, 3);
    assert_eq!(stats.cache_misses, 4);
    assert_eq!(stats.groups_inflated, 4);
    assert_eq!(stats.page_hits, 0);
}

#[test]
fn prewarm_matches_cold_path_bit_for_bit() {
    let bytes = fixture();
    let face = FontFace::parse(&bytes).unwrap();
    let text = "yab cax!";

    let styles = [FontStyle::Regular, FontStyle::Bold];
    let mut cold = BitmapCache::new();
    let mut expected = Vec::new();
    for ch in text.chars() {
        for style in styles {
            let glyph = face
                .glyph_index(u32::from(ch), style)
                .unwrap_or_else(|| index(&face, '\u{FFFD}', style));
            expected.push((glyph, cold.bitmap(&face, glyph).unwrap().to_vec()));
        }
    }

    let mut warm = BitmapCache::new();
    assert_eq!(warm.prewarm(&face, text), 0);
    warm.reset_stats();
    for (glyph, bits) in &expected {
        assert_eq!(warm.bitmap(&face, *glyph).unwrap(), &bits[..]);
    }
    let stats = warm.stats();
    assert_eq!(stats.page_hits, expected.len() as u64);
    assert_eq!(stats.cache_misses, 0);
    assert_eq!(stats.groups_inflated, 0);
}

#[test]
fn prewarm_covers_every_style_variant() {
    let bytes = fixture();
    let face = FontFace::parse(&bytes).unwrap();
    let mut cache = BitmapCache::new();
    cache.prewarm(&face, "a");
    cache.reset_stats();
    cache.bitmap(&face, index(&face, 'a', FontStyle::Bold)).unwrap();
    assert_eq!(cache.stats().page_hits, 1);
}

#[test]
fn page_buffer_is_keyed_to_the_font() {
    let first = fixture();
    let second = fixture();
    let face_a = FontFace::parse(&first).unwrap();
    let face_b = FontFace::parse(&second).unwrap();

    let mut cache = BitmapCache::new();
    cache.prewarm(&face_a, "abc");
    cache.reset_stats();
    // Same glyph index, different asset bytes: must not hit the page.
    cache.bitmap(&face_b, index(&face_b, 'a', FontStyle::Regular)).unwrap();
    let stats = cache.stats();
    assert_eq!(stats.page_hits, 0);
    assert_eq!(stats.cache_misses, 1);
}

// ----------------------------------------------------------------------
// Corruption
// ----------------------------------------------------------------------

/// One regular 4x1 glyph in one group: tables end at byte 59, the group
/// record sits at 47..59, the blob follows.
fn tiny_fixture() -> Vec<u8> {
    let mut b = FontBuilder::new(10, 8, FontStyle::Regular.bit(), 4);
    b.glyph(
        'a',
        vec![GlyphSpec {
            width: 4,
            height: 1,
            x_advance: 5,
            x_offset: 0,
            y_offset: 0,
            pixels: vec![1, 2, 3, 0],
        }],
    );
    b.build().unwrap()
}

fn splice_blob(mut bytes: Vec<u8>, blob: &[u8]) -> Vec<u8> {
    bytes.truncate(59);
    bytes[47..51].copy_from_slice(&0u32.to_le_bytes());
    bytes[51..55].copy_from_slice(&(blob.len() as u32).to_le_bytes());
    bytes[55..59].copy_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(blob);
    bytes
}

#[test]
fn oversized_stream_is_rejected() {
    // A stream that inflates to two bytes where the group declares one.
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::best());
    enc.write_all(&[0xAA, 0xBB]).unwrap();
    let blob = enc.finish().unwrap();

    let bytes = splice_blob(tiny_fixture(), &blob);
    let face = FontFace::parse(&bytes).unwrap();
    let mut cache = BitmapCache::new();
    match cache.bitmap(&face, 0) {
        Err(CacheError::SizeMismatch { expected, actual, .. }) => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected size mismatch, got {other:?}"),
    }
}

#[test]
fn garbage_stream_is_rejected() {
    // BTYPE 11 is reserved; inflate must fail.
    let bytes = splice_blob(tiny_fixture(), &[0xFF, 0xFF, 0xFF, 0xFF]);
    let face = FontFace::parse(&bytes).unwrap();
    let mut cache = BitmapCache::new();
    assert!(matches!(
        cache.bitmap(&face, 0),
        Err(CacheError::Inflate { group: 0, .. })
    ));
}

#[test]
fn failed_inflate_leaves_no_stale_slot() {
    let bytes = splice_blob(tiny_fixture(), &[0xFF, 0xFF, 0xFF, 0xFF]);
    let face = FontFace::parse(&bytes).unwrap();
    let mut cache = BitmapCache::with_slots(1);
    assert!(cache.bitmap(&face, 0).is_err());
    // The slot must stay invalid: a retry misses again instead of
    // serving garbage.
    assert!(cache.bitmap(&face, 0).is_err());
    assert_eq!(cache.stats().cache_misses, 2);
    assert_eq!(cache.stats().cache_hits, 0);
}

proptest! {
    /// Any glyph shape survives the grouped-deflate round trip: encode,
    /// parse, inflate, compact, and compare with an independently packed
    /// dense stream.
    #[test]
    fn any_glyph_round_trips(
        (width, height, pixels) in (0u16..=12, 0u16..=6).prop_flat_map(|(w, h)| {
            let n = usize::from(w) * usize::from(h);
            proptest::collection::vec(0u8..=3, n..=n).prop_map(move |px| (w, h, px))
        })
    ) {
        let mut b = FontBuilder::new(16, 12, FontStyle::Regular.bit(), 3);
        b.glyph('g', vec![GlyphSpec {
            width,
            height,
            x_advance: 7,
            x_offset: 0,
            y_offset: 0,
            pixels: pixels.clone(),
        }]);
        let bytes = b.build().unwrap();
        let face = FontFace::parse(&bytes).unwrap();
        let mut cache = BitmapCache::new();
        let got = cache.bitmap(&face, 0).unwrap();
        prop_assert_eq!(got, &pack_dense(&pixels)[..]);
    }
}
