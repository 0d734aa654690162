//! Measurement seam between layout and the renderer.

use inkline_font::{FontFace, FontStyle};

/// Soft hyphen, invisible in measurement and output.
pub(crate) const SOFT_HYPHEN: char = '\u{00AD}';

/// Pixel widths the line breaker needs.
///
/// Implemented by [`FontFace`] for real rendering and by
/// [`FixedMeasure`] for deterministic tests.
pub trait Measure {
    fn space_width(&self, style: FontStyle) -> u32;
    fn advance(&self, text: &str, style: FontStyle) -> u32;
}

impl Measure for FontFace<'_> {
    fn space_width(&self, style: FontStyle) -> u32 {
        self.advance_of(u32::from(' '), style)
    }

    fn advance(&self, text: &str, style: FontStyle) -> u32 {
        FontFace::advance(self, text, style, true)
    }
}

/// Fixed-width metrics: every glyph is `char_width` pixels, a space is
/// `space` pixels. Keeps layout tests independent of any font asset.
#[derive(Clone, Copy, Debug)]
pub struct FixedMeasure {
    pub char_width: u32,
    pub space: u32,
}

impl Default for FixedMeasure {
    fn default() -> Self {
        Self {
            char_width: 8,
            space: 5,
        }
    }
}

impl Measure for FixedMeasure {
    fn space_width(&self, _style: FontStyle) -> u32 {
        self.space
    }

    fn advance(&self, text: &str, _style: FontStyle) -> u32 {
        text.chars().count() as u32 * self.char_width
    }
}

/// Width of one token: soft hyphens are invisible, and a candidate
/// break measures with its inserted hyphen.
pub(crate) fn word_width<M: Measure + ?Sized>(
    measure: &M,
    text: &str,
    style: FontStyle,
    append_hyphen: bool,
) -> u32 {
    if text == " " && !append_hyphen {
        return measure.space_width(style);
    }
    let has_soft_hyphen = text.contains(SOFT_HYPHEN);
    if !has_soft_hyphen && !append_hyphen {
        return measure.advance(text, style);
    }
    let mut sanitized = if has_soft_hyphen {
        text.chars().filter(|&c| c != SOFT_HYPHEN).collect()
    } else {
        text.to_owned()
    };
    if append_hyphen {
        sanitized.push('-');
    }
    measure.advance(&sanitized, style)
}
