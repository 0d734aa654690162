//! Laid-out line records.

use inkline_font::FontStyle;

/// One positioned word on a line. `x` is relative to the line's left
/// edge; soft hyphens have already been stripped from `text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineWord {
    pub text: String,
    pub style: FontStyle,
    pub underline: bool,
    pub x: u32,
    pub width: u32,
}

/// One emitted line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub words: Vec<LineWord>,
    /// Rightmost extent: last word's `x` plus its width.
    pub width: u32,
    /// The line ends in a hyphen the breaker inserted.
    pub hyphenated: bool,
}

impl Line {
    /// Concatenated text with single spaces at non-attached joins.
    /// Mostly a test and debugging convenience.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut prev_end: Option<u32> = None;
        for word in &self.words {
            if prev_end.is_some_and(|end| word.x > end) {
                out.push(' ');
            }
            out.push_str(&word.text);
            prev_end = Some(word.x + word.width);
        }
        out
    }
}
