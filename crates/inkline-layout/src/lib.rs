//! Paragraph line breaking and justification for e-ink pages.
//!
//! Tokens go in via [`Paragraph::add_word`]; lines come out of
//! [`Paragraph::layout_lines`] with per-word pixel positions. Widths
//! flow through the [`Measure`] seam, implemented by
//! `inkline_font::FontFace` for real rendering and by [`FixedMeasure`]
//! for tests. Hyphenation breakpoints come from `inkline_hyphen`.
//!
//! ```
//! use inkline_font::FontStyle;
//! use inkline_layout::{Alignment, FixedMeasure, LayoutOptions, Paragraph};
//!
//! let mut p = Paragraph::new();
//! for word in ["a", "few", "short", "words"] {
//!     p.add_word(word, FontStyle::Regular, false, false);
//! }
//! let options = LayoutOptions {
//!     alignment: Alignment::Left,
//!     extra_paragraph_spacing: true,
//!     ..LayoutOptions::default()
//! };
//! let mut lines = Vec::new();
//! p.layout_lines(&FixedMeasure::default(), 160, &options, &mut |l| lines.push(l));
//! assert_eq!(lines.len(), 1);
//! ```

#![forbid(unsafe_code)]

pub mod line;
pub mod measure;
pub mod paragraph;
pub mod token;

pub use line::{Line, LineWord};
pub use measure::{FixedMeasure, Measure};
pub use paragraph::{Alignment, LayoutOptions, Paragraph};
pub use token::Word;
