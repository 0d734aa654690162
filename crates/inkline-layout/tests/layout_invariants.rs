//! Paragraph-level invariants: token round trips, width limits, and
//! layout against real font metrics.

use proptest::prelude::*;

use inkline_font::{FontBuilder, FontFace, FontStyle, GlyphSpec};
use inkline_layout::{Alignment, FixedMeasure, LayoutOptions, Line, Paragraph};

fn paragraph(words: &[String]) -> Paragraph {
    let mut p = Paragraph::new();
    for w in words {
        p.add_word(w.clone(), FontStyle::Regular, false, false);
    }
    p
}

fn collect(p: &Paragraph, width: u32, options: &LayoutOptions) -> Vec<Line> {
    let mut lines = Vec::new();
    p.layout_lines(&FixedMeasure::default(), width, options, &mut |l| {
        lines.push(l)
    });
    lines
}

proptest! {
    /// Without hyphenation, lines partition the token stream exactly
    /// and non-final multi-word justified lines land on the target
    /// width to the pixel.
    #[test]
    fn word_boundary_lines_round_trip(
        words in proptest::collection::vec("[a-z]{1,7}", 1..20),
        width in 60u32..200,
    ) {
        let options = LayoutOptions {
            alignment: Alignment::Justify,
            hyphenation: false,
            extra_paragraph_spacing: true,
            ..LayoutOptions::default()
        };
        let lines = collect(&paragraph(&words), width, &options);

        let flat: Vec<String> = lines
            .iter()
            .flat_map(|l| l.words.iter().map(|w| w.text.clone()))
            .collect();
        prop_assert_eq!(&flat, &words);

        for (i, line) in lines.iter().enumerate() {
            prop_assert!(line.width <= width, "line {i} overflows: {} > {width}", line.width);
            let is_last = i == lines.len() - 1;
            if !is_last && line.words.len() > 1 {
                prop_assert_eq!(line.width, width);
            }
        }
    }

    /// With hyphenation, rejoining split words (dropping inserted
    /// hyphens) reproduces the input tokens, and only a lone
    /// unbreakable word may overflow.
    #[test]
    fn hyphenated_lines_rejoin_to_the_input(
        words in proptest::collection::vec("[a-z]{1,12}", 1..20),
        width in 30u32..200,
    ) {
        let options = LayoutOptions {
            alignment: Alignment::Left,
            hyphenation: true,
            extra_paragraph_spacing: true,
            ..LayoutOptions::default()
        };
        let lines = collect(&paragraph(&words), width, &options);

        let mut rebuilt: Vec<String> = Vec::new();
        let mut carry = String::new();
        for line in &lines {
            for (k, word) in line.words.iter().enumerate() {
                let last_on_line = k == line.words.len() - 1;
                let mut text = word.text.clone();
                if last_on_line && line.hyphenated {
                    prop_assert!(text.ends_with('-'));
                    text.pop();
                }
                carry.push_str(&text);
                // A hyphenated line's tail finishes on the next line.
                if !(last_on_line && line.hyphenated) {
                    rebuilt.push(std::mem::take(&mut carry));
                }
            }
        }
        if !carry.is_empty() {
            rebuilt.push(carry);
        }
        prop_assert_eq!(&rebuilt, &words);

        for line in &lines {
            if line.words.len() > 1 {
                prop_assert!(line.width <= width);
            }
        }
    }
}

#[test]
fn font_metrics_drive_positions() {
    let mut b = FontBuilder::new(16, 12, FontStyle::Regular.bit(), 8);
    b.glyph(' ', vec![GlyphSpec::spacer(5)]);
    for ch in 'a'..='z' {
        b.glyph(ch, vec![GlyphSpec::spacer(8)]);
    }
    b.kerning('a', 'v', -1);
    let bytes = b.build().unwrap();
    let face = FontFace::parse(&bytes).unwrap();

    let mut p = Paragraph::new();
    p.add_word("av", FontStyle::Regular, false, false);
    p.add_word("av", FontStyle::Regular, false, false);
    let options = LayoutOptions {
        alignment: Alignment::Left,
        hyphenation: false,
        extra_paragraph_spacing: true,
        ..LayoutOptions::default()
    };
    let mut lines = Vec::new();
    p.layout_lines(&face, 40, &options, &mut |l| lines.push(l));

    // "av" kerns to 15 px; both words fit one 40 px line.
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].words[0].x, 0);
    assert_eq!(lines[0].words[0].width, 15);
    assert_eq!(lines[0].words[1].x, 20);
    assert_eq!(lines[0].width, 35);
}
