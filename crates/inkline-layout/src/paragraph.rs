//! Paragraph line breaking, hyphenation, and alignment.
//!
//! Two strategies share the token stream. With hyphenation disabled,
//! breaks are chosen by dynamic programming over word boundaries,
//! minimizing the sum of squared leftover space with the last line
//! free. With hyphenation enabled, lines fill greedily and an
//! overflowing word is split at the widest hyphenation prefix that
//! still fits. Both cost one pass through the measurement seam.

use smallvec::SmallVec;
use tracing::debug;

use inkline_font::FontStyle;
use inkline_hyphen::Hyphenator;

use crate::line::{Line, LineWord};
use crate::measure::{Measure, SOFT_HYPHEN, word_width};
use crate::token::Word;

/// U+2003, the indent prepended to unindented justified paragraphs.
const EM_SPACE: char = '\u{2003}';

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Justify,
    Left,
    Center,
    Right,
}

/// Knobs for one layout pass.
#[derive(Clone, Debug)]
pub struct LayoutOptions {
    pub alignment: Alignment,
    pub hyphenation: bool,
    /// Explicit first-line indent in pixels. `None` falls back to an
    /// em-space prepended to the first word.
    pub text_indent: Option<u32>,
    /// Paragraphs separated by vertical spacing take no first-line
    /// indent at all.
    pub extra_paragraph_spacing: bool,
    /// Emit the final line. Pagination turns this off while probing
    /// whether a paragraph tail fits on the next page.
    pub include_last_line: bool,
    pub hyphenator: Hyphenator,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            alignment: Alignment::Justify,
            hyphenation: true,
            text_indent: None,
            extra_paragraph_spacing: false,
            include_last_line: true,
            hyphenator: Hyphenator::new(),
        }
    }
}

/// A word in the working buffer. Splitting a word during hyphenation
/// inserts the remainder right after its prefix.
#[derive(Clone, Debug)]
struct WorkItem {
    text: String,
    style: FontStyle,
    underline: bool,
    attach: bool,
    width: u32,
    inserted_hyphen: bool,
}

type BreakIndexes = SmallVec<[usize; 16]>;

/// An ordered token stream, laid out on demand.
#[derive(Clone, Debug, Default)]
pub struct Paragraph {
    words: Vec<Word>,
}

impl Paragraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a word. Empty strings are dropped.
    pub fn add_word(
        &mut self,
        text: impl Into<String>,
        style: FontStyle,
        underline: bool,
        attach: bool,
    ) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.words.push(Word {
            text,
            style,
            underline,
            attach,
        });
    }

    pub fn push(&mut self, word: Word) {
        if !word.text.is_empty() {
            self.words.push(word);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Break the paragraph into lines of at most `width` pixels and
    /// hand each to `emit` in order. Empty paragraphs emit nothing.
    pub fn layout_lines<M: Measure + ?Sized>(
        &self,
        measure: &M,
        width: u32,
        options: &LayoutOptions,
        emit: &mut dyn FnMut(Line),
    ) {
        if self.words.is_empty() {
            return;
        }
        let space = measure.space_width(FontStyle::Regular);
        let indent = first_line_indent(options);

        let mut work: Vec<WorkItem> = self
            .words
            .iter()
            .map(|w| WorkItem {
                text: w.text.clone(),
                style: w.style,
                underline: w.underline,
                attach: w.attach,
                width: 0,
                inserted_hyphen: false,
            })
            .collect();
        if options.text_indent.is_none() && !options.extra_paragraph_spacing
            && matches!(options.alignment, Alignment::Justify | Alignment::Left)
        {
            work[0].text.insert(0, EM_SPACE);
        }
        for item in &mut work {
            item.width = word_width(measure, &item.text, item.style, false);
        }

        let breaks = if options.hyphenation {
            greedy_breaks(&mut work, measure, width, indent, space, options)
        } else {
            dp_breaks(&mut work, measure, width, indent, space, options)
        };
        let line_count = if options.include_last_line {
            breaks.len()
        } else {
            breaks.len().saturating_sub(1)
        };
        debug!(
            words = work.len(),
            lines = breaks.len(),
            emitted = line_count,
            width,
            "paragraph laid out"
        );

        for index in 0..line_count {
            let start = if index > 0 { breaks[index - 1] } else { 0 };
            let end = breaks[index];
            emit(extract_line(
                &work[start..end],
                index == 0,
                index == breaks.len() - 1,
                width,
                indent,
                space,
                options.alignment,
            ));
        }
    }
}

/// Explicit pixel indent, gated the way the block renderer gates it:
/// only for left-set or justified paragraphs without extra spacing.
fn first_line_indent(options: &LayoutOptions) -> u32 {
    match options.text_indent {
        Some(px)
            if px > 0
                && !options.extra_paragraph_spacing
                && matches!(options.alignment, Alignment::Justify | Alignment::Left) =>
        {
            px
        }
        _ => 0,
    }
}

// ============================================================================
// Break strategies
// ============================================================================

/// Optimal word-boundary breaks: minimize summed squared leftover over
/// all feasible splits, last line free. Oversized words are pre-split
/// with fallback breakpoints; a word that still cannot fit gets a line
/// of its own.
fn dp_breaks<M: Measure + ?Sized>(
    work: &mut Vec<WorkItem>,
    measure: &M,
    width: u32,
    indent: u32,
    space: u32,
    options: &LayoutOptions,
) -> BreakIndexes {
    let mut i = 0;
    while i < work.len() {
        let effective = if i == 0 { width.saturating_sub(indent) } else { width };
        while work[i].width > effective {
            if !hyphenate_at(work, i, effective, measure, &options.hyphenator, true) {
                break;
            }
        }
        i += 1;
    }

    let n = work.len();
    let mut dp = vec![i64::MAX; n];
    let mut ans = vec![0usize; n];
    dp[n - 1] = 0;
    ans[n - 1] = n - 1;

    for i in (0..n.saturating_sub(1)).rev() {
        let effective = i64::from(if i == 0 { width.saturating_sub(indent) } else { width });
        let mut len: i64 = 0;
        for j in i..n {
            let gap = if j > i && !work[j].attach { i64::from(space) } else { 0 };
            len += i64::from(work[j].width) + gap;
            if len > effective {
                break;
            }
            // Never end a line right before an attached token.
            if j + 1 < n && work[j + 1].attach {
                continue;
            }
            let cost = if j == n - 1 {
                0
            } else {
                let leftover = effective - len;
                (leftover * leftover).saturating_add(dp[j + 1])
            };
            if cost < dp[i] {
                dp[i] = cost;
                ans[i] = j;
            }
        }
        if dp[i] == i64::MAX {
            // Nothing fits: the word stands alone.
            ans[i] = i;
            dp[i] = if i + 1 < n { dp[i + 1] } else { 0 };
        }
    }

    let mut breaks = BreakIndexes::new();
    let mut at = 0usize;
    while at < n {
        let mut next = ans[at] + 1;
        if next <= at {
            next = at + 1;
        }
        breaks.push(next);
        at = next;
    }
    breaks
}

/// Greedy fill with in-place word splitting on overflow.
fn greedy_breaks<M: Measure + ?Sized>(
    work: &mut Vec<WorkItem>,
    measure: &M,
    width: u32,
    indent: u32,
    space: u32,
    options: &LayoutOptions,
) -> BreakIndexes {
    let mut breaks = BreakIndexes::new();
    let mut current = 0usize;
    let mut first_line = true;

    while current < work.len() {
        let line_start = current;
        let effective = i64::from(if first_line { width.saturating_sub(indent) } else { width });
        let mut line_width: i64 = 0;

        while current < work.len() {
            let first_word = current == line_start;
            let spacing = if first_word || work[current].attach {
                0
            } else {
                i64::from(space)
            };
            let candidate = spacing + i64::from(work[current].width);
            if line_width + candidate <= effective {
                line_width += candidate;
                current += 1;
                continue;
            }

            let available = effective - line_width - spacing;
            // Fallback breaks only when the word has the line to itself;
            // a mid-line word can simply wrap whole.
            let allow_fallback = first_word;
            if available > 0
                && hyphenate_at(
                    work,
                    current,
                    available as u32,
                    measure,
                    &options.hyphenator,
                    allow_fallback,
                )
            {
                line_width += spacing + i64::from(work[current].width);
                current += 1;
                break;
            }

            if first_word {
                // Unbreakable and alone: overflow rather than loop.
                line_width += candidate;
                current += 1;
            }
            break;
        }

        // Pull attached tokens back onto the next line with their host.
        while current > line_start + 1 && current < work.len() && work[current].attach {
            current -= 1;
        }

        breaks.push(current);
        first_line = false;
    }

    breaks
}

/// Split `work[index]` at the widest hyphenation prefix that fits
/// `available` pixels, inserting the remainder after it. Returns false
/// when no candidate fits.
fn hyphenate_at<M: Measure + ?Sized>(
    work: &mut Vec<WorkItem>,
    index: usize,
    available: u32,
    measure: &M,
    hyphenator: &Hyphenator,
    allow_fallback: bool,
) -> bool {
    if available == 0 || index >= work.len() {
        return false;
    }
    let candidates = hyphenator.break_offsets(&work[index].text, allow_fallback);
    if candidates.is_empty() {
        return false;
    }

    let mut chosen: Option<(usize, u32, bool)> = None;
    for bp in &candidates {
        let offset = bp.byte_offset;
        if offset == 0 || offset >= work[index].text.len() {
            continue;
        }
        let prefix_width = word_width(
            measure,
            &work[index].text[..offset],
            work[index].style,
            bp.inserts_hyphen,
        );
        if prefix_width > available || chosen.is_some_and(|(_, w, _)| prefix_width <= w) {
            continue;
        }
        chosen = Some((offset, prefix_width, bp.inserts_hyphen));
    }
    let Some((offset, prefix_width, inserts_hyphen)) = chosen else {
        return false;
    };

    let item = &mut work[index];
    let remainder_text = item.text.split_off(offset);
    if inserts_hyphen {
        item.text.push('-');
    }
    // The remainder inherits the attach flag so the pull-back loop
    // cannot back over a fresh split.
    let old_attach = item.attach;
    item.attach = false;
    item.width = prefix_width;
    item.inserted_hyphen = inserts_hyphen;
    let style = item.style;
    let underline = item.underline;
    let remainder_width = word_width(measure, &remainder_text, style, false);
    work.insert(
        index + 1,
        WorkItem {
            text: remainder_text,
            style,
            underline,
            attach: old_attach,
            width: remainder_width,
            inserted_hyphen: false,
        },
    );
    true
}

// ============================================================================
// Extraction
// ============================================================================

/// Position one line's words and build its record.
///
/// Justified lines distribute the slack exactly: each gap widens by
/// `slack / gaps` pixels and the first `slack % gaps` gaps take one
/// more, so the line's right edge lands on the target width.
fn extract_line(
    words: &[WorkItem],
    is_first: bool,
    is_last: bool,
    width: u32,
    indent: u32,
    space: u32,
    alignment: Alignment,
) -> Line {
    let indent_px = if is_first { indent } else { 0 };
    let effective = i64::from(width) - i64::from(indent_px);

    let mut word_sum: i64 = 0;
    let mut gaps: i64 = 0;
    for (k, w) in words.iter().enumerate() {
        word_sum += i64::from(w.width);
        if k > 0 && !w.attach {
            gaps += 1;
        }
    }
    let slack = effective - word_sum - gaps * i64::from(space);

    let justify = matches!(alignment, Alignment::Justify) && !is_last && gaps >= 1 && slack > 0;
    let (extra_base, extra_rem) = if justify {
        (slack / gaps, slack % gaps)
    } else {
        (0, 0)
    };

    let mut x: i64 = match alignment {
        Alignment::Right => slack.max(0),
        Alignment::Center => (slack / 2).max(0),
        Alignment::Justify | Alignment::Left => i64::from(indent_px),
    };

    let mut out = Vec::with_capacity(words.len());
    let mut gap_index: i64 = 0;
    for (k, w) in words.iter().enumerate() {
        let text: String = if w.text.contains(SOFT_HYPHEN) {
            w.text.chars().filter(|&c| c != SOFT_HYPHEN).collect()
        } else {
            w.text.clone()
        };
        out.push(LineWord {
            text,
            style: w.style,
            underline: w.underline,
            x: x.max(0) as u32,
            width: w.width,
        });
        let next_attaches = words.get(k + 1).is_some_and(|n| n.attach);
        x += i64::from(w.width);
        if !next_attaches {
            x += i64::from(space) + extra_base + i64::from(gap_index < extra_rem);
            gap_index += 1;
        }
    }

    let line_width = out
        .last()
        .map_or(0, |w| w.x + w.width);
    Line {
        hyphenated: words.last().is_some_and(|w| w.inserted_hyphen),
        width: line_width,
        words: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedMeasure;

    fn measure() -> FixedMeasure {
        FixedMeasure::default()
    }

    fn plain_options(alignment: Alignment, hyphenation: bool) -> LayoutOptions {
        LayoutOptions {
            alignment,
            hyphenation,
            extra_paragraph_spacing: true,
            ..LayoutOptions::default()
        }
    }

    fn collect(p: &Paragraph, width: u32, options: &LayoutOptions) -> Vec<Line> {
        let mut lines = Vec::new();
        p.layout_lines(&measure(), width, options, &mut |line| lines.push(line));
        lines
    }

    fn para(words: &[&str]) -> Paragraph {
        let mut p = Paragraph::new();
        for w in words {
            p.add_word(*w, FontStyle::Regular, false, false);
        }
        p
    }

    #[test]
    fn empty_paragraph_emits_nothing() {
        let p = Paragraph::new();
        assert!(collect(&p, 100, &plain_options(Alignment::Left, false)).is_empty());
    }

    #[test]
    fn justified_line_distributes_slack_earliest_first() {
        // Four 8 px words, three gaps, width 54: base line is 47 px,
        // leaving 7 extra pixels to spread as +3, +2, +2.
        let p = para(&["a", "b", "c", "d", "e"]);
        let lines = collect(&p, 54, &plain_options(Alignment::Justify, true));
        assert_eq!(lines.len(), 2);

        let xs: Vec<u32> = lines[0].words.iter().map(|w| w.x).collect();
        assert_eq!(xs, vec![0, 16, 31, 46]);
        assert_eq!(lines[0].width, 54);

        // Last line of a justified paragraph is left-set.
        assert_eq!(lines[1].words[0].x, 0);
        assert_eq!(lines[1].width, 8);
    }

    #[test]
    fn dp_prefers_balanced_lines() {
        // Two 16 px words per line beat three-plus-one.
        let p = para(&["aa", "bb", "cc", "dd"]);
        let lines = collect(&p, 40, &plain_options(Alignment::Left, false));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "aa bb");
        assert_eq!(lines[1].text(), "cc dd");
    }

    #[test]
    fn oversized_word_is_presplit_with_fallback() {
        // The doubled-consonant rule offers breaks after 3, 4, and 5
        // letters; the widest fitting prefix takes the hyphen.
        let p = para(&["mmmmmmmm"]);
        let lines = collect(&p, 45, &plain_options(Alignment::Left, false));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "mmmm-");
        assert!(lines[0].hyphenated);
        assert_eq!(lines[1].text(), "mmmm");
        assert!(!lines[1].hyphenated);
    }

    #[test]
    fn unbreakable_word_overflows_alone() {
        let p = para(&["ab", "xy"]);
        // 16 px words, 12 px lines: no break fits the margins.
        let lines = collect(&p, 12, &plain_options(Alignment::Left, true));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "ab");
        assert!(lines[0].width > 12);
    }

    #[test]
    fn soft_hyphen_splits_and_strips() {
        let p = para(&["beau\u{AD}tiful"]);
        let lines = collect(&p, 60, &plain_options(Alignment::Left, true));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "beau-");
        assert!(lines[0].hyphenated);
        assert_eq!(lines[1].text(), "tiful");
    }

    #[test]
    fn attached_token_never_starts_a_line() {
        let mut p = para(&["aa", "bb", "cc"]);
        p.add_word(",", FontStyle::Regular, false, true);
        let lines = collect(&p, 60, &plain_options(Alignment::Left, true));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "aa bb");
        // The comma follows its host with no gap.
        assert_eq!(lines[1].words[1].text, ",");
        assert_eq!(lines[1].words[1].x, 16);
    }

    #[test]
    fn mid_line_style_change_does_not_break() {
        let mut p = Paragraph::new();
        p.add_word("plain", FontStyle::Regular, false, false);
        p.add_word("bold", FontStyle::Bold, false, false);
        let lines = collect(&p, 200, &plain_options(Alignment::Left, false));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].words.len(), 2);
        assert_eq!(lines[0].words[1].style, FontStyle::Bold);
    }

    #[test]
    fn em_space_indent_is_prepended() {
        let p = para(&["first", "second"]);
        let options = LayoutOptions {
            alignment: Alignment::Left,
            hyphenation: false,
            ..LayoutOptions::default()
        };
        let lines = collect(&p, 200, &options);
        assert!(lines[0].words[0].text.starts_with('\u{2003}'));
    }

    #[test]
    fn explicit_indent_shifts_only_the_first_line() {
        let p = para(&["aa", "bb", "cc", "dd"]);
        let options = LayoutOptions {
            alignment: Alignment::Left,
            hyphenation: false,
            text_indent: Some(12),
            ..LayoutOptions::default()
        };
        let lines = collect(&p, 49, &options);
        // 12 + 16 + 5 + 16 = 49 exactly; the second line starts flush.
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].words[0].x, 12);
        assert!(!lines[0].words[0].text.starts_with('\u{2003}'));
        assert_eq!(lines[1].words[0].x, 0);
    }

    #[test]
    fn center_and_right_offsets() {
        let p = para(&["aa", "bb"]);
        // Content is 16 + 5 + 16 = 37 px in a 50 px line: 13 px slack.
        let centered = collect(&p, 50, &plain_options(Alignment::Center, false));
        assert_eq!(centered[0].words[0].x, 6);
        assert_eq!(centered[0].words[1].x, 27);
        let right = collect(&p, 50, &plain_options(Alignment::Right, false));
        assert_eq!(right[0].words[0].x, 13);
        assert_eq!(right[0].width, 50);
    }

    #[test]
    fn last_line_can_be_withheld() {
        let p = para(&["aa", "bb", "cc", "dd"]);
        let options = LayoutOptions {
            include_last_line: false,
            ..plain_options(Alignment::Left, false)
        };
        let lines = collect(&p, 40, &options);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "aa bb");
    }
}
