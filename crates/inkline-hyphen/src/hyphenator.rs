//! Word-level hyphenation facade.
//!
//! Sits between the tokenizer and the line breaker: takes a raw word (with
//! its attached punctuation and markers still in place) and answers with
//! the byte offsets where the word may be split across lines.
//!
//! Precedence:
//! 1. author-provided break points — soft hyphens (U+00AD) and explicit
//!    ASCII hyphens — win outright when present;
//! 2. otherwise the word is trimmed of surrounding punctuation and handed
//!    to the hyphenator for its script;
//! 3. a script we have no hyphenator for yields no breaks — never guess.
//!
//! The supported set is closed, so dispatch is an exhaustive enum match
//! rather than open-ended polymorphism.

use std::sync::OnceLock;

use crate::codepoint::{
    CodepointBuf, CodepointInfo, collect_codepoints, trim_surrounding_punctuation_and_footnote,
};
use crate::liang::{BreakIndexes, LiangConfig, PatternSet};
use crate::patterns;
use crate::russian;
use crate::script::{Script, is_latin_letter, to_lower_latin};

/// Soft hyphen U+00AD.
const SOFT_HYPHEN: char = '\u{AD}';

/// One legal split point within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPoint {
    /// Byte offset into the original word; the suffix starts here.
    pub byte_offset: usize,
    /// Whether a visible `-` must be drawn at the end of the prefix. False
    /// only for breaks after an explicit hyphen already in the text.
    pub inserts_hyphen: bool,
}

/// Latin-script words are ambiguous between the pattern languages; the
/// reader's language setting picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatinLanguage {
    #[default]
    English,
    French,
}

// =========================================================================
// Language hyphenators (closed set)
// =========================================================================

/// The per-script breakpoint algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LanguageHyphenator {
    English,
    French,
    Russian,
}

fn english_patterns() -> &'static PatternSet {
    static SET: OnceLock<PatternSet> = OnceLock::new();
    SET.get_or_init(|| PatternSet::compile(patterns::ENGLISH))
}

fn french_patterns() -> &'static PatternSet {
    static SET: OnceLock<PatternSet> = OnceLock::new();
    SET.get_or_init(|| PatternSet::compile(patterns::FRENCH))
}

const ENGLISH_CONFIG: LiangConfig = LiangConfig {
    is_letter: is_latin_letter,
    to_lower: to_lower_latin,
    min_prefix: 3,
    min_suffix: 3,
};

const FRENCH_CONFIG: LiangConfig = LiangConfig {
    is_letter: is_latin_letter,
    to_lower: to_lower_latin,
    min_prefix: 2,
    min_suffix: 3,
};

impl LanguageHyphenator {
    fn script(self) -> Script {
        match self {
            Self::English | Self::French => Script::Latin,
            Self::Russian => Script::Cyrillic,
        }
    }

    fn min_prefix(self) -> usize {
        match self {
            Self::English => ENGLISH_CONFIG.min_prefix,
            Self::French => FRENCH_CONFIG.min_prefix,
            Self::Russian => russian::MIN_PREFIX,
        }
    }

    fn min_suffix(self) -> usize {
        match self {
            Self::English => ENGLISH_CONFIG.min_suffix,
            Self::French => FRENCH_CONFIG.min_suffix,
            Self::Russian => russian::MIN_SUFFIX,
        }
    }

    fn break_indexes(self, cps: &[CodepointInfo]) -> BreakIndexes {
        match self {
            Self::English => english_patterns().break_indexes(cps, &ENGLISH_CONFIG),
            Self::French => french_patterns().break_indexes(cps, &FRENCH_CONFIG),
            Self::Russian => russian::break_indexes(cps),
        }
    }
}

// =========================================================================
// Hyphenator
// =========================================================================

/// The hyphenation entry point the line breaker holds.
///
/// Carries only the reader's Latin-language preference; everything else is
/// stateless, so the value is freely copyable and needs no synchronization.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hyphenator {
    latin: LatinLanguage,
}

impl Hyphenator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_language(latin: LatinLanguage) -> Self {
        Self { latin }
    }

    /// Byte offsets where `word` may be split, ascending and deduplicated.
    ///
    /// With `include_fallback`, a word that produced no rule breaks instead
    /// yields every letter boundary obeying the minimum prefix/suffix
    /// margins — the line breaker requests this only when a word wider than
    /// the whole line must be force-split.
    #[must_use]
    pub fn break_offsets(&self, word: &str, include_fallback: bool) -> Vec<BreakPoint> {
        if word.is_empty() {
            return Vec::new();
        }

        let authored = authored_breaks(word);
        if !authored.is_empty() {
            return authored;
        }

        let mut cps = collect_codepoints(word);
        trim_surrounding_punctuation_and_footnote(&mut cps);

        let hyphenator = self.dispatch(&cps);
        let mut points: Vec<BreakPoint> = match hyphenator {
            Some(h) => h
                .break_indexes(&cps)
                .iter()
                .map(|&b| BreakPoint {
                    byte_offset: cps[b].byte_offset,
                    inserts_hyphen: true,
                })
                .collect(),
            None => Vec::new(),
        };

        if points.is_empty() && include_fallback {
            points = fallback_breaks(&cps, hyphenator);
        }

        points.retain(|p| p.byte_offset > 0 && p.byte_offset < word.len());
        points
    }

    /// Pick the hyphenator for a trimmed word; `None` when the word mixes
    /// scripts or belongs to one we have no algorithm for.
    fn dispatch(&self, cps: &CodepointBuf) -> Option<LanguageHyphenator> {
        let first = cps.first()?;
        let script = Script::of(first.value);
        if cps.iter().any(|c| Script::of(c.value) != script) {
            return None;
        }
        let hyphenator = match script {
            Script::Latin => match self.latin {
                LatinLanguage::English => LanguageHyphenator::English,
                LatinLanguage::French => LanguageHyphenator::French,
            },
            Script::Cyrillic => LanguageHyphenator::Russian,
            Script::Unknown => return None,
        };
        debug_assert_eq!(hyphenator.script(), script);
        Some(hyphenator)
    }
}

/// Breaks dictated by the text itself: soft hyphens and explicit hyphens.
fn authored_breaks(word: &str) -> Vec<BreakPoint> {
    let mut points = Vec::new();
    for (offset, ch) in word.char_indices() {
        if ch == SOFT_HYPHEN {
            let after = offset + ch.len_utf8();
            if after < word.len() && offset > 0 {
                points.push(BreakPoint {
                    byte_offset: after,
                    inserts_hyphen: true,
                });
            }
        } else if ch == '-' {
            let after = offset + 1;
            if after < word.len() && offset > 0 {
                points.push(BreakPoint {
                    byte_offset: after,
                    inserts_hyphen: false,
                });
            }
        }
    }
    points
}

/// Every letter boundary obeying the margins, for force-splitting.
fn fallback_breaks(
    cps: &CodepointBuf,
    hyphenator: Option<LanguageHyphenator>,
) -> Vec<BreakPoint> {
    let (min_prefix, min_suffix) = match hyphenator {
        Some(h) => (h.min_prefix(), h.min_suffix()),
        // Unknown scripts may split anywhere; the caller only asks when the
        // word cannot fit a line at all.
        None => (1, 1),
    };
    let n = cps.len();
    if n < min_prefix + min_suffix {
        return Vec::new();
    }
    (min_prefix..=n - min_suffix)
        .filter(|&b| b > 0 && b < n)
        .map(|b| BreakPoint {
            byte_offset: cps[b].byte_offset,
            inserts_hyphen: true,
        })
        .collect()
}
