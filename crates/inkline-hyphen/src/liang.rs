//! Liang-style pattern hyphenation.
//!
//! The classic TeX algorithm: a dictionary of short letter patterns carries
//! interleaved digit weights ("1tion", "c2h", ".un1der"). The word is
//! wrapped in boundary markers, every pattern occurrence contributes its
//! digits to the inter-letter gaps (keeping the maximum per gap), and a gap
//! is a legal break point iff its accumulated weight is odd. Even weights
//! act as inhibitors, which is how digraphs like "ch" stay whole.
//!
//! The engine is language-neutral; each Latin-script language supplies its
//! own pattern table and letter predicates through [`LiangConfig`].

use smallvec::SmallVec;

use crate::codepoint::CodepointInfo;

/// Break indexes within one word; inline capacity covers normal words.
pub type BreakIndexes = SmallVec<[usize; 8]>;

/// Boundary marker used in anchored patterns (".un1der" only matches at the
/// start of a word).
const BOUNDARY: u32 = '.' as u32;

// =========================================================================
// LiangConfig
// =========================================================================

/// Per-language knobs for the pattern engine.
#[derive(Debug, Clone, Copy)]
pub struct LiangConfig {
    /// Letters that may participate in a pattern word. Anything else makes
    /// the word ineligible for pattern hyphenation.
    pub is_letter: fn(u32) -> bool,
    /// Case folding applied before matching; patterns are stored lowercase.
    pub to_lower: fn(u32) -> u32,
    /// Never break within the first `min_prefix` letters.
    pub min_prefix: usize,
    /// Never break within the last `min_suffix` letters.
    pub min_suffix: usize,
}

// =========================================================================
// PatternSet
// =========================================================================

/// One compiled pattern: its letter sequence (possibly with boundary
/// markers) and a weight for every gap around those letters.
#[derive(Debug, Clone)]
struct Pattern {
    letters: Box<[u32]>,
    /// `letters.len() + 1` entries: weights[k] applies to the gap before
    /// letters[k] (the last entry to the gap after the final letter).
    weights: Box<[u8]>,
}

/// A compiled, sorted pattern dictionary.
///
/// Patterns are sorted by their letter sequence so lookups can scan only
/// the candidates sharing a first letter.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile a table of textual patterns ("1tion", ".ab3c", "m1m").
    ///
    /// Malformed entries (no letters at all) are skipped; pattern tables are
    /// compiled in and a bad entry is a build-time mistake, not a runtime
    /// condition worth an error path.
    #[must_use]
    pub fn compile(table: &[&str]) -> Self {
        let mut patterns: Vec<Pattern> = table.iter().filter_map(|p| parse_pattern(p)).collect();
        patterns.sort_by(|a, b| a.letters.cmp(&b.letters));
        Self { patterns }
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Legal break indexes for a word, ascending.
    ///
    /// An index `b` means "the line may end after `cps[..b]`". Words with a
    /// non-letter codepoint or shorter than `min_prefix + min_suffix`
    /// produce no breaks.
    #[must_use]
    pub fn break_indexes(&self, cps: &[CodepointInfo], config: &LiangConfig) -> BreakIndexes {
        let mut out = BreakIndexes::new();
        let n = cps.len();
        if n < config.min_prefix + config.min_suffix {
            return out;
        }
        if cps.iter().any(|c| !(config.is_letter)(c.value)) {
            return out;
        }

        // ".word." with boundary markers, folded to lowercase.
        let mut augmented: SmallVec<[u32; 32]> = SmallVec::with_capacity(n + 2);
        augmented.push(BOUNDARY);
        augmented.extend(cps.iter().map(|c| (config.to_lower)(c.value)));
        augmented.push(BOUNDARY);

        // scores[g] is the weight of the gap before augmented[g].
        let mut scores: SmallVec<[u8; 36]> = SmallVec::new();
        scores.resize(augmented.len() + 1, 0);

        for start in 0..augmented.len() {
            for pattern in self.candidates(augmented[start]) {
                let len = pattern.letters.len();
                if start + len > augmented.len() {
                    continue;
                }
                if augmented[start..start + len] != *pattern.letters {
                    continue;
                }
                for (k, &w) in pattern.weights.iter().enumerate() {
                    if w > scores[start + k] {
                        scores[start + k] = w;
                    }
                }
            }
        }

        // Gap before original letter b sits before augmented[b + 1].
        for b in config.min_prefix..=n.saturating_sub(config.min_suffix) {
            if b == 0 || b == n {
                continue;
            }
            if scores[b + 1] % 2 == 1 {
                out.push(b);
            }
        }
        out
    }

    /// All patterns whose first letter is `first`.
    fn candidates(&self, first: u32) -> &[Pattern] {
        let lo = self.patterns.partition_point(|p| p.letters[0] < first);
        let hi = self.patterns[lo..].partition_point(|p| p.letters[0] == first) + lo;
        &self.patterns[lo..hi]
    }
}

/// Parse one textual pattern into letters + gap weights.
fn parse_pattern(text: &str) -> Option<Pattern> {
    let mut letters: Vec<u32> = Vec::new();
    let mut weights: Vec<u8> = vec![0];

    for ch in text.chars() {
        if let Some(digit) = ch.to_digit(10) {
            // A digit annotates the gap before the next letter.
            *weights.last_mut()? = digit as u8;
        } else {
            letters.push(u32::from(ch));
            weights.push(0);
        }
    }

    if letters.is_empty() {
        return None;
    }
    Some(Pattern {
        letters: letters.into_boxed_slice(),
        weights: weights.into_boxed_slice(),
    })
}
