//! Rule-based Russian hyphenation.
//!
//! Russian needs no pattern dictionary: syllable boundaries follow from the
//! vowel skeleton and from sonority sequencing over the consonant clusters
//! between vowels. The rule tables here encode linguistic knowledge and are
//! preserved verbatim from the reference behavior:
//!
//! - a single consonant between vowels starts the next syllable;
//! - doubled identical consonants (not ь/ъ) split between the pair;
//! - longer clusters break before the longest cluster suffix that forms a
//!   legal syllable onset, where "legal" means sonority never falls
//!   left-to-right — with two lexical allowances (в/з/с prefix consonants at
//!   cluster start, sibilant+stop clusters);
//! - no break may leave fewer than two letters on either side, land next to
//!   ь/ъ, or put ь, ъ, й, or ы at the start of a line fragment.

use smallvec::SmallVec;

use crate::codepoint::CodepointInfo;
use crate::liang::BreakIndexes;
use crate::script::{
    is_cyrillic_consonant, is_cyrillic_short_i, is_cyrillic_vowel, is_cyrillic_yeru,
    is_soft_or_hard_sign, to_lower_cyrillic,
};

/// Minimum letters left before a break.
pub const MIN_PREFIX: usize = 2;
/// Minimum letters left after a break.
pub const MIN_SUFFIX: usize = 2;

/// Longest syllable onset the search will consider.
const MAX_ONSET: usize = 4;

/// Prefix consonants в/з/с may open a cluster even when sonority falls.
fn is_prefix_consonant(cp: u32) -> bool {
    matches!(to_lower_cyrillic(cp), 0x0432 | 0x0437 | 0x0441)
}

/// Sibilants з с ж ш щ ч ц.
fn is_sibilant(cp: u32) -> bool {
    matches!(
        to_lower_cyrillic(cp),
        0x0437 | 0x0441 | 0x0436 | 0x0448 | 0x0449 | 0x0447 | 0x0446
    )
}

/// Stops б г д п т к.
fn is_stop(cp: u32) -> bool {
    matches!(
        to_lower_cyrillic(cp),
        0x0431 | 0x0433 | 0x0434 | 0x043F | 0x0442 | 0x043A
    )
}

/// Sonority rank: liquids/glides loudest, stops quietest. Consonants not in
/// the table rank 1 with the fricatives.
fn sonority(cp: u32) -> u8 {
    match to_lower_cyrillic(cp) {
        0x043B | 0x0440 | 0x0439 => 4,                            // л р й
        0x043C | 0x043D => 3,                                     // м н
        0x0432 | 0x0437 | 0x0436 => 2,                            // в з ж
        0x0431 | 0x0433 | 0x0434 | 0x043F | 0x0442 | 0x043A => 0, // б г д п т к
        _ => 1,
    }
}

/// Can `cps[start..end]` open a syllable?
fn is_valid_onset(cps: &[CodepointInfo], start: usize, end: usize) -> bool {
    if start >= end {
        return false;
    }
    if cps[start..end]
        .iter()
        .any(|c| !is_cyrillic_consonant(c.value))
    {
        return false;
    }
    if end - start == 1 {
        return true;
    }

    for i in start..end - 1 {
        let current = cps[i].value;
        let next = cps[i + 1].value;
        if sonority(current) > sonority(next) {
            let prefix_allowance = i == start && is_prefix_consonant(current);
            let sibilant_allowance = is_sibilant(current) && is_stop(next);
            if !prefix_allowance && !sibilant_allowance {
                return false;
            }
        }
    }
    true
}

/// The split point inside a doubled identical consonant, if the cluster has
/// one.
fn double_consonant_split(cps: &[CodepointInfo], start: usize, end: usize) -> Option<usize> {
    for i in start..end.saturating_sub(1) {
        let left = cps[i].value;
        let right = cps[i + 1].value;
        if is_cyrillic_consonant(left)
            && to_lower_cyrillic(left) == to_lower_cyrillic(right)
            && !is_soft_or_hard_sign(right)
        {
            return Some(i + 1);
        }
    }
    None
}

/// Length of the longest valid onset that is a suffix of the cluster.
fn onset_length(cps: &[CodepointInfo], start: usize, end: usize) -> usize {
    let cluster_len = end - start;
    if cluster_len == 0 {
        return 0;
    }
    for len in (1..=MAX_ONSET.min(cluster_len)).rev() {
        if is_valid_onset(cps, end - len, end) {
            return len;
        }
    }
    1
}

/// ь, ъ, й, and ы cannot legally start a line fragment.
fn begins_forbidden_suffix(cps: &[CodepointInfo], index: usize) -> bool {
    match cps.get(index) {
        Some(c) => {
            is_soft_or_hard_sign(c.value)
                || is_cyrillic_short_i(c.value)
                || is_cyrillic_yeru(c.value)
        }
        None => true,
    }
}

/// Breaks never land immediately beside ь/ъ.
fn next_to_sign(cps: &[CodepointInfo], index: usize) -> bool {
    if index == 0 || index >= cps.len() {
        return false;
    }
    is_soft_or_hard_sign(cps[index - 1].value) || is_soft_or_hard_sign(cps[index].value)
}

/// Global filters every candidate break must pass.
fn break_allowed(cps: &[CodepointInfo], index: usize) -> bool {
    if index == 0 || index >= cps.len() {
        return false;
    }
    if index < MIN_PREFIX || cps.len() - index < MIN_SUFFIX {
        return false;
    }
    !begins_forbidden_suffix(cps, index)
}

/// Syllable break indexes for a Russian word, sorted ascending and
/// deduplicated. Words with fewer than `MIN_PREFIX + MIN_SUFFIX` letters or
/// fewer than two vowels produce none.
#[must_use]
pub fn break_indexes(cps: &[CodepointInfo]) -> BreakIndexes {
    let mut indexes = BreakIndexes::new();
    if cps.len() < MIN_PREFIX + MIN_SUFFIX {
        return indexes;
    }

    let vowels: SmallVec<[usize; 12]> = cps
        .iter()
        .enumerate()
        .filter(|(_, c)| is_cyrillic_vowel(c.value))
        .map(|(i, _)| i)
        .collect();
    if vowels.len() < 2 {
        return indexes;
    }

    for pair in vowels.windows(2) {
        let (left, right) = (pair[0], pair[1]);

        if right - left == 1 {
            // Adjacent vowels: the right one may open the next fragment.
            if !next_to_sign(cps, right) && break_allowed(cps, right) {
                indexes.push(right);
            }
            continue;
        }

        let cluster_start = left + 1;
        let cluster_end = right;

        let break_index = match double_consonant_split(cps, cluster_start, cluster_end) {
            Some(split) => split,
            None => cluster_end - onset_length(cps, cluster_start, cluster_end),
        };

        if next_to_sign(cps, break_index) || !break_allowed(cps, break_index) {
            continue;
        }
        indexes.push(break_index);
    }

    indexes.sort_unstable();
    indexes.dedup();
    indexes
}
