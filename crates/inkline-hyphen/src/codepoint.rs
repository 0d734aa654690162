//! Word-to-codepoint collection.
//!
//! Hyphenators work on decoded codepoints but report break positions as byte
//! offsets into the original word, so each [`CodepointInfo`] remembers where
//! its character started. Words arrive as `&str`, already valid UTF-8;
//! decoding errors were replaced upstream during tokenization.

use smallvec::SmallVec;

use crate::script::is_letter;

/// A decoded codepoint plus the byte offset of its first UTF-8 byte within
/// the word it came from. Produced transiently per hyphenation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointInfo {
    pub value: u32,
    pub byte_offset: usize,
}

/// Inline capacity covering the vast majority of words without allocating.
pub type CodepointBuf = SmallVec<[CodepointInfo; 24]>;

/// Decode a word into codepoints with their byte offsets.
#[must_use]
pub fn collect_codepoints(word: &str) -> CodepointBuf {
    word.char_indices()
        .map(|(byte_offset, ch)| CodepointInfo {
            value: u32::from(ch),
            byte_offset,
        })
        .collect()
}

/// Strip surrounding punctuation and a trailing footnote reference before
/// hyphenation.
///
/// Tokenized words keep attached punctuation (`"hello!"`, `(word)`) and
/// footnote markers (`word[12]`); none of it participates in hyphenation.
/// Digits inside the word body are kept (`test123`), only a bracketed
/// trailing run of digits is treated as a footnote reference.
///
/// Byte offsets of the surviving codepoints are unchanged, so break
/// positions computed on the trimmed word still index the original bytes.
pub fn trim_surrounding_punctuation_and_footnote(cps: &mut CodepointBuf) {
    loop {
        // Trailing footnote reference: [123]
        if cps.last().is_some_and(|c| c.value == u32::from(']')) {
            let digits = cps
                .iter()
                .rev()
                .skip(1)
                .take_while(|c| is_ascii_digit(c.value))
                .count();
            if digits > 0 && cps.len() >= digits + 2 {
                let open = cps.len() - digits - 2;
                if cps[open].value == u32::from('[') {
                    cps.truncate(open);
                    continue;
                }
            }
        }

        if cps.last().is_some_and(|c| is_punctuation(c.value)) {
            cps.pop();
            continue;
        }

        break;
    }

    let leading = cps.iter().take_while(|c| is_punctuation(c.value)).count();
    if leading > 0 {
        cps.drain(..leading);
    }
}

/// Anything that is neither a letter nor an ASCII digit. Letters of
/// scripts without a hyphenator still count as letters here; trimming them
/// away would leave nothing for the force-split fallback to work with.
fn is_punctuation(cp: u32) -> bool {
    !is_letter(cp)
        && !is_ascii_digit(cp)
        && !char::from_u32(cp).is_some_and(char::is_alphabetic)
}

fn is_ascii_digit(cp: u32) -> bool {
    (0x30..=0x39).contains(&cp)
}
