//! Codepoint/script classifier.
//!
//! Total, stateless predicates over raw codepoints. The hyphenators consult
//! these to decide which breakpoint algorithm applies and to classify letters
//! within a word (vowel, consonant, special signs). Codepoints outside every
//! known script classify as "not a letter" and are treated as hard word
//! boundaries upstream — there are no error cases here.

/// Writing script of a codepoint, as far as hyphenation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Cyrillic,
    /// Anything we have no hyphenator for.
    Unknown,
}

impl Script {
    /// Classify a single codepoint.
    #[must_use]
    pub fn of(cp: u32) -> Self {
        if is_latin_letter(cp) {
            Self::Latin
        } else if is_cyrillic_letter(cp) {
            Self::Cyrillic
        } else {
            Self::Unknown
        }
    }
}

// =========================================================================
// Latin
// =========================================================================

/// ASCII letters plus the Latin-1 supplement letters (French coverage) and
/// the oe ligature pair.
#[must_use]
pub fn is_latin_letter(cp: u32) -> bool {
    matches!(cp,
        0x41..=0x5A | 0x61..=0x7A
        | 0xC0..=0xD6 | 0xD8..=0xF6 | 0xF8..=0xFF
        | 0x152 | 0x153)
}

/// Lowercase a Latin letter; other codepoints pass through unchanged.
#[must_use]
pub fn to_lower_latin(cp: u32) -> u32 {
    match cp {
        0x41..=0x5A | 0xC0..=0xD6 | 0xD8..=0xDE => cp + 0x20,
        0x152 => 0x153, // Œ → œ
        _ => cp,
    }
}

/// Latin vowels, including the accented forms French uses.
#[must_use]
pub fn is_latin_vowel(cp: u32) -> bool {
    matches!(to_lower_latin(cp),
        0x61 | 0x65 | 0x69 | 0x6F | 0x75 | 0x79              // a e i o u y
        | 0xE0..=0xE6 | 0xE8..=0xEF | 0xF2..=0xF6            // à..æ è..ï ò..ö
        | 0xF9..=0xFC | 0xFF | 0x153)                        // ù..ü ÿ œ
}

// =========================================================================
// Cyrillic
// =========================================================================

/// Cyrillic letters а..я, А..Я plus ё/Ё.
#[must_use]
pub fn is_cyrillic_letter(cp: u32) -> bool {
    matches!(cp, 0x410..=0x44F | 0x401 | 0x451)
}

/// Lowercase a Cyrillic letter; other codepoints pass through unchanged.
#[must_use]
pub fn to_lower_cyrillic(cp: u32) -> u32 {
    match cp {
        0x410..=0x42F => cp + 0x20,
        0x401 => 0x451, // Ё → ё
        _ => cp,
    }
}

/// The ten Cyrillic vowels а е ё и о у ы э ю я.
#[must_use]
pub fn is_cyrillic_vowel(cp: u32) -> bool {
    matches!(
        to_lower_cyrillic(cp),
        0x430 | 0x435 | 0x451 | 0x438 | 0x43E | 0x443 | 0x44B | 0x44D | 0x44E | 0x44F
    )
}

/// Cyrillic consonants: letters that are neither vowels nor the soft/hard
/// signs. Includes й, which Russian phonotactics treats as a glide consonant.
#[must_use]
pub fn is_cyrillic_consonant(cp: u32) -> bool {
    is_cyrillic_letter(cp) && !is_cyrillic_vowel(cp) && !is_soft_or_hard_sign(cp)
}

/// The soft sign ь.
#[must_use]
pub fn is_soft_sign(cp: u32) -> bool {
    to_lower_cyrillic(cp) == 0x44C
}

/// The hard sign ъ.
#[must_use]
pub fn is_hard_sign(cp: u32) -> bool {
    to_lower_cyrillic(cp) == 0x44A
}

/// Either of ь/ъ. Neither may sit adjacent to a hyphenation break.
#[must_use]
pub fn is_soft_or_hard_sign(cp: u32) -> bool {
    is_soft_sign(cp) || is_hard_sign(cp)
}

/// The short i й — may never start a line fragment.
#[must_use]
pub fn is_cyrillic_short_i(cp: u32) -> bool {
    to_lower_cyrillic(cp) == 0x439
}

/// The yeru ы — may never start a line fragment.
#[must_use]
pub fn is_cyrillic_yeru(cp: u32) -> bool {
    to_lower_cyrillic(cp) == 0x44B
}

/// Any letter of a script we recognize.
#[must_use]
pub fn is_letter(cp: u32) -> bool {
    is_latin_letter(cp) || is_cyrillic_letter(cp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_letters_are_latin() {
        assert_eq!(Script::of(u32::from('a')), Script::Latin);
        assert_eq!(Script::of(u32::from('Z')), Script::Latin);
        assert_eq!(Script::of(u32::from('é')), Script::Latin);
        assert_eq!(Script::of(u32::from('œ')), Script::Latin);
    }

    #[test]
    fn cyrillic_letters_classify() {
        assert_eq!(Script::of(u32::from('а')), Script::Cyrillic);
        assert_eq!(Script::of(u32::from('Я')), Script::Cyrillic);
        assert_eq!(Script::of(u32::from('ё')), Script::Cyrillic);
        assert_eq!(Script::of(u32::from('Ё')), Script::Cyrillic);
    }

    #[test]
    fn non_letters_are_unknown() {
        assert_eq!(Script::of(u32::from('7')), Script::Unknown);
        assert_eq!(Script::of(u32::from('-')), Script::Unknown);
        assert_eq!(Script::of(u32::from('中')), Script::Unknown);
        assert_eq!(Script::of(0x2014), Script::Unknown); // em dash
    }

    #[test]
    fn lowercasing_is_idempotent() {
        for cp in 0x410..=0x42F {
            let lower = to_lower_cyrillic(cp);
            assert_eq!(to_lower_cyrillic(lower), lower);
        }
        for cp in 0x41..=0x5A {
            let lower = to_lower_latin(cp);
            assert_eq!(to_lower_latin(lower), lower);
        }
    }

    #[test]
    fn cyrillic_letter_classes_partition() {
        // Every Cyrillic letter is exactly one of vowel / consonant / sign.
        for cp in (0x430..=0x44F).chain([0x451]) {
            let classes = [
                is_cyrillic_vowel(cp),
                is_cyrillic_consonant(cp),
                is_soft_or_hard_sign(cp),
            ];
            assert_eq!(
                classes.iter().filter(|&&c| c).count(),
                1,
                "codepoint U+{cp:04X} must be in exactly one class"
            );
        }
    }

    #[test]
    fn signs_and_special_letters() {
        assert!(is_soft_sign(u32::from('ь')));
        assert!(is_soft_sign(u32::from('Ь')));
        assert!(is_hard_sign(u32::from('ъ')));
        assert!(is_cyrillic_short_i(u32::from('й')));
        assert!(is_cyrillic_yeru(u32::from('ы')));
        assert!(!is_cyrillic_vowel(u32::from('й')));
        assert!(is_cyrillic_consonant(u32::from('й')));
    }
}
