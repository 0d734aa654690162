#![forbid(unsafe_code)]

//! Language-aware hyphenation for the inkline e-ink text engine.
//!
//! Given a word from the tokenizer, produces the byte offsets where the
//! word may legally be split across lines. Two breakpoint strategies are
//! supported:
//!
//! - **Pattern-based (Liang)** for Latin-script languages: a compiled
//!   dictionary of numeric patterns; odd accumulated weight at a letter gap
//!   allows a break ([`liang`]).
//! - **Rule-based phonotactics** for Russian: vowel skeleton plus sonority
//!   sequencing over consonant clusters ([`russian`]).
//!
//! [`Hyphenator`] is the facade the line breaker uses; it handles soft and
//! explicit hyphens, punctuation trimming, script dispatch, and fallback
//! breaks for words that must be force-split.

pub mod codepoint;
pub mod hyphenator;
pub mod liang;
pub mod patterns;
pub mod russian;
pub mod script;

pub use codepoint::{CodepointInfo, collect_codepoints};
pub use hyphenator::{BreakPoint, Hyphenator, LatinLanguage};
pub use script::Script;
