//! Built-in Liang pattern tables.
//!
//! Compact curated dictionaries, not full TeX tables: doubled-consonant
//! splits, digraph inhibitors, and the productive affixes that matter for
//! narrow e-ink columns. The engine accepts any table, so a full
//! `hyph-en.tex`-derived set can be swapped in by the firmware build when
//! flash budget allows.
//!
//! Format reminder: digits sit in the gaps between letters, odd allows a
//! break, even forbids one, `.` anchors a word edge. "1tion" therefore
//! reads "a break is allowed right before -tion".

/// English patterns. Margins for English are 3/3 (see the facade), so
/// two-letter fragments never appear even where a pattern would allow one.
pub static ENGLISH: &[&str] = &[
    // Doubled consonants split between the pair.
    "b1b", "d1d", "f1f", "g1g", "l1l", "m1m", "n1n", "p1p", "r1r", "s1s", "t1t",
    // Digraphs never split internally.
    "c2h", "c2k", "g2h", "p2h", "q2u", "s2h", "t2h", "w2h",
    // Productive prefixes.
    "com1", "con1", "dis1", "mis1", "out1", "over1", "sub1", "trans1", ".un1der", "in1ter",
    // Productive suffixes.
    "1tion", "1sion", "1ment", "1ness", "1ship", "1hood", "1ward", "1able", "1ance", "1ence",
    "1cian", "1less", "1ful.", "1ing.", "1cal.",
    // Syllable boundaries the affix rules miss: a new syllable opens before
    // ti/ni/ca, and r closes one ahead of n or s.
    "1ti", "u1ni", "i1ca", "r1n", "r1s",
];

/// French patterns. French hyphenation is dominated by two rules this table
/// encodes directly: doubled consonants split between the pair, and a
/// consonant+liquid (or digraph) cluster moves whole to the next line.
pub static FRENCH: &[&str] = &[
    // Doubled consonants.
    "b1b", "d1d", "f1f", "g1g", "l1l", "m1m", "n1n", "p1p", "r1r", "s1s", "t1t",
    // Consonant + liquid onsets stay together on the new line.
    "1ble", "1bre", "1cle", "1cre", "1dre", "1fle", "1fre", "1gle", "1gre",
    "1ple", "1pre", "1tre", "1vre",
    // Digraph onsets.
    "1che", "1gne", "1gue", "1que", "1phe",
    // Common endings.
    "1ment", "1tion", "1sion",
];
