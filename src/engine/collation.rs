//! Spanish-aware string ordering.
//!
//! Strings are compared in three passes, the way a Spanish locale collator
//! does: base letters first (accents and case ignored, `ñ` a letter of its
//! own between `n` and `o`), then accents, then case with lowercase first.
//! Whitespace sorts before punctuation, punctuation before digits, digits
//! before letters.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const COMBINING_TILDE: char = '\u{0303}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Whitespace,
    Punctuation,
    Digit,
    Letter,
}

/// Precomputed sort key; compare keys instead of re-folding strings in hot loops.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<(CharClass, u32)>,
    secondary: Vec<u32>,
    tertiary: Vec<u8>,
}

pub fn collation_key(text: &str) -> CollationKey {
    let mut key = CollationKey {
        primary: Vec::with_capacity(text.len()),
        secondary: Vec::with_capacity(text.len()),
        tertiary: Vec::with_capacity(text.len()),
    };

    let decomposed: Vec<char> = text.nfd().collect();
    let mut i = 0;
    while i < decomposed.len() {
        let base = decomposed[i];
        i += 1;

        let mut marks = Vec::new();
        while i < decomposed.len() && is_combining_mark(decomposed[i]) {
            marks.push(decomposed[i]);
            i += 1;
        }

        let is_upper = base.is_uppercase();
        for lower in base.to_lowercase() {
            let mut accent: u32 = marks.iter().map(|&m| m as u32).sum();
            let weight = if lower == 'n' && marks.contains(&COMBINING_TILDE) {
                accent -= COMBINING_TILDE as u32;
                (CharClass::Letter, letter_weight('n') + 1)
            } else {
                primary_weight(lower)
            };
            key.primary.push(weight);
            key.secondary.push(accent);
            key.tertiary.push(u8::from(is_upper));
        }
    }

    key
}

fn letter_weight(c: char) -> u32 {
    if c.is_ascii_lowercase() {
        (c as u32 - 'a' as u32) * 2
    } else {
        // Non-Latin letters keep code point order, after z.
        100 + c as u32
    }
}

fn primary_weight(c: char) -> (CharClass, u32) {
    if c.is_whitespace() {
        (CharClass::Whitespace, 0)
    } else if let Some(d) = c.to_digit(10) {
        (CharClass::Digit, d)
    } else if c.is_alphabetic() {
        (CharClass::Letter, letter_weight(c))
    } else {
        (CharClass::Punctuation, c as u32)
    }
}

/// Compares two strings with Spanish collation rules.
///
/// Strings equal under all three passes fall back to code point order so the
/// result is a total order.
pub fn compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}
