//! Single-byte Western text to UTF-8
//!
//! Legacy databases store text in ISO-8859-1. Some builds were produced on
//! Windows and carry CP-1252 punctuation in the 0x80..=0x9F block, so that
//! block is decoded with the CP-1252 table. The five bytes CP-1252 leaves
//! undefined become U+FFFD.

use std::borrow::Cow;

const REPLACEMENT: char = '\u{FFFD}';

/// CP-1252 assignments for 0x80..=0x9F
const HIGH_CONTROL_BLOCK: [char; 32] = [
    '\u{20AC}', REPLACEMENT, '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', REPLACEMENT, '\u{017D}', REPLACEMENT,
    REPLACEMENT, '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', REPLACEMENT, '\u{017E}', '\u{0178}',
];

/// Map a single source byte to its Unicode scalar
#[inline]
pub fn decode_byte(b: u8) -> char {
    match b {
        0x80..=0x9F => HIGH_CONTROL_BLOCK[(b - 0x80) as usize],
        _ => b as char,
    }
}

/// Convert raw field bytes to UTF-8 text.
///
/// Pure ASCII input is borrowed without copying.
pub fn normalize(raw: &[u8]) -> Cow<'_, str> {
    if raw.is_ascii() {
        // ASCII is valid UTF-8
        return match std::str::from_utf8(raw) {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => Cow::Owned(raw.iter().map(|&b| decode_byte(b)).collect()),
        };
    }

    let mut out = String::with_capacity(raw.len() + raw.len() / 2);
    out.extend(raw.iter().map(|&b| decode_byte(b)));
    Cow::Owned(out)
}

/// [`normalize`] into an owned `String`
pub fn normalize_owned(raw: &[u8]) -> String {
    normalize(raw).into_owned()
}
