use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Typographic ligatures and their plain-letter spelling.
const LIGATURES: [(char, &str); 5] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Normalise extracted block text so that contents-page labels and body-page
/// headings compare equal when they read the same.
///
/// Applies NFC normalisation, ligature expansion, removal of the Unicode
/// replacement character, and collapses runs of three or more spaces to two.
/// Line breaks are preserved: they delimit the lines of a block.
pub fn cleanup_text(text: &str) -> String {
    let mut result: String = text.nfc().collect();

    for (lig, replacement) in LIGATURES {
        if result.contains(lig) {
            result = result.replace(lig, replacement);
        }
    }

    result.retain(|c| c != '\u{FFFD}');

    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    let re_spaces = RE_SPACES.get_or_init(|| Regex::new(r"[ ]{3,}").unwrap());
    let result = re_spaces.replace_all(&result, "  ");

    result.trim().to_string()
}
