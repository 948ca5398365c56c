//! Title text normalization
//!
//! Canonicalizes free-text titles before comparison: lower-case, strip
//! soundtrack boilerplate, strip everything outside letters (Latin,
//! Hangul, CJK ideographs, kana), digits and whitespace, collapse runs of
//! whitespace. Normalization is idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

/// Soundtrack boilerplate, applied in order after lower-casing
static BOILERPLATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\(.*?ost.*?\)",
        r"original motion picture soundtrack",
        r"soundtrack",
        r"ost",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static pattern"))
    .collect()
});

/// Everything outside Latin letters, digits, whitespace, Hangul syllables,
/// CJK unified ideographs and kana becomes a space
static DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9\s\x{AC00}-\x{D7A3}\x{4E00}-\x{9FFF}\x{3040}-\x{30FF}]")
        .expect("static pattern")
});

/// Canonicalize a title for comparison
pub fn normalize(text: &str) -> String {
    let mut text = text.to_lowercase();
    // Removing one occurrence can splice surrounding characters into a
    // fresh occurrence, so strip to a fixpoint. Each removal shortens
    // the string, so this terminates.
    loop {
        let mut changed = false;
        for pattern in BOILERPLATE.iter() {
            if pattern.is_match(&text) {
                text = pattern.replace_all(&text, "").into_owned();
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    let text = DISALLOWED.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
