use once_cell::sync::Lazy;
use regex::Regex;

/// Token used when nothing speakable survives identifier cleanup
pub const DEFAULT_FALLBACK_FRAGMENT: &str = "swedish";

/// Number of leading words kept in a filename fragment
const FRAGMENT_WORDS: usize = 3;

/// Maximum characters kept from each fragment word
const FRAGMENT_WORD_CHARS: usize = 10;

static MARKUP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("markup pattern is valid"));

static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

// Lowercase ASCII letters, the accented Latin letters that show up in
// Swedish (and its loanwords) card text, and whitespace. `å` is part of the
// set, so "på" stays "på" rather than collapsing to "p". Filenames made by
// tools that drop `å` will differ for such text.
static NON_IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-zåäöüéèêëàáâòóôùúû\s]").expect("identifier pattern is valid")
});

/// Remove HTML tags and normalize whitespace so the text can be spoken
pub fn strip_markup(text: &str) -> String {
    let without_tags = MARKUP_PATTERN.replace_all(text, "");
    let normalized = WHITESPACE_PATTERN.replace_all(&without_tags, " ");
    normalized.trim().to_string()
}

/// Build the human-readable part of an audio filename.
///
/// The text is lower-cased and stripped of markup and of every character
/// outside the identifier alphabet. The first three words, each cut to ten
/// characters, are joined with `_`. When nothing is left `fallback` is used.
pub fn derive_identifier_fragment(text: &str, fallback: &str) -> String {
    let lowered = strip_markup(text).to_lowercase();
    let letters_only = NON_IDENTIFIER_PATTERN.replace_all(&lowered, "");

    let fragment = letters_only
        .split_whitespace()
        .take(FRAGMENT_WORDS)
        .map(|word| word.chars().take(FRAGMENT_WORD_CHARS).collect::<String>())
        .collect::<Vec<_>>()
        .join("_");

    if fragment.is_empty() {
        fallback.to_string()
    } else {
        fragment
    }
}
