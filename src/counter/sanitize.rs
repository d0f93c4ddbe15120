use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters replaced by a space inside a single word.
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[`\[\]{}()?'",.&!]"#).unwrap()
});

/// `http(s)://`, optional `www.`, a domain and an optional path tail.
static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{2,256}\.[a-z]{2,6}\b([-a-zA-Z0-9@:%_+.~#?&/=]*)").unwrap()
});

/// Lowercase a whole message and blank out every URL in it.
///
/// # Arguments
/// * `text` - raw message content
///
/// # Returns
/// * `String` - lowercased text, each URL replaced by a single space
pub fn sanitize_message(text: &str) -> String {
    let lowered = text.to_lowercase();
    match URL.replace_all(&lowered, " ") {
        Cow::Borrowed(_) => lowered,
        Cow::Owned(replaced) => replaced,
    }
}

/// Canonical form of a single token.
///
/// Lowercases, turns the punctuation set into spaces and trims spaces at
/// both ends. Applying it twice gives the same result as applying it once.
///
/// # Arguments
/// * `word` - a token as split out of a message, or a word typed in a query
///
/// # Returns
/// * `String` - the canonical word; empty when the token was only punctuation
pub fn sanitize_word(word: &str) -> String {
    let lowered = word.to_lowercase();
    PUNCTUATION.replace_all(&lowered, " ").trim_matches(' ').to_string()
}

/// Split sanitized text on single spaces.
/// Consecutive separators yield empty tokens; callers drop them.
#[inline]
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ')
}
