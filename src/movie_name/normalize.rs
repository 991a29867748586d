//! Release noise removal for names without an embedded year.

use std::sync::LazyLock;

use regex::Regex;

/// Release tags that carry no information about the movie itself.
///
/// Order matters: longer tokens that contain a shorter one must come first,
/// for example `repacked` before `repack` and `nedivx` before `divx`.
pub const NOISE_TOKENS: [&str; 13] = [
    "unrated multi",
    "limited",
    "proper",
    "bluray",
    "x264",
    "nedivx",
    "bestdivx",
    "divx",
    "xvid",
    "dvdrip",
    "repacked",
    "repack",
    "ac3",
];

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// Title followed by a three or four digit number such as a resolution tag.
static RE_RESOLUTION_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?) ([0-9]{3,4})[p]*(.*)$").expect("Failed to compile resolution title regex"));

/// Remove every occurrence of the noise tokens from a lowercase name.
///
/// Tokens are removed in the given order.
/// The pass repeats until nothing changes,
/// since removing one token can join the surrounding text into another token.
#[must_use]
pub fn strip_noise<S: AsRef<str>>(name: &str, tokens: &[S]) -> String {
    let mut current = name.to_string();
    loop {
        let stripped = tokens
            .iter()
            .map(AsRef::as_ref)
            .filter(|token| !token.is_empty())
            .fold(current.clone(), |name, token| name.replace(token, ""));

        if stripped == current {
            return stripped;
        }
        current = stripped;
    }
}

/// Lowercase, strip noise tokens and capitalize every word.
///
/// Whitespace left behind by removed tokens is collapsed to single spaces.
#[must_use]
pub fn clean_name<S: AsRef<str>>(name: &str, tokens: &[S]) -> String {
    let lowercase = name.replace('\\', "").to_lowercase();
    let stripped = strip_noise(lowercase.trim(), tokens);
    let collapsed = RE_WHITESPACE.replace_all(stripped.trim(), " ");
    capitalize_words(&collapsed).trim().to_string()
}

/// Uppercase the first letter of every word.
///
/// Any character other than a letter, digit or underscore starts a new word,
/// so small words and roman numerals are capitalized too: `rocky v` gives `Rocky V`.
#[must_use]
pub fn capitalize_words(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if word_start {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        word_start = !(c.is_alphanumeric() || c == '_');
    }
    result
}

/// Cut the name at the first three or four digit number, which is usually a resolution tag.
///
/// Returns the whole name if there is no such number.
#[must_use]
pub fn extract_title(name: &str) -> String {
    RE_RESOLUTION_TITLE
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map_or(name, |title| title.as_str())
        .trim()
        .to_string()
}

/// Get the movie title used for the metadata lookup.
///
/// ```rust
/// use movie_rename::movie_name::{NOISE_TOKENS, candidate_title};
///
/// assert_eq!(candidate_title("some movie bluray x264", &NOISE_TOKENS), "Some Movie");
/// ```
#[must_use]
pub fn candidate_title<S: AsRef<str>>(name: &str, tokens: &[S]) -> String {
    extract_title(&clean_name(name, tokens))
}
