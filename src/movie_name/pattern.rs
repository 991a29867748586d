//! Direct `Title Year` matching for names that already carry the release year.

use std::sync::LazyLock;

use regex::Regex;

/// Title followed by a four digit year in optional `()`, `{}` or `[]` brackets.
///
/// The character right after the year must not be `p`,
/// so resolution tags like `1080p` or `2160p` are never taken as a year.
static RE_TITLE_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?) [{(\[]*([0-9]{4})[^p][\])}]*(.*)$").expect("Failed to compile title year regex")
});

/// Replace the separators commonly used in release names with spaces.
///
/// Backslashes are dropped, underscores and periods become spaces.
/// ```rust
/// use movie_rename::movie_name::normalize_punctuation;
///
/// assert_eq!(normalize_punctuation("The.Matrix_1999"), "The Matrix 1999");
/// ```
#[must_use]
pub fn normalize_punctuation(name: &str) -> String {
    name.replace('\\', "").replace(['_', '.'], " ")
}

/// Match a `<title> <year><trailer>` name and rewrite it as `<title> (<year>)`.
///
/// Expects a name that has already gone through [`normalize_punctuation`].
/// Returns `None` if the name does not contain a usable year.
#[must_use]
pub fn match_title_year(name: &str) -> Option<String> {
    let captures = RE_TITLE_YEAR.captures(name)?;
    let title = captures.get(1)?.as_str();
    let year = captures.get(2)?.as_str();
    Some(format!("{title} ({year})"))
}
