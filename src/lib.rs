pub mod config;
pub mod movie_name;

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::{Color, ColoredString, Colorize};
use difference::{Changeset, Difference};
use unicode_normalization::UnicodeNormalization;

/// Format bool value as a coloured string.
#[must_use]
pub fn colorize_bool(value: bool) -> ColoredString {
    if value { "true".green() } else { "false".red() }
}

/// Path to the user config file if the home directory can be resolved.
#[must_use]
pub fn config_path() -> Option<&'static Path> {
    config::CONFIG_PATH.as_deref()
}

/// Get the directory name from a Path with special characters retained instead of decomposed.
pub fn get_normalized_dir_name(path: &Path) -> Result<String> {
    let dir_name = path.file_name().context("Failed to get directory name")?;

    // Some file systems store names in NFD (Normalization Form Decomposed),
    // which converts special chars like "å" to "a\u{30a}".
    Ok(dir_name.to_string_lossy().nfc().collect::<String>())
}

/// Check if a directory entry should be left alone.
///
/// Hidden entries start with '.', and a leading '!' marks an entry the user has flagged as off-limits.
#[must_use]
pub fn is_ignored_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('!')
}

/// Resolve the directory whose subdirectories get renamed.
///
/// Uses the current working directory if no path, or an empty path, is given.
/// ```rust
/// use std::path::Path;
/// use movie_rename::resolve_root_directory;
///
/// let root = resolve_root_directory(Some(Path::new("src"))).unwrap();
/// assert!(root.is_absolute());
/// ```
pub fn resolve_root_directory(path: Option<&Path>) -> Result<PathBuf> {
    let root = match path {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => env::current_dir().context("Failed to get current working directory")?,
    };

    if !root.exists() {
        anyhow::bail!("Input path does not exist or is not accessible: '{}'", root.display());
    }
    if !root.is_dir() {
        anyhow::bail!("Input path is not a directory: '{}'", root.display());
    }

    dunce::canonicalize(&root).with_context(|| format!("Failed to resolve path: '{}'", root.display()))
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

/// Colour the removed parts of `old` red and the added parts of `new` green.
///
/// The shorter side is indented so the first common run of at least three characters lines up:
/// ```text
/// The.Matrix.1999.1080p.BluRay
/// The Matrix (1999)
/// ```
#[must_use]
pub fn color_diff(old: &str, new: &str) -> (String, String) {
    let changeset = Changeset::new(old, new, "");
    let (mut old_diff, mut new_diff) = alignment_padding(old, new, &changeset.diffs);

    for diff in &changeset.diffs {
        match diff {
            Difference::Same(text) => {
                old_diff.push_str(text);
                new_diff.push_str(text);
            }
            Difference::Add(text) => new_diff.push_str(&highlight(text, Color::Green)),
            Difference::Rem(text) => old_diff.push_str(&highlight(text, Color::Red)),
        }
    }

    (old_diff, new_diff)
}

/// Write the old and new directory name as a stacked diff.
///
/// # Errors
/// Returns an error if writing to the output fails.
pub fn write_diff(out: &mut impl Write, old: &str, new: &str) -> io::Result<()> {
    let (old_diff, new_diff) = color_diff(old, new);
    writeln!(out, "{old_diff}")?;
    if old_diff != new_diff {
        writeln!(out, "{new_diff}")?;
    }
    Ok(())
}

/// Whitespace gets a background colour so that added or removed spaces are visible.
fn highlight(text: &str, color: Color) -> String {
    if text.trim().is_empty() {
        text.on_color(color).to_string()
    } else {
        text.color(color).to_string()
    }
}

fn alignment_padding(old: &str, new: &str, diffs: &[Difference]) -> (String, String) {
    let anchor = diffs.iter().find_map(|diff| match diff {
        Difference::Same(text) if text.trim().chars().count() >= 3 => Some(text.as_str()),
        _ => None,
    });

    match anchor.and_then(|text| Some((old.find(text)?, new.find(text)?))) {
        Some((old_index, new_index)) => (
            " ".repeat(new_index.saturating_sub(old_index)),
            " ".repeat(old_index.saturating_sub(new_index)),
        ),
        None => (String::new(), String::new()),
    }
}
