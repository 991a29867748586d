//! Movie directory name resolution and renaming.
//!
//! Directory names go through two stages:
//! a direct `Title Year` pattern match, and when that fails,
//! a fallback that strips release noise and looks the title up from OMDb to recover the year.

mod config;
#[cfg(test)]
mod fake_lookup;
mod lookup;
mod normalize;
mod omdb;
mod pattern;
mod rename;
mod resolve;

pub use config::{API_KEY_ENV_VAR, MovieRenameConfig, MovieRenameUserConfig};
pub use lookup::{LookupResult, MovieLookup};
pub use normalize::{NOISE_TOKENS, candidate_title, capitalize_words, clean_name, extract_title, strip_noise};
pub use omdb::OmdbClient;
pub use pattern::{match_title_year, normalize_punctuation};
pub use rename::{MovieRename, RenameDecision};
pub use resolve::{NameResolver, Resolution};
