//! Name resolution from a raw directory name to a `Title (Year)` proposal.

use anyhow::Result;
use colored::Colorize;

use crate::movie_name::{
    LookupResult, MovieLookup, MovieRenameConfig, candidate_title, match_title_year, normalize_punctuation,
};
use crate::print_warning;

/// Result of resolving one directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The name already contained a year.
    Matched { normalized: String, name: String },
    /// No year in the name, resolved through noise removal and lookup.
    Fallback { normalized: String, name: String },
}

/// Resolves directory names using the config noise tokens and a metadata lookup.
#[derive(Debug)]
pub struct NameResolver<'a, L: MovieLookup> {
    config: &'a MovieRenameConfig,
    lookup: &'a L,
}

impl Resolution {
    /// The proposed new name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Matched { name, .. } | Self::Fallback { name, .. } => name,
        }
    }

    /// The name after separator normalization.
    #[must_use]
    pub fn normalized(&self) -> &str {
        match self {
            Self::Matched { normalized, .. } | Self::Fallback { normalized, .. } => normalized,
        }
    }

    /// True if the name already was in the canonical form.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Matched { normalized, name } if normalized == name)
    }
}

impl<'a, L: MovieLookup> NameResolver<'a, L> {
    #[must_use]
    pub const fn new(config: &'a MovieRenameConfig, lookup: &'a L) -> Self {
        Self { config, lookup }
    }

    /// Resolve a raw directory name.
    ///
    /// Names with an embedded year are rewritten directly,
    /// everything else goes through [`Self::fallback_name`].
    ///
    /// # Errors
    /// Returns an error if the metadata lookup returns a malformed response.
    pub async fn resolve(&self, raw_name: &str) -> Result<Resolution> {
        let normalized = normalize_punctuation(raw_name);
        if let Some(name) = match_title_year(&normalized) {
            return Ok(Resolution::Matched { normalized, name });
        }

        if self.config.verbose {
            println!("{} {normalized}", "No year match:".dimmed());
        }

        let name = self.fallback_name(&normalized).await?;
        Ok(Resolution::Fallback { normalized, name })
    }

    /// Strip release noise from the name and look up the release year for the remaining title.
    ///
    /// Returns the bare title if the lookup does not find a match,
    /// and an empty string if nothing is left after cleanup.
    ///
    /// # Errors
    /// Returns an error if the metadata lookup returns a malformed response.
    pub async fn fallback_name(&self, name: &str) -> Result<String> {
        let candidate = candidate_title(name, &self.config.noise_tokens);
        if candidate.is_empty() {
            return Ok(candidate);
        }

        if self.config.verbose {
            println!("{} {candidate}", "Lookup:".dimmed());
        }

        match self.lookup.lookup(&candidate).await? {
            LookupResult::Found { year } => Ok(format!("{candidate} ({year})")),
            LookupResult::NotFound { error } => {
                print_warning!("Lookup failed for '{candidate}': {error}");
                Ok(candidate)
            }
        }
    }
}
