use std::future::Future;

use anyhow::Result;

/// Outcome of a single movie metadata query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    /// Match found with the release year.
    Found { year: String },
    /// No match, or the request itself failed.
    NotFound { error: String },
}

/// Metadata source that can resolve a movie title to its release year.
pub trait MovieLookup {
    /// Look up the release year for the given title.
    ///
    /// Transport failures and misses are reported as [`LookupResult::NotFound`].
    ///
    /// # Errors
    /// Returns an error only if the response does not have the expected shape.
    fn lookup(&self, title: &str) -> impl Future<Output = Result<LookupResult>> + Send;
}

impl LookupResult {
    /// Create a not found result with the given reason.
    #[must_use]
    pub fn not_found(error: impl Into<String>) -> Self {
        Self::NotFound { error: error.into() }
    }
}
