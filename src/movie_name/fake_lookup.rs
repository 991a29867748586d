//! In-memory lookup for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, bail};

use crate::movie_name::{LookupResult, MovieLookup};

/// Lookup returning fixed years and recording every query.
#[derive(Debug, Default)]
pub struct FakeLookup {
    years: HashMap<String, String>,
    queries: Mutex<Vec<String>>,
    malformed: bool,
}

impl FakeLookup {
    pub fn with_year(title: &str, year: &str) -> Self {
        Self {
            years: HashMap::from([(title.to_string(), year.to_string())]),
            ..Default::default()
        }
    }

    /// Lookup that fails every query as if the response body could not be parsed.
    pub fn malformed() -> Self {
        Self {
            malformed: true,
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl MovieLookup for FakeLookup {
    async fn lookup(&self, title: &str) -> Result<LookupResult> {
        self.queries.lock().unwrap().push(title.to_string());
        if self.malformed {
            bail!("Failed to parse response");
        }
        Ok(self.years.get(title).map_or_else(
            || LookupResult::not_found("Movie not found!"),
            |year| LookupResult::Found { year: year.clone() },
        ))
    }
}
