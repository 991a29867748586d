//! OMDb API client.
//!
//! Only the title search is used, and only the year, status and error fields of the response.
//!
//! Documentation:
//! <https://www.omdbapi.com/>

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::movie_name::{LookupResult, MovieLookup, MovieRenameConfig};

static RE_LEADING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{4})").expect("Failed to compile leading year regex"));

/// OMDb API client.
#[derive(Debug)]
pub struct OmdbClient {
    client: Client,
    api_url: String,
    api_key: String,
}

/// Title search response from the OMDb API.
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    /// Either "True" or "False".
    #[serde(rename = "Response")]
    response: String,
    /// Release year, or a year range for series.
    #[serde(rename = "Year", default)]
    year: String,
    /// Failure reason, only present when the response is "False".
    #[serde(rename = "Error", default)]
    error: String,
}

impl OmdbClient {
    /// Create a new client from the rename config.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &MovieRenameConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Parse an OMDb response body.
    ///
    /// # Errors
    /// Returns an error if the body is not a valid OMDb response.
    pub fn parse_response(body: &str) -> Result<LookupResult> {
        let response: OmdbResponse =
            serde_json::from_str(body).with_context(|| format!("Failed to parse OMDb response: {body}"))?;

        if response.response.eq_ignore_ascii_case("false") {
            let error = if response.error.is_empty() {
                "No match".to_string()
            } else {
                response.error
            };
            return Ok(LookupResult::NotFound { error });
        }

        Ok(RE_LEADING_YEAR
            .captures(&response.year)
            .and_then(|captures| captures.get(1))
            .map_or_else(
                || LookupResult::not_found(format!("No release year in response: '{}'", response.year)),
                |year| LookupResult::Found {
                    year: year.as_str().to_string(),
                },
            ))
    }
}

impl MovieLookup for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<LookupResult> {
        let response = match self
            .client
            .get(&self.api_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => return Ok(LookupResult::not_found(format!("HTTP request failed: {error}"))),
        };

        // OMDb returns a JSON error body also for non-success statuses like an invalid API key.
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => return Ok(LookupResult::not_found(format!("Failed to read response: {error}"))),
        };

        Self::parse_response(&body)
    }
}
