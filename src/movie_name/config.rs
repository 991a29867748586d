//! Configuration for movie directory renaming.

use std::time::Duration;
use std::{env, fmt, fs};

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::movie_name::NOISE_TOKENS;

/// Environment variable holding the OMDb API key.
pub const API_KEY_ENV_VAR: &str = "OMNIAPIKEY";

const DEFAULT_API_URL: &str = "http://www.omdbapi.com";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Config from the user config file.
#[derive(Debug, Default, Deserialize)]
pub struct MovieRenameUserConfig {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub dryrun: Option<bool>,
    #[serde(default)]
    pub noop: bool,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub verbose: bool,
}

/// Wrapper needed for parsing the config section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    movie_rename: MovieRenameUserConfig,
}

/// Final config created from CLI arguments, user config file and environment.
#[derive(Debug, Clone)]
pub struct MovieRenameConfig {
    pub api_key: String,
    pub api_url: String,
    pub dryrun: bool,
    pub noise_tokens: Vec<String>,
    pub noop: bool,
    pub skip_confirmation: bool,
    pub timeout: Duration,
    pub verbose: bool,
}

impl MovieRenameUserConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = crate::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.movie_rename)
            .context("Failed to parse movie_rename config TOML")
    }
}

impl MovieRenameConfig {
    /// Create config with default settings and the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            dryrun: true,
            noise_tokens: NOISE_TOKENS.iter().map(ToString::to_string).collect(),
            noop: false,
            skip_confirmation: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            verbose: false,
        }
    }

    /// Create config from the user config file values.
    /// Values not set in the file use the defaults.
    ///
    /// # Errors
    /// Returns an error if the configured timeout is zero.
    pub fn from_user_config(api_key: impl Into<String>, user_config: MovieRenameUserConfig) -> anyhow::Result<Self> {
        let mut config = Self::new(api_key);
        if let Some(api_url) = user_config.api_url.filter(|url| !url.trim().is_empty()) {
            config.api_url = api_url.trim().to_string();
        }
        if let Some(timeout) = user_config.timeout {
            if timeout == 0 {
                bail!("Lookup timeout must be at least one second");
            }
            config.timeout = Duration::from_secs(timeout);
        }
        config.dryrun = user_config.dryrun.unwrap_or(true);
        config.noop = user_config.noop;
        config.verbose = user_config.verbose;
        Ok(config)
    }

    /// Read the API key from the environment.
    ///
    /// # Errors
    /// Returns an error if the variable is not set or is empty.
    pub fn api_key_from_env() -> anyhow::Result<String> {
        Self::validate_api_key(env::var(API_KEY_ENV_VAR).ok())
    }

    /// Check that an API key value is present.
    ///
    /// # Errors
    /// Returns an error if the key is missing or blank.
    pub fn validate_api_key(value: Option<String>) -> anyhow::Result<String> {
        match value.map(|key| key.trim().to_string()) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => bail!("{API_KEY_ENV_VAR} not set in env"),
        }
    }
}

impl fmt::Display for MovieRenameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "  api url:  {}", self.api_url)?;
        writeln!(f, "  dryrun:   {}", crate::colorize_bool(self.dryrun))?;
        writeln!(f, "  noop:     {}", crate::colorize_bool(self.noop))?;
        writeln!(f, "  timeout:  {}s", self.timeout.as_secs())?;
        writeln!(f, "  verbose:  {}", crate::colorize_bool(self.verbose))?;
        write!(f, "  noise:    {}", self.noise_tokens.join(", "))
    }
}
