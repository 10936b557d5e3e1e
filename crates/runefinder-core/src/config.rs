//! Centralized configuration for RuneFinder.
//!
//! Constants live on unit structs grouped by concern. [`ResolverConfig`] is the
//! one runtime value; it is the only place the process environment is read.

use crate::error::{Result, RuneError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Facts about the Unicode Character Database file format and its source.
pub struct UcdConfig;

impl UcdConfig {
    pub const SOURCE_URL: &'static str = "https://www.unicode.org/Public/UNIDATA/UnicodeData.txt";
    pub const FILE_NAME: &'static str = "UnicodeData.txt";
    pub const PATH_ENV_VAR: &'static str = "UCD_PATH";
    pub const FIELD_SEPARATOR: char = ';';
    pub const MIN_FIELDS: usize = 11;
    pub const NAME_FIELD: usize = 1;
    pub const ALIAS_FIELD: usize = 10;
}

/// Network operation settings.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);
    pub const USER_AGENT: &'static str = "RuneFinder/0.1";
    pub const DOWNLOAD_TEMP_SUFFIX: &'static str = ".part";
}

/// Shared directory and path names.
pub struct PathsConfig;

impl PathsConfig {
    pub const APP_CACHE_DIR_NAME: &'static str = "runefinder";
}

/// Where the database lives and how to fetch it when it is missing.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Configured location, usually taken from `UCD_PATH`.
    pub database_path: Option<PathBuf>,
    /// Fallback location when nothing else is configured.
    pub default_path: PathBuf,
    /// Canonical copy downloaded when the file is absent.
    pub source_url: String,
    /// Upper bound on one fetch, from request to rename.
    pub fetch_timeout: Duration,
    /// Per-request timeout handed to the HTTP client.
    pub request_timeout: Duration,
}

impl ResolverConfig {
    /// Create a config with no configured path and the given fallback.
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: None,
            default_path: default_path.into(),
            source_url: UcdConfig::SOURCE_URL.to_string(),
            fetch_timeout: NetworkConfig::FETCH_TIMEOUT,
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
        }
    }

    /// Build the config from the process environment.
    ///
    /// `UCD_PATH` sets the configured path when present and non-empty; the
    /// fallback is `<cache dir>/runefinder/UnicodeData.txt`.
    pub fn from_env() -> Result<Self> {
        let default_path = crate::platform::default_database_path()?;
        let database_path = std::env::var_os(UcdConfig::PATH_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            database_path,
            ..Self::new(default_path)
        })
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The path used when no override is given.
    pub fn configured_path(&self) -> &Path {
        self.database_path.as_deref().unwrap_or(&self.default_path)
    }

    /// Reject settings that can never produce a working fetch.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.source_url).map_err(|e| RuneError::Config {
            message: format!("Invalid source URL {:?}: {}", self.source_url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RuneError::Config {
                message: format!("Unsupported source URL scheme: {}", url.scheme()),
            });
        }
        if self.fetch_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(RuneError::Config {
                message: "Timeouts must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
