//! Locating, fetching and opening the character database.
//!
//! Resolution order for the database path:
//! 1. An explicit override passed to [`SourceResolver::resolve`]
//! 2. The configured path ([`ResolverConfig::database_path`])
//! 3. The default path in the platform cache directory
//!
//! A missing file is downloaded before it is opened. The download runs as a
//! separate task and reports back over a one-shot channel; the file is only
//! opened after that signal, and the download itself lands by atomic rename,
//! so no caller can open a half-written database.

use crate::config::ResolverConfig;
use crate::network::{Downloader, HttpClient};
use crate::{Result, RuneError};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Open handle on the database. Dropping it closes the file.
pub type UcdReader = BufReader<File>;

/// Resolves the database path and guarantees the file exists before opening it.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    config: ResolverConfig,
    downloader: Downloader,
}

impl SourceResolver {
    /// Create a resolver from an explicit configuration.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_timeout(config.request_timeout)?;
        Ok(Self {
            config,
            downloader: Downloader::with_client(Arc::new(http)),
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Compute the database path without touching the file system.
    pub fn locate(&self, override_path: Option<&Path>) -> PathBuf {
        match override_path {
            Some(path) => path.to_path_buf(),
            None => self.config.configured_path().to_path_buf(),
        }
    }

    /// Open the database, downloading it first if it does not exist.
    pub async fn resolve(&self, override_path: Option<&Path>) -> Result<UcdReader> {
        let path = self.locate(override_path);
        debug!("Resolving character database at {}", path.display());

        match open_database(&path) {
            Ok(reader) => return Ok(reader),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} not found, fetching {}", path.display(), self.config.source_url);
            }
            Err(e) => return Err(open_error(e, &path)),
        }

        self.fetch(&path).await?;
        open_database(&path).map_err(|e| open_error(e, &path))
    }

    /// Download the database to `path` and wait for the download to finish.
    async fn fetch(&self, path: &Path) -> Result<u64> {
        let (done_tx, done_rx) = oneshot::channel();
        let downloader = self.downloader.clone();
        let url = self.config.source_url.clone();
        let destination = path.to_path_buf();

        let task = tokio::spawn(async move {
            let result = downloader.download(&url, &destination).await;
            // The receiver is gone only if the resolve call was abandoned
            let _ = done_tx.send(result);
        });

        let result = match tokio::time::timeout(self.config.fetch_timeout, done_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(RuneError::Other(
                "Download task ended without reporting a result".to_string(),
            )),
            Err(_) => {
                // Wait for the task to unwind so its temp file is gone on return
                task.abort();
                let _ = task.await;
                Err(RuneError::Timeout(self.config.fetch_timeout))
            }
        };

        if let Err(ref e) = result {
            warn!("Fetching {} failed: {}", self.config.source_url, e);
        }
        result
    }
}

fn open_database(path: &Path) -> io::Result<UcdReader> {
    let file = File::open(path)?;
    if file.metadata()?.is_dir() {
        return Err(io::Error::new(io::ErrorKind::Other, "path is a directory"));
    }
    Ok(BufReader::new(file))
}

fn open_error(err: io::Error, path: &Path) -> RuneError {
    // Linux lets File::open succeed on directories; other platforms refuse
    if path.is_dir() {
        return RuneError::NotAFile(path.to_path_buf());
    }
    RuneError::io_with_path(err, path)
}
