//! Atomic file downloads.
//!
//! The body is streamed into a uniquely named temp file next to the
//! destination, synced, then renamed over the destination. Readers of the
//! destination path see either no file or a complete one.

use crate::config::NetworkConfig;
use crate::network::client::HttpClient;
use crate::{Result, RuneError};
use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Downloads a URL to a local path.
#[derive(Debug, Clone)]
pub struct Downloader {
    http: Arc<HttpClient>,
    temp_suffix: String,
}

impl Downloader {
    /// Create a downloader with a custom HTTP client.
    pub fn with_client(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            temp_suffix: NetworkConfig::DOWNLOAD_TEMP_SUFFIX.to_string(),
        }
    }

    /// Download `url` to `destination`, returning the number of bytes written.
    ///
    /// On any error the temp file is removed and `destination` is untouched.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        let parent = parent_dir(destination);
        if !parent.exists() {
            std::fs::create_dir_all(&parent).map_err(|e| RuneError::Io {
                message: format!("Failed to create directory: {}", e),
                path: Some(parent.clone()),
                source: Some(e),
            })?;
        }

        let prefix = format!(
            ".{}.",
            destination
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&self.temp_suffix)
            .tempfile_in(&parent)
            .map_err(|e| RuneError::Io {
                message: format!("Failed to create temp file: {}", e),
                path: Some(parent.clone()),
                source: Some(e),
            })?;
        debug!("Downloading {} via {}", url, temp.path().display());

        let response = self.http.get(url).await?;
        let mut stream = response.bytes_stream();
        let mut bytes_downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| RuneError::Network {
                message: format!("Error reading download stream: {}", e),
                source: Some(e),
            })?;

            temp.write_all(&chunk).map_err(|e| RuneError::Io {
                message: format!("Failed to write to temp file: {}", e),
                path: Some(temp.path().to_path_buf()),
                source: Some(e),
            })?;
            bytes_downloaded += chunk.len() as u64;
        }

        temp.flush()
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| RuneError::Io {
                message: format!("Failed to sync temp file: {}", e),
                path: Some(temp.path().to_path_buf()),
                source: Some(e),
            })?;

        temp.persist(destination).map_err(|e| RuneError::Io {
            message: format!("Failed to move download to final destination: {}", e.error),
            path: Some(destination.to_path_buf()),
            source: Some(e.error),
        })?;

        info!(
            "Downloaded {} bytes to {}",
            bytes_downloaded,
            destination.display()
        );
        Ok(bytes_downloaded)
    }
}

/// Directory a file path lives in; `.` for bare file names.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
