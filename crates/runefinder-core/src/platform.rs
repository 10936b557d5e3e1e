//! Platform-specific path utilities.

use crate::config::{PathsConfig, UcdConfig};
use crate::error::{Result, RuneError};
use std::path::PathBuf;

/// Get the RuneFinder cache directory.
///
/// # Platform Behavior
/// - **Linux**: `~/.cache/runefinder` (XDG_CACHE_HOME)
/// - **Windows**: `%LOCALAPPDATA%\runefinder`
/// - **macOS**: `~/Library/Caches/runefinder`
pub fn cache_dir() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .or_else(dirs::config_dir)
        .ok_or_else(|| RuneError::Config {
            message: "Could not determine platform cache directory".to_string(),
        })?;
    Ok(cache_dir.join(PathsConfig::APP_CACHE_DIR_NAME))
}

/// Default location of the character database.
///
/// Returns `{cache_dir}/UnicodeData.txt`.
pub fn default_database_path() -> Result<PathBuf> {
    Ok(cache_dir()?.join(UcdConfig::FILE_NAME))
}
