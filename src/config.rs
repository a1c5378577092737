//! Configuration loaded from a TOML file.
//!
//! The file names the catalog database and the library directory to import:
//!
//! ```toml
//! database = "music.db"
//! library = "/home/me/Music"
//! ```
//!
//! Lookup order when no explicit path is given:
//! 1. `./config.toml`
//! 2. The OS-standard config directory:
//!    - Windows: %APPDATA%\music-catalog\config.toml
//!    - macOS: ~/Library/Application Support/music-catalog/config.toml
//!    - Linux: ~/.config/music-catalog/config.toml
//!
//! Unlike settings that can fall back to defaults, both keys are required, so
//! a missing or malformed file is an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file in every searched location.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file path, or a full `sqlite:` URL
    pub database: String,

    /// Root of the music library scanned by `import`
    pub library: PathBuf,
}

impl Config {
    /// Where the catalog is stored.
    pub fn storage_location(&self) -> &str {
        &self.database
    }

    /// The directory tree `import` reads from.
    pub fn library_directory(&self) -> &Path {
        &self.library
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-catalog"))
}

/// Resolve which config file to load.
///
/// An explicit path is returned as-is, even if it does not exist, so the
/// caller gets a read error naming it.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(local);
    }

    let global = config_dir().map(|d| d.join(CONFIG_FILE_NAME));
    match global {
        Some(path) if path.is_file() => Ok(path),
        _ => Err(ConfigError::NotFound),
    }
}

/// Load configuration from a specific file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config: Config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;

    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Locate and load the configuration.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = locate(explicit)?;
    load_from(&path)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No {CONFIG_FILE_NAME} found in the current directory or the user config directory")]
    NotFound,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

// ============================================================================
// Tests
// ============================================================================
