//! Application configuration: where the Serato library and the music
//! library live on disk

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::database::DATABASE_FILENAME;
use crate::error::{Error, Result};

/// Configuration for seratosync
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the `_Serato_` folder holding `database V2` and `Subcrates/`
    #[serde(default)]
    pub serato_db_path: String,
    /// Root of the on-disk music library to mirror
    #[serde(default)]
    pub music_library_path: String,
}

impl Config {
    /// Resolve the config file location
    ///
    /// A `config.json` in the working directory wins; otherwise the
    /// platform config directory under `seratosync/` is used.
    pub fn config_path() -> PathBuf {
        let local = PathBuf::from("config.json");
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|p| p.join("seratosync").join("config.json"))
            .unwrap_or(local)
    }

    /// Load from the default location; a missing file is an empty config
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path; a missing file is an empty config
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save to an explicit path, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content + "\n")?;
        Ok(())
    }

    /// Full path of the `database V2` file
    pub fn database_path(&self) -> PathBuf {
        Path::new(&self.serato_db_path).join(DATABASE_FILENAME)
    }

    /// Check that both paths are set
    pub fn validate(&self) -> Result<()> {
        if self.serato_db_path.trim().is_empty() || self.music_library_path.trim().is_empty() {
            return Err(Error::Config(
                "Serato DB path or Music Library path not set".to_string(),
            ));
        }
        Ok(())
    }
}
