//! Cross-Platform Path Utilities
//!
//! Resolves the data directory (`~/.prompt-forge/`) and the JSON files kept in it.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

const TEMPLATES_FILE: &str = "templates.json";
const API_CONFIGS_FILE: &str = "api-configs.json";
const SETTINGS_FILE: &str = "settings.json";

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the default data directory (~/.prompt-forge/)
pub fn prompt_forge_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".prompt-forge"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Locations of the persisted stores under one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Paths under `~/.prompt-forge/`.
    pub fn default_location() -> AppResult<Self> {
        Ok(Self::new(prompt_forge_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn templates(&self) -> PathBuf {
        self.root.join(TEMPLATES_FILE)
    }

    pub fn api_configs(&self) -> PathBuf {
        self.root.join(API_CONFIGS_FILE)
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    /// Create the data directory if it is missing.
    pub fn ensure(&self) -> AppResult<()> {
        ensure_dir(&self.root)
    }
}
