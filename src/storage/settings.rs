//! Settings Service
//!
//! Handles reading and writing `settings.json`.

use std::path::{Path, PathBuf};

use crate::models::settings::{AppSettings, SettingsUpdate};
use crate::storage::json_file;
use crate::utils::error::{AppError, AppResult};

/// Settings service for managing app settings
#[derive(Debug)]
pub struct SettingsService {
    path: PathBuf,
    settings: AppSettings,
}

impl SettingsService {
    /// Load settings from `path`, writing defaults when the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let settings = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            let defaults = AppSettings::default();
            Self::save_to_file(&path, &defaults)?;
            defaults
        };
        Ok(Self { path, settings })
    }

    fn load_from_file(path: &Path) -> AppResult<AppSettings> {
        let settings: AppSettings = json_file::load_or_default(path)?;
        settings.validate().map_err(AppError::validation)?;
        Ok(settings)
    }

    fn save_to_file(path: &Path, settings: &AppSettings) -> AppResult<()> {
        settings.validate().map_err(AppError::validation)?;
        json_file::save(path, settings)
    }

    /// Get the current settings
    pub fn get(&self) -> &AppSettings {
        &self.settings
    }

    /// Apply a partial update. Invalid results are rejected and nothing is saved.
    pub fn update(&mut self, update: SettingsUpdate) -> AppResult<AppSettings> {
        let mut next = self.settings.clone();
        next.apply_update(update);
        Self::save_to_file(&self.path, &next)?;
        self.settings = next;
        tracing::info!(
            stream_responses = self.settings.stream_responses,
            debounce_ms = self.settings.debounce_ms,
            "Settings updated"
        );
        Ok(self.settings.clone())
    }

    /// Reset settings to defaults
    pub fn reset(&mut self) -> AppResult<AppSettings> {
        self.settings = AppSettings::default();
        Self::save_to_file(&self.path, &self.settings)?;
        Ok(self.settings.clone())
    }
}
