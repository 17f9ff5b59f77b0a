//! API Config Store
//!
//! Saved provider connections, persisted to `api-configs.json`.
//!
//! Whenever at least one config exists exactly one of them is the default.
//! Every mutation below preserves that, and a file that violates it is
//! repaired on load.

use std::path::PathBuf;

use chrono::Utc;
use prompt_forge_llm::ApiConfig;
use uuid::Uuid;

use crate::models::api_config::{ApiConfigCreateRequest, ApiConfigUpdate};
use crate::storage::json_file;
use crate::utils::error::{AppError, AppResult};

/// API config store backed by a JSON file
#[derive(Debug)]
pub struct ApiConfigStore {
    path: PathBuf,
    configs: Vec<ApiConfig>,
}

impl ApiConfigStore {
    /// Load configs from `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let mut configs: Vec<ApiConfig> = json_file::load_or_default(&path)?;
        if repair_default(&mut configs) {
            tracing::warn!("API configs did not have exactly one default; repaired");
            json_file::save(&path, &configs)?;
        }
        Ok(Self { path, configs })
    }

    /// Persist `next`, then make it current. On failure nothing changes.
    fn commit(&mut self, next: Vec<ApiConfig>) -> AppResult<()> {
        json_file::save(&self.path, &next)?;
        self.configs = next;
        Ok(())
    }

    fn position(&self, id: &str) -> AppResult<usize> {
        self.configs
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| AppError::not_found(format!("API config {}", id)))
    }

    fn validate(config: &ApiConfig) -> AppResult<()> {
        if config.name.trim().is_empty() {
            return Err(AppError::validation("Config name cannot be empty"));
        }
        url::Url::parse(&config.url)
            .map_err(|e| AppError::validation(format!("Invalid URL '{}': {}", config.url, e)))?;
        Ok(())
    }

    pub fn configs(&self) -> &[ApiConfig] {
        &self.configs
    }

    pub fn get(&self, id: &str) -> Option<&ApiConfig> {
        self.configs.iter().find(|c| c.id == id)
    }

    pub fn get_default_config(&self) -> Option<&ApiConfig> {
        self.configs.iter().find(|c| c.is_default)
    }

    /// Add a config. The first config, or one flagged default, becomes the default.
    pub fn add_config(&mut self, request: ApiConfigCreateRequest) -> AppResult<ApiConfig> {
        let now = Utc::now();
        let config = ApiConfig {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            url: request.url,
            provider: request.provider.into(),
            auth_type: request.auth_type,
            auth_key: request.auth_key,
            auth_value: request.auth_value,
            headers: request.headers,
            selected_model: request.selected_model,
            custom_models: request.custom_models,
            is_default: false,
            created_at: now,
            updated_at: now,
        };
        Self::validate(&config)?;

        let becomes_default = request.is_default || self.configs.is_empty();
        let mut next = self.configs.clone();
        next.push(config);
        let index = next.len() - 1;
        if becomes_default {
            make_default(&mut next, index);
        }
        let added = next[index].clone();
        self.commit(next)?;

        tracing::info!(id = %added.id, provider = %added.provider, "API config added");
        Ok(added)
    }

    /// Merge `update` into a config.
    ///
    /// `is_default: Some(true)` moves the default here. `Some(false)` on the
    /// default hands it to the first other config, or is ignored when this is
    /// the only config.
    pub fn update_config(&mut self, id: &str, update: ApiConfigUpdate) -> AppResult<ApiConfig> {
        let index = self.position(id)?;
        let default_flag = update.is_default;

        let mut candidate = self.configs[index].clone();
        update.apply_to(&mut candidate);
        candidate.updated_at = Utc::now();
        Self::validate(&candidate)?;
        let mut next = self.configs.clone();
        next[index] = candidate;

        match default_flag {
            Some(true) => make_default(&mut next, index),
            Some(false) if next[index].is_default => {
                if let Some(other) = (0..next.len()).find(|i| *i != index) {
                    make_default(&mut next, other);
                }
            }
            _ => {}
        }
        let updated = next[index].clone();
        self.commit(next)?;

        tracing::info!(id = %id, "API config updated");
        Ok(updated)
    }

    /// Remove a config. Removing the default promotes the first remaining one.
    pub fn remove_config(&mut self, id: &str) -> AppResult<()> {
        let index = self.position(id)?;
        let mut next = self.configs.clone();
        let removed = next.remove(index);
        if removed.is_default && !next.is_empty() {
            make_default(&mut next, 0);
        }
        self.commit(next)?;
        tracing::info!(id = %id, "API config removed");
        Ok(())
    }

    pub fn set_default_config(&mut self, id: &str) -> AppResult<()> {
        let index = self.position(id)?;
        let mut next = self.configs.clone();
        make_default(&mut next, index);
        self.commit(next)
    }
}

/// Force exactly one default: the first flagged config, else the first config.
/// Returns whether anything changed.
fn repair_default(configs: &mut [ApiConfig]) -> bool {
    let keep = configs
        .iter()
        .position(|c| c.is_default)
        .or(if configs.is_empty() { None } else { Some(0) });

    let mut changed = false;
    for (i, config) in configs.iter_mut().enumerate() {
        let should_be_default = Some(i) == keep;
        if config.is_default != should_be_default {
            config.is_default = should_be_default;
            changed = true;
        }
    }
    changed
}

fn make_default(configs: &mut [ApiConfig], index: usize) {
    for (i, config) in configs.iter_mut().enumerate() {
        config.is_default = i == index;
    }
}
