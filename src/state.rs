//! Application State
//!
//! Owns every store plus the shared HTTP client. Passed explicitly to services
//! and command handlers; cloning is cheap and shares the same stores.

use std::sync::Arc;

use prompt_forge_llm::{build_http_client, Dispatcher, HttpClientOptions};
use tokio::sync::RwLock;

use crate::models::settings::{AppSettings, SettingsUpdate};
use crate::storage::{ApiConfigStore, SettingsService, TemplateStore};
use crate::utils::error::AppResult;
use crate::utils::paths::DataPaths;

/// Application state
#[derive(Clone)]
pub struct AppState {
    paths: DataPaths,
    templates: Arc<RwLock<TemplateStore>>,
    api_configs: Arc<RwLock<ApiConfigStore>>,
    settings: Arc<RwLock<SettingsService>>,
    http_client: reqwest::Client,
    dispatcher: Dispatcher,
}

impl AppState {
    /// Open (or create) every store under `paths`.
    pub fn open(paths: DataPaths) -> AppResult<Self> {
        let client = build_http_client(&HttpClientOptions::default())?;
        Self::open_with_client(paths, client)
    }

    /// Like [`open`](Self::open) with a caller-supplied HTTP client.
    pub fn open_with_client(paths: DataPaths, client: reqwest::Client) -> AppResult<Self> {
        paths.ensure()?;
        let templates = TemplateStore::open(paths.templates())?;
        let api_configs = ApiConfigStore::open(paths.api_configs())?;
        let settings = SettingsService::open(paths.settings())?;

        tracing::debug!(root = %paths.root().display(), "Stores loaded");

        Ok(Self {
            paths,
            templates: Arc::new(RwLock::new(templates)),
            api_configs: Arc::new(RwLock::new(api_configs)),
            settings: Arc::new(RwLock::new(settings)),
            dispatcher: Dispatcher::new(client.clone()),
            http_client: client,
        })
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Read access to the template store
    pub async fn with_templates<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&TemplateStore) -> AppResult<T>,
    {
        let guard = self.templates.read().await;
        f(&guard)
    }

    /// Write access to the template store
    pub async fn with_templates_mut<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut TemplateStore) -> AppResult<T>,
    {
        let mut guard = self.templates.write().await;
        f(&mut guard)
    }

    /// Read access to the API config store
    pub async fn with_api_configs<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&ApiConfigStore) -> AppResult<T>,
    {
        let guard = self.api_configs.read().await;
        f(&guard)
    }

    /// Write access to the API config store
    pub async fn with_api_configs_mut<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut ApiConfigStore) -> AppResult<T>,
    {
        let mut guard = self.api_configs.write().await;
        f(&mut guard)
    }

    /// Get the current settings
    pub async fn get_settings(&self) -> AppSettings {
        self.settings.read().await.get().clone()
    }

    /// Update the settings
    pub async fn update_settings(&self, update: SettingsUpdate) -> AppResult<AppSettings> {
        self.settings.write().await.update(update)
    }

    /// Reset the settings to defaults
    pub async fn reset_settings(&self) -> AppResult<AppSettings> {
        self.settings.write().await.reset()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("paths", &self.paths)
            .finish()
    }
}
