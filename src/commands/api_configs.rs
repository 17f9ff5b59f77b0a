//! API Config Commands
//!
//! Handlers for saved provider connections and their model lists.

use prompt_forge_llm::{ApiConfig, ModelConfig};

use crate::models::api_config::{ApiConfigCreateRequest, ApiConfigSummary, ApiConfigUpdate};
use crate::models::response::CommandResponse;
use crate::services::prompt::PromptService;
use crate::state::AppState;

/// List configs with secrets masked
pub async fn list_api_configs(state: &AppState) -> CommandResponse<Vec<ApiConfigSummary>> {
    state
        .with_api_configs(|store| Ok(store.configs().iter().map(ApiConfigSummary::from).collect()))
        .await
        .into()
}

/// Get a full config by id
pub async fn get_api_config(state: &AppState, id: &str) -> CommandResponse<ApiConfig> {
    PromptService::new(state).resolve_config(Some(id)).await.into()
}

/// Create a config
pub async fn create_api_config(
    state: &AppState,
    request: ApiConfigCreateRequest,
) -> CommandResponse<ApiConfig> {
    state
        .with_api_configs_mut(|store| store.add_config(request))
        .await
        .into()
}

/// Apply a partial update to a config
pub async fn update_api_config(
    state: &AppState,
    id: &str,
    update: ApiConfigUpdate,
) -> CommandResponse<ApiConfig> {
    state
        .with_api_configs_mut(|store| store.update_config(id, update))
        .await
        .into()
}

/// Remove a config
pub async fn remove_api_config(state: &AppState, id: &str) -> CommandResponse<()> {
    state
        .with_api_configs_mut(|store| store.remove_config(id))
        .await
        .into()
}

/// Make a config the default
pub async fn set_default_api_config(state: &AppState, id: &str) -> CommandResponse<()> {
    state
        .with_api_configs_mut(|store| store.set_default_config(id))
        .await
        .into()
}

/// Get the default config
pub async fn get_default_api_config(state: &AppState) -> CommandResponse<ApiConfig> {
    PromptService::new(state).resolve_config(None).await.into()
}

/// List chat-capable models for a config (default config when `None`)
pub async fn list_models(state: &AppState, config_id: Option<&str>) -> CommandResponse<Vec<ModelConfig>> {
    PromptService::new(state).list_models(config_id).await.into()
}
