//! API Config Requests
//!
//! Create/update payloads for saved provider connections. The persisted
//! record itself is [`prompt_forge_llm::ApiConfig`].

use prompt_forge_llm::{ApiConfig, ApiHeaderConfig, ApiProvider, AuthType, ModelConfig, ProviderId};
use serde::{Deserialize, Serialize};

/// Request to create a new API config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfigCreateRequest {
    pub name: String,
    pub url: String,
    pub provider: ApiProvider,
    pub auth_type: Option<AuthType>,
    pub auth_key: Option<String>,
    pub auth_value: Option<String>,
    #[serde(default)]
    pub headers: Vec<ApiHeaderConfig>,
    pub selected_model: Option<String>,
    pub custom_models: Option<Vec<ModelConfig>>,
    #[serde(default)]
    pub is_default: bool,
}

/// Partial update of an API config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfigUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub provider: Option<ApiProvider>,
    pub auth_type: Option<AuthType>,
    pub auth_key: Option<String>,
    pub auth_value: Option<String>,
    pub headers: Option<Vec<ApiHeaderConfig>>,
    pub selected_model: Option<String>,
    pub custom_models: Option<Vec<ModelConfig>>,
    pub is_default: Option<bool>,
}

impl ApiConfigUpdate {
    /// Apply every field except `is_default`, which the store arbitrates.
    pub fn apply_to(self, config: &mut ApiConfig) {
        if let Some(name) = self.name {
            config.name = name;
        }
        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(provider) = self.provider {
            config.provider = provider.into();
        }
        if let Some(auth_type) = self.auth_type {
            config.auth_type = Some(auth_type);
        }
        if let Some(auth_key) = self.auth_key {
            config.auth_key = Some(auth_key);
        }
        if let Some(auth_value) = self.auth_value {
            config.auth_value = Some(auth_value);
        }
        if let Some(headers) = self.headers {
            config.headers = headers;
        }
        if let Some(model) = self.selected_model {
            config.selected_model = Some(model);
        }
        if let Some(models) = self.custom_models {
            config.custom_models = Some(models);
        }
    }
}

/// Config as shown in listings, with the secret masked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfigSummary {
    pub id: String,
    pub name: String,
    pub url: String,
    pub provider: ProviderId,
    pub auth_type: Option<AuthType>,
    pub has_auth_value: bool,
    pub selected_model: Option<String>,
    pub is_default: bool,
}

impl From<&ApiConfig> for ApiConfigSummary {
    fn from(config: &ApiConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            url: config.url.clone(),
            provider: config.provider.clone(),
            auth_type: config.auth_type,
            has_auth_value: config.auth_value.as_deref().is_some_and(|v| !v.is_empty()),
            selected_model: config.selected_model.clone(),
            is_default: config.is_default,
        }
    }
}
