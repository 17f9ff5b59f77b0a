//! Model Catalog
//!
//! Lists the models a config can target. OpenAI and Anthropic are queried
//! live; every other case, and every failure, falls back to a static list.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;

use crate::auth::apply_extra_headers;
use crate::provider::normalize_base_url;
use crate::types::{ApiConfig, ApiProvider, AuthType, LlmError, LlmResult, ModelConfig};

/// Substrings marking non-chat OpenAI models.
const NON_CHAT_MARKERS: &[&str] = &[
    "vision", "audio", "whisper", "dall", "tts", "text", "omni", "babbage", "realtime", "davinci",
];

#[derive(Debug, Deserialize)]
struct OpenAIModelList {
    data: Vec<OpenAIModel>,
}

#[derive(Debug, Deserialize)]
struct OpenAIModel {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicModelList {
    models: Vec<AnthropicModel>,
}

#[derive(Debug, Deserialize)]
struct AnthropicModel {
    name: String,
    #[serde(default)]
    max_tokens: Option<u32>,
}

fn model(id: &str, name: &str, provider: ApiProvider, context: u32, output: u32) -> ModelConfig {
    ModelConfig {
        context_window: Some(context),
        max_output_tokens: Some(output),
        ..ModelConfig::new(id, name, provider)
    }
}

/// Built-in model list for a provider. Empty for `custom`.
pub fn default_models(provider: ApiProvider) -> Vec<ModelConfig> {
    use ApiProvider::*;
    match provider {
        OpenAI => vec![
            model("gpt-4o", "GPT-4o", OpenAI, 128_000, 16_384),
            model("gpt-4o-mini", "GPT-4o mini", OpenAI, 128_000, 16_384),
            model("gpt-4-turbo", "GPT-4 Turbo", OpenAI, 128_000, 4_096),
            model("gpt-3.5-turbo", "GPT-3.5 Turbo", OpenAI, 16_385, 4_096),
        ],
        Anthropic => vec![
            model("claude-3-opus-20240229", "Claude 3 Opus", Anthropic, 200_000, 4_096),
            model("claude-3-sonnet-20240229", "Claude 3 Sonnet", Anthropic, 200_000, 4_096),
            model("claude-3-haiku-20240307", "Claude 3 Haiku", Anthropic, 200_000, 4_096),
        ],
        DeepSeek => vec![
            model("deepseek-chat", "DeepSeek Chat", DeepSeek, 64_000, 8_192),
            model("deepseek-reasoner", "DeepSeek Reasoner", DeepSeek, 64_000, 8_192),
        ],
        Gemini => vec![
            model("gemini-1.5-pro", "Gemini 1.5 Pro", Gemini, 2_097_152, 8_192),
            model("gemini-1.5-flash", "Gemini 1.5 Flash", Gemini, 1_048_576, 8_192),
        ],
        Custom => Vec::new(),
    }
}

/// Drop OpenAI models that are not chat-capable. Other providers pass through.
pub fn filter_chat_models(provider: ApiProvider, models: Vec<ModelConfig>) -> Vec<ModelConfig> {
    if provider != ApiProvider::OpenAI {
        return models;
    }
    models
        .into_iter()
        .filter(|m| {
            let id = m.id.to_lowercase();
            !NON_CHAT_MARKERS.iter().any(|marker| id.contains(marker))
        })
        .collect()
}

/// Models available for a config. Never fails.
pub async fn fetch_available_models(client: &reqwest::Client, config: &ApiConfig) -> Vec<ModelConfig> {
    let provider = match config.provider.resolve() {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!(config = %config.id, "{}", e);
            return Vec::new();
        }
    };

    if provider == ApiProvider::Custom {
        return config
            .custom_models
            .iter()
            .flatten()
            .map(|m| ModelConfig {
                provider: ApiProvider::Custom,
                ..m.clone()
            })
            .collect();
    }

    if config.auth_value.as_deref().map_or(true, str::is_empty) {
        return default_models(provider);
    }

    let fetched = match provider {
        ApiProvider::OpenAI => fetch_openai_models(client, config).await,
        ApiProvider::Anthropic => fetch_anthropic_models(client, config).await,
        _ => return default_models(provider),
    };

    match fetched {
        Ok(models) => {
            tracing::debug!(provider = %provider, count = models.len(), "Fetched models");
            models
        }
        Err(e) => {
            tracing::warn!(provider = %provider, "Error fetching models: {}", e);
            default_models(provider)
        }
    }
}

fn listing_headers(config: &ApiConfig) -> LlmResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let (Some(AuthType::Bearer), Some(token)) = (config.auth_type, config.auth_value.as_deref()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| LlmError::config("Invalid value for header Authorization"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    apply_extra_headers(&config.headers, &mut headers)?;
    Ok(headers)
}

async fn get_model_list<T: for<'de> Deserialize<'de>>(
    client: &reqwest::Client,
    config: &ApiConfig,
) -> LlmResult<T> {
    let url = format!("{}/models", normalize_base_url(&config.url));
    let response = client.get(&url).headers(listing_headers(config)?).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LlmError::Http {
            status: status.as_u16(),
            message: "Failed to fetch models".to_string(),
        });
    }
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| LlmError::parse(e.to_string()))
}

async fn fetch_openai_models(
    client: &reqwest::Client,
    config: &ApiConfig,
) -> LlmResult<Vec<ModelConfig>> {
    let list: OpenAIModelList = get_model_list(client, config).await?;
    Ok(list
        .data
        .into_iter()
        .map(|m| {
            let context = if m.id.contains("gpt-4") { 8192 } else { 4096 };
            let name = m.name.unwrap_or_else(|| m.id.clone());
            ModelConfig {
                context_window: Some(context),
                ..ModelConfig::new(m.id, name, ApiProvider::OpenAI)
            }
        })
        .collect())
}

async fn fetch_anthropic_models(
    client: &reqwest::Client,
    config: &ApiConfig,
) -> LlmResult<Vec<ModelConfig>> {
    let list: AnthropicModelList = get_model_list(client, config).await?;
    Ok(list
        .models
        .into_iter()
        .map(|m| ModelConfig {
            context_window: Some(m.max_tokens.unwrap_or(200_000)),
            ..ModelConfig::new(m.name.clone(), m.name, ApiProvider::Anthropic)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderId;

    #[test]
    fn test_default_models_match_provider() {
        for provider in ApiProvider::ALL {
            assert!(default_models(provider).iter().all(|m| m.provider == provider));
        }
        assert!(default_models(ApiProvider::Custom).is_empty());
        assert!(!default_models(ApiProvider::Gemini).is_empty());
    }

    #[test]
    fn test_filter_chat_models() {
        let models = ["gpt-4o", "whisper-1", "GPT-4-Vision-Preview", "text-embedding-3", "o1-mini"]
            .iter()
            .map(|id| ModelConfig::new(*id, *id, ApiProvider::OpenAI))
            .collect();
        let kept: Vec<String> = filter_chat_models(ApiProvider::OpenAI, models)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(kept, vec!["gpt-4o", "o1-mini"]);
    }

    #[test]
    fn test_filter_ignores_other_providers() {
        let models = vec![ModelConfig::new("text-model", "t", ApiProvider::Custom)];
        assert_eq!(filter_chat_models(ApiProvider::Custom, models).len(), 1);
    }

    #[tokio::test]
    async fn test_custom_models_are_tagged() {
        let mut config = ApiConfig::new("1", "c", "http://localhost", ApiProvider::Custom);
        config.custom_models = Some(vec![ModelConfig::new("m1", "M1", ApiProvider::OpenAI)]);
        let models = fetch_available_models(&reqwest::Client::new(), &config).await;
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].provider, ApiProvider::Custom);
    }

    #[tokio::test]
    async fn test_unknown_provider_has_no_models() {
        let mut config = ApiConfig::new("1", "m", "http://127.0.0.1:9", ApiProvider::OpenAI)
            .with_auth(AuthType::Bearer, None, "sk");
        config.provider = ProviderId::Unknown("mistral".to_string());
        let models = fetch_available_models(&reqwest::Client::new(), &config).await;
        assert!(models.is_empty());
    }

    #[tokio::test]
    async fn test_no_auth_returns_defaults() {
        let config = ApiConfig::new("1", "o", "http://127.0.0.1:9", ApiProvider::OpenAI);
        let models = fetch_available_models(&reqwest::Client::new(), &config).await;
        assert_eq!(models, default_models(ApiProvider::OpenAI));
    }
}
