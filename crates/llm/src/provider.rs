//! Provider Adapter Registry
//!
//! Each provider family knows its endpoint path, its default model and how to
//! shape a prompt into a request body. Adapters are stateless; the registry
//! hands out `'static` references.

use serde_json::{json, Value};

use crate::types::{ApiProvider, LlmResult, PromptRequest};

/// Temperature used when the caller leaves it unset.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Output token cap used when the caller leaves it unset.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Per-provider request shaping.
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> ApiProvider;

    /// Path appended to the normalized base URL. `None` posts to the URL as given.
    fn endpoint_path(&self) -> Option<&'static str>;

    /// Model used when the request does not name one.
    fn default_model(&self) -> Option<&'static str>;

    /// Build the JSON body for a single-turn prompt.
    fn build_request_body(&self, request: &PromptRequest) -> Value;

    /// Full endpoint for a configured base URL.
    fn endpoint_url(&self, base_url: &str) -> String {
        match self.endpoint_path() {
            Some(path) => format!("{}{}", normalize_base_url(base_url), path),
            None => base_url.to_string(),
        }
    }

    fn resolve_model(&self, request: &PromptRequest) -> Option<String> {
        request
            .model
            .clone()
            .filter(|model| !model.trim().is_empty())
            .or_else(|| self.default_model().map(str::to_string))
    }
}

/// Strip at most one trailing slash.
pub fn normalize_base_url(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// OpenAI chat completions.
pub struct OpenAIAdapter;

impl OpenAIAdapter {
    /// o-series reasoning models reject `temperature` and `max_tokens`.
    fn is_reasoning_model(model: &str) -> bool {
        let model = model.to_lowercase();
        model.starts_with("o1") || model.starts_with("o3") || model.starts_with("o4")
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn provider(&self) -> ApiProvider {
        ApiProvider::OpenAI
    }

    fn endpoint_path(&self) -> Option<&'static str> {
        Some("/chat/completions")
    }

    fn default_model(&self) -> Option<&'static str> {
        Some("gpt-3.5-turbo")
    }

    fn build_request_body(&self, request: &PromptRequest) -> Value {
        let model = self.resolve_model(request).unwrap_or_default();
        let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

        let mut body = json!({
            "model": model,
            "messages": [{ "role": "user", "content": request.prompt }],
        });

        if Self::is_reasoning_model(&model) {
            body["max_completion_tokens"] = json!(max_tokens);
        } else {
            body["temperature"] = json!(request.temperature.unwrap_or(DEFAULT_TEMPERATURE));
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}

/// Anthropic messages API.
pub struct AnthropicAdapter;

impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> ApiProvider {
        ApiProvider::Anthropic
    }

    fn endpoint_path(&self) -> Option<&'static str> {
        Some("/messages")
    }

    fn default_model(&self) -> Option<&'static str> {
        Some("claude-3-opus-20240229")
    }

    fn build_request_body(&self, request: &PromptRequest) -> Value {
        // max_tokens is mandatory for this API
        json!({
            "model": self.resolve_model(request),
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [{ "role": "user", "content": request.prompt }],
        })
    }
}

/// DeepSeek, OpenAI-compatible with provider-side defaults.
pub struct DeepSeekAdapter;

impl ProviderAdapter for DeepSeekAdapter {
    fn provider(&self) -> ApiProvider {
        ApiProvider::DeepSeek
    }

    fn endpoint_path(&self) -> Option<&'static str> {
        Some("/chat/completions")
    }

    fn default_model(&self) -> Option<&'static str> {
        Some("deepseek-chat")
    }

    fn build_request_body(&self, request: &PromptRequest) -> Value {
        let mut body = json!({
            "model": self.resolve_model(request),
            "messages": [{ "role": "user", "content": request.prompt }],
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }
}

/// Google Gemini `generateContent`.
///
/// The model is not part of the body; it is expected in the configured URL.
pub struct GeminiAdapter;

impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> ApiProvider {
        ApiProvider::Gemini
    }

    fn endpoint_path(&self) -> Option<&'static str> {
        Some("/generateContent")
    }

    fn default_model(&self) -> Option<&'static str> {
        None
    }

    fn build_request_body(&self, request: &PromptRequest) -> Value {
        let mut generation_config = json!({});
        if let Some(temperature) = request.temperature {
            generation_config["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }

        json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
            "generationConfig": generation_config,
        })
    }
}

/// Arbitrary endpoint. The configured URL is used verbatim.
pub struct CustomAdapter;

impl ProviderAdapter for CustomAdapter {
    fn provider(&self) -> ApiProvider {
        ApiProvider::Custom
    }

    fn endpoint_path(&self) -> Option<&'static str> {
        None
    }

    fn default_model(&self) -> Option<&'static str> {
        None
    }

    fn build_request_body(&self, request: &PromptRequest) -> Value {
        let mut body = json!({
            "prompt": request.prompt,
            "temperature": request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });
        if let Some(model) = &request.model {
            body["model"] = json!(model);
        }
        body
    }
}

/// Look up the adapter for a provider.
pub fn adapter_for(provider: ApiProvider) -> &'static dyn ProviderAdapter {
    match provider {
        ApiProvider::OpenAI => &OpenAIAdapter,
        ApiProvider::Anthropic => &AnthropicAdapter,
        ApiProvider::DeepSeek => &DeepSeekAdapter,
        ApiProvider::Gemini => &GeminiAdapter,
        ApiProvider::Custom => &CustomAdapter,
    }
}

/// Look up an adapter by its wire identifier.
pub fn resolve_adapter(provider: &str) -> LlmResult<&'static dyn ProviderAdapter> {
    Ok(adapter_for(provider.parse()?))
}
