//! LLM Types
//!
//! Provider identifiers, API connection records and the error type shared by
//! every module in this crate.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported provider families.
///
/// Serialized as the lowercase identifier (`openai`, `anthropic`, ...).
/// Saved configs hold a [`ProviderId`] instead, so an unknown identifier in a
/// config file still loads and only fails when the config is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApiProvider {
    #[default]
    OpenAI,
    Anthropic,
    DeepSeek,
    Gemini,
    Custom,
}

impl ApiProvider {
    pub const ALL: [ApiProvider; 5] = [
        ApiProvider::OpenAI,
        ApiProvider::Anthropic,
        ApiProvider::DeepSeek,
        ApiProvider::Gemini,
        ApiProvider::Custom,
    ];

    /// Wire identifier used in persisted configs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiProvider::OpenAI => "openai",
            ApiProvider::Anthropic => "anthropic",
            ApiProvider::DeepSeek => "deepseek",
            ApiProvider::Gemini => "gemini",
            ApiProvider::Custom => "custom",
        }
    }

    /// Human-readable name for listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            ApiProvider::OpenAI => "OpenAI",
            ApiProvider::Anthropic => "Anthropic",
            ApiProvider::DeepSeek => "DeepSeek",
            ApiProvider::Gemini => "Google Gemini",
            ApiProvider::Custom => "Custom",
        }
    }

    /// Whether responses can be delivered incrementally over SSE.
    pub fn supports_streaming(&self) -> bool {
        matches!(self, ApiProvider::OpenAI)
    }
}

impl fmt::Display for ApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ApiProvider::OpenAI),
            "anthropic" => Ok(ApiProvider::Anthropic),
            "deepseek" => Ok(ApiProvider::DeepSeek),
            "gemini" => Ok(ApiProvider::Gemini),
            "custom" => Ok(ApiProvider::Custom),
            _ => Err(LlmError::UnsupportedProvider(s.to_string())),
        }
    }
}

impl TryFrom<String> for ApiProvider {
    type Error = LlmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApiProvider> for String {
    fn from(provider: ApiProvider) -> Self {
        provider.as_str().to_string()
    }
}

/// Provider identifier as stored in a config.
///
/// Identifiers this crate has no adapter for are kept verbatim so they
/// survive a load/save cycle. [`resolve`](Self::resolve) rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderId {
    Known(ApiProvider),
    Unknown(String),
}

impl ProviderId {
    /// The provider, or `UnsupportedProvider` for an unknown identifier.
    pub fn resolve(&self) -> LlmResult<ApiProvider> {
        match self {
            ProviderId::Known(provider) => Ok(*provider),
            ProviderId::Unknown(id) => Err(LlmError::UnsupportedProvider(id.clone())),
        }
    }

    pub fn known(&self) -> Option<ApiProvider> {
        self.resolve().ok()
    }

    pub fn display_name(&self) -> &str {
        match self {
            ProviderId::Known(provider) => provider.display_name(),
            ProviderId::Unknown(id) => id,
        }
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        ProviderId::Known(ApiProvider::default())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::Known(provider) => fmt::Display::fmt(provider, f),
            ProviderId::Unknown(id) => f.write_str(id),
        }
    }
}

impl From<ApiProvider> for ProviderId {
    fn from(provider: ApiProvider) -> Self {
        ProviderId::Known(provider)
    }
}

impl From<String> for ProviderId {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(provider) => ProviderId::Known(provider),
            Err(_) => ProviderId::Unknown(value),
        }
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        match id {
            ProviderId::Known(provider) => provider.into(),
            ProviderId::Unknown(id) => id,
        }
    }
}

impl PartialEq<ApiProvider> for ProviderId {
    fn eq(&self, other: &ApiProvider) -> bool {
        matches!(self, ProviderId::Known(provider) if provider == other)
    }
}

/// How credentials are attached to outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AuthType {
    /// Selectable in configs, but the dispatcher refuses to send with it.
    None,
    Bearer,
    Basic,
    Custom,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::None => "none",
            AuthType::Bearer => "bearer",
            AuthType::Basic => "basic",
            AuthType::Custom => "custom",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(AuthType::None),
            "bearer" => Ok(AuthType::Bearer),
            "basic" => Ok(AuthType::Basic),
            "custom" => Ok(AuthType::Custom),
            _ => Err(LlmError::UnsupportedAuthType(s.to_string())),
        }
    }
}

impl TryFrom<String> for AuthType {
    type Error = LlmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AuthType> for String {
    fn from(auth: AuthType) -> Self {
        auth.as_str().to_string()
    }
}

/// Extra header attached to every request made with a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHeaderConfig {
    pub key: String,
    pub value: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ApiHeaderConfig {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A model offered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub id: String,
    pub name: String,
    pub provider: ApiProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl ModelConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, provider: ApiProvider) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider,
            context_window: None,
            max_output_tokens: None,
        }
    }
}

/// A saved connection to a provider endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub id: String,
    pub name: String,
    pub url: String,
    pub provider: ProviderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthType>,
    /// Username for basic auth, header name for custom auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    /// Token, password or header value depending on `auth_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_value: Option<String>,
    #[serde(default)]
    pub headers: Vec<ApiHeaderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_models: Option<Vec<ModelConfig>>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl ApiConfig {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        provider: ApiProvider,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            provider: provider.into(),
            created_at: now,
            updated_at: now,
            ..Default::default()
        }
    }

    /// Attach credentials in builder style.
    pub fn with_auth(
        mut self,
        auth_type: AuthType,
        auth_key: Option<&str>,
        auth_value: impl Into<String>,
    ) -> Self {
        self.auth_type = Some(auth_type);
        self.auth_key = auth_key.map(str::to_string);
        self.auth_value = Some(auth_value.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(ApiHeaderConfig::new(key, value));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.selected_model = Some(model.into());
        self
    }
}

/// A single prompt ready to be sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Errors that can occur when talking to a provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Local configuration problem, reported verbatim.
    #[error("{0}")]
    Config(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Unsupported auth type: {0}")]
    UnsupportedAuthType(String),

    /// The endpoint rejected the credentials (HTTP 401).
    #[error("{message}")]
    AuthenticationFailed {
        provider: ApiProvider,
        message: String,
    },

    /// Any other non-2xx response. `message` is the server's own message when
    /// one could be extracted.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl LlmError {
    pub fn config(message: impl Into<String>) -> Self {
        LlmError::Config(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        LlmError::Parse(message.into())
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::AuthenticationFailed { .. } => Some(401),
            LlmError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

/// Result type alias for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;
