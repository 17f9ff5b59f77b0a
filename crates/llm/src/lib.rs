//! Prompt Forge LLM
//!
//! Everything between a rendered prompt and the text a provider sends back:
//! - provider adapter registry (endpoint paths, request bodies)
//! - auth header builder
//! - request dispatcher with optional SSE streaming and cancellation
//! - response shape discriminator
//! - model catalog
//!
//! Supported providers: OpenAI, Anthropic, DeepSeek, Google Gemini and
//! arbitrary custom endpoints.

pub mod auth;
pub mod dispatcher;
pub mod http_client;
pub mod models;
pub mod provider;
pub mod response;
pub mod streaming;
pub mod types;

pub use auth::{build_headers, redact_headers};
pub use dispatcher::{
    error_message_from_body, map_http_error, should_stream, DispatchOutput, Dispatcher,
};
pub use http_client::{build_http_client, HttpClientOptions};
pub use models::{default_models, fetch_available_models, filter_chat_models};
pub use provider::{adapter_for, normalize_base_url, resolve_adapter, ProviderAdapter};
pub use response::{
    discriminate, extract_response_text, extract_stream_delta, LlmResponse, ParsedText,
    ResponseShape, ShapeMismatch,
};
pub use streaming::{AdapterError, LineBuffer, SseDeltaAdapter, StreamAdapter, StreamEvent};
pub use types::*;

pub use tokio_util::sync::CancellationToken;
