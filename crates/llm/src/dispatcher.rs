//! Request Dispatcher
//!
//! Sends one prompt to a configured endpoint. Streaming providers deliver text
//! through a callback as it arrives; everything else returns the parsed JSON
//! body. Non-2xx responses are mapped to [`LlmError`] with the most specific
//! message the server supplied.

use std::future::Future;

use futures_util::StreamExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::auth::{build_headers, redact_headers};
use crate::provider::adapter_for;
use crate::response::extract_response_text;
use crate::streaming::{LineBuffer, SseDeltaAdapter, StreamAdapter, StreamEvent};
use crate::types::{ApiConfig, ApiProvider, LlmError, LlmResult, PromptRequest};

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutput {
    /// Text was delivered incrementally through the chunk callback.
    Streamed,
    /// Full response body.
    Buffered(Value),
}

impl DispatchOutput {
    /// Displayable text for a buffered response. Streamed output has none.
    pub fn text(&self, provider: ApiProvider) -> Option<String> {
        match self {
            DispatchOutput::Streamed => None,
            DispatchOutput::Buffered(value) => Some(extract_response_text(provider, value)),
        }
    }
}

/// Whether a request to `provider` is sent in streaming mode.
pub fn should_stream(provider: ApiProvider, stream_enabled: bool) -> bool {
    stream_enabled && provider.supports_streaming()
}

/// Sends prompts over a shared HTTP client.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
}

impl Dispatcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send `request` using `config`.
    ///
    /// When streaming, `on_chunk` receives every non-empty text delta in
    /// arrival order and the call resolves to [`DispatchOutput::Streamed`] once
    /// the body is exhausted. Cancelling `cancel` aborts the request or the
    /// stream read at the next await point with [`LlmError::Cancelled`].
    pub async fn send_prompt<F>(
        &self,
        config: &ApiConfig,
        request: &PromptRequest,
        stream_enabled: bool,
        mut on_chunk: F,
        cancel: Option<&CancellationToken>,
    ) -> LlmResult<DispatchOutput>
    where
        F: FnMut(&str) + Send,
    {
        let provider = config.provider.resolve()?;
        let headers = build_headers(config)?;
        let adapter = adapter_for(provider);
        let endpoint = adapter.endpoint_url(&config.url);
        url::Url::parse(&endpoint)
            .map_err(|e| LlmError::config(format!("Invalid API URL '{}': {}", endpoint, e)))?;

        let streaming = should_stream(provider, stream_enabled);
        let mut body = adapter.build_request_body(request);
        if streaming {
            body["stream"] = serde_json::json!(true);
        }

        tracing::info!(
            provider = %provider,
            endpoint = %endpoint,
            streaming,
            "Dispatching prompt"
        );
        tracing::debug!(
            headers = ?redact_headers(&headers, config.auth_value.as_deref()),
            body = %body,
            "Request details"
        );

        let send = self.client.post(&endpoint).headers(headers).json(&body).send();
        let response = cancellable(cancel, send).await??;
        let status = response.status();

        if !status.is_success() {
            let text = cancellable(cancel, response.text()).await??;
            tracing::error!(status = status.as_u16(), body = %text, "API error response");
            return Err(map_http_error(provider, status.as_u16(), &text));
        }

        if streaming {
            let mut sse = SseDeltaAdapter::new(provider);
            let mut lines = LineBuffer::new();
            let mut stream = response.bytes_stream();

            while let Some(chunk) = cancellable(cancel, stream.next()).await? {
                let chunk = chunk?;
                for line in lines.push(&chunk) {
                    handle_stream_line(&mut sse, &line, &mut on_chunk);
                }
            }
            if let Some(line) = lines.finish() {
                handle_stream_line(&mut sse, &line, &mut on_chunk);
            }

            tracing::info!(provider = %provider, "Stream completed");
            return Ok(DispatchOutput::Streamed);
        }

        let text = cancellable(cancel, response.text()).await??;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| LlmError::parse(format!("Invalid JSON response: {}", e)))?;
        tracing::info!(status = status.as_u16(), "Received response");
        Ok(DispatchOutput::Buffered(value))
    }
}

fn handle_stream_line<A, F>(adapter: &mut A, line: &str, on_chunk: &mut F)
where
    A: StreamAdapter,
    F: FnMut(&str),
{
    match adapter.adapt(line) {
        Ok(events) => {
            for event in events {
                if let StreamEvent::TextDelta { content } = event {
                    on_chunk(&content);
                }
            }
        }
        Err(e) => tracing::warn!("Skipping malformed stream chunk: {}", e),
    }
}

/// Await `fut` unless `cancel` fires first.
async fn cancellable<T>(
    cancel: Option<&CancellationToken>,
    fut: impl Future<Output = T>,
) -> LlmResult<T> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(LlmError::Cancelled),
            out = fut => Ok(out),
        },
        None => Ok(fut.await),
    }
}

/// Map a non-2xx response to an error.
///
/// 401 always yields a fixed message naming the provider so users know which
/// config to fix.
pub fn map_http_error(provider: ApiProvider, status: u16, body: &str) -> LlmError {
    if status == 401 {
        return LlmError::AuthenticationFailed {
            provider,
            message: format!(
                "Invalid API key for {}. Please check your API configuration.",
                provider
            ),
        };
    }
    LlmError::Http {
        status,
        message: error_message_from_body(status, body),
    }
}

/// Best message from an error body: `error.message`, then `error`, then
/// `message`, then a generic status line. Non-JSON bodies are appended raw.
pub fn error_message_from_body(status: u16, body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return format!("Request failed with status {}: {}", status, body);
    };

    json.pointer("/error/message")
        .and_then(message_text)
        .or_else(|| json.get("error").and_then(message_text))
        .or_else(|| json.get("message").and_then(message_text))
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
