//! HTTP Client Factory
//!
//! Builds the `reqwest::Client` shared by the dispatcher and the model catalog.

use std::time::Duration;

use crate::types::{LlmError, LlmResult};

/// Options for [`build_http_client`].
#[derive(Debug, Clone, Default)]
pub struct HttpClientOptions {
    /// Route all traffic through this proxy URL.
    pub proxy: Option<String>,
    /// Connection establishment timeout. Request duration is never capped so
    /// long streams are not cut off.
    pub connect_timeout: Option<Duration>,
}

/// Build a `reqwest::Client`.
///
/// - `proxy: Some(url)` -> route through that proxy
/// - `proxy: None` -> use the system/environment defaults
pub fn build_http_client(options: &HttpClientOptions) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("prompt-forge/", env!("CARGO_PKG_VERSION")));

    if let Some(url) = &options.proxy {
        let proxy = reqwest::Proxy::all(url)
            .map_err(|e| LlmError::config(format!("Invalid proxy URL '{}': {}", url, e)))?;
        builder = builder.proxy(proxy);
    }
    if let Some(timeout) = options.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| LlmError::config(format!("Failed to build HTTP client: {}", e)))
}
