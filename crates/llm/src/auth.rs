//! Auth Header Builder
//!
//! Turns an [`ApiConfig`] into the header map sent with every request:
//! JSON content type, one credential header, then the config's enabled extra
//! headers. Later entries overwrite earlier ones with the same (case-insensitive)
//! name.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::types::{ApiConfig, ApiHeaderConfig, AuthType, LlmError, LlmResult};

/// Replacement shown in logs for credential-bearing header values.
pub const REDACTED: &str = "[REDACTED]";

/// Build request headers for a config.
///
/// Fails before any network activity when the credentials are incomplete.
pub fn build_headers(config: &ApiConfig) -> LlmResult<HeaderMap> {
    let auth_value = config
        .auth_value
        .as_deref()
        .filter(|value| !value.is_empty());
    let (auth_type, auth_value) = match (config.auth_type, auth_value) {
        (Some(auth_type), Some(value)) => (auth_type, value),
        _ => return Err(LlmError::config("Missing authentication configuration")),
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    match auth_type {
        AuthType::Bearer => {
            headers.insert(
                AUTHORIZATION,
                sensitive_value("Authorization", &format!("Bearer {}", auth_value))?,
            );
        }
        AuthType::Basic => {
            let username = non_empty(config.auth_key.as_deref())
                .ok_or_else(|| LlmError::config("Missing username for basic auth"))?;
            let encoded = STANDARD.encode(format!("{}:{}", username, auth_value));
            headers.insert(
                AUTHORIZATION,
                sensitive_value("Authorization", &format!("Basic {}", encoded))?,
            );
        }
        AuthType::Custom => {
            let header_name = non_empty(config.auth_key.as_deref())
                .map(str::trim)
                .ok_or_else(|| LlmError::config("Missing header name for custom auth"))?;
            headers.insert(
                header_name_from(header_name)?,
                sensitive_value(header_name, auth_value)?,
            );
        }
        AuthType::None => return Err(LlmError::UnsupportedAuthType(auth_type.to_string())),
    }

    apply_extra_headers(&config.headers, &mut headers)?;
    Ok(headers)
}

/// Insert every enabled extra header, overwriting existing entries.
///
/// Rows with a blank name are ignored.
pub fn apply_extra_headers(extra: &[ApiHeaderConfig], headers: &mut HeaderMap) -> LlmResult<()> {
    for header in extra.iter().filter(|h| h.enabled) {
        if header.key.trim().is_empty() {
            tracing::debug!("Skipping extra header with empty name");
            continue;
        }
        let name = header_name_from(header.key.trim())?;
        let value = HeaderValue::from_str(&header.value).map_err(|_| {
            LlmError::config(format!("Invalid value for header {}", header.key.trim()))
        })?;
        headers.insert(name, value);
    }
    Ok(())
}

/// Render headers for logging with credentials masked.
///
/// `Authorization`, values flagged sensitive, and any value containing `secret`
/// are replaced with [`REDACTED`].
pub fn redact_headers(headers: &HeaderMap, secret: Option<&str>) -> Vec<(String, String)> {
    let secret = secret.filter(|s| !s.is_empty());
    headers
        .iter()
        .map(|(name, value)| {
            let text = value.to_str().unwrap_or("<binary>");
            let hidden = name == AUTHORIZATION
                || value.is_sensitive()
                || secret.is_some_and(|s| text.contains(s));
            let shown = if hidden { REDACTED } else { text };
            (name.as_str().to_string(), shown.to_string())
        })
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn header_name_from(name: &str) -> LlmResult<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| LlmError::config(format!("Invalid header name: {}", name)))
}

fn sensitive_value(name: &str, value: &str) -> LlmResult<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| LlmError::config(format!("Invalid value for header {}", name)))?;
    value.set_sensitive(true);
    Ok(value)
}
