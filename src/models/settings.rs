//! Settings Models
//!
//! Application settings stored in settings.json.

use serde::{Deserialize, Serialize};

/// Upper bound for the input debounce window.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Stream responses from providers that support it
    #[serde(default = "default_stream_responses")]
    pub stream_responses: bool,
    /// Quiet period before typed input is re-interpolated
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Temperature sent when a request does not set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_temperature: Option<f32>,
    /// Output token cap sent when a request does not set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_tokens: Option<u32>,
}

fn default_stream_responses() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            stream_responses: default_stream_responses(),
            debounce_ms: default_debounce_ms(),
            default_temperature: None,
            default_max_tokens: None,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub stream_responses: Option<bool>,
    pub debounce_ms: Option<u64>,
    pub default_temperature: Option<f32>,
    pub default_max_tokens: Option<u32>,
}

impl AppSettings {
    /// Apply a partial update to the settings
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(stream) = update.stream_responses {
            self.stream_responses = stream;
        }
        if let Some(ms) = update.debounce_ms {
            self.debounce_ms = ms;
        }
        if let Some(temperature) = update.default_temperature {
            self.default_temperature = Some(temperature);
        }
        if let Some(max_tokens) = update.default_max_tokens {
            self.default_max_tokens = Some(max_tokens);
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(format!(
                "Debounce window must be at most {} ms",
                MAX_DEBOUNCE_MS
            ));
        }
        if let Some(t) = self.default_temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }
        if self.default_max_tokens == Some(0) {
            return Err("Max tokens must be greater than 0".to_string());
        }
        Ok(())
    }
}
