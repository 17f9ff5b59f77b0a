//! SSE Stream Decoding
//!
//! Two layers: [`LineBuffer`] splits raw network chunks into complete lines,
//! carrying a partial trailing line over to the next chunk; a [`StreamAdapter`]
//! turns each complete line into zero or more [`StreamEvent`]s.

use serde_json::Value;
use thiserror::Error;

use crate::response::extract_stream_delta;
use crate::types::ApiProvider;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// Events produced from stream lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Non-empty piece of generated text.
    TextDelta { content: String },
    /// The server sent its end-of-stream sentinel.
    Done,
}

/// Errors raised while adapting a single stream line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Adapts provider-specific stream lines to [`StreamEvent`]s.
pub trait StreamAdapter: Send + Sync {
    fn provider(&self) -> ApiProvider;

    /// A single input line may produce zero, one, or multiple events.
    fn adapt(&mut self, line: &str) -> Result<Vec<StreamEvent>, AdapterError>;
}

/// Adapter for `data: {json}` event streams.
///
/// Lines without the data prefix (comments, `event:` lines, blanks) are ignored.
#[derive(Debug, Clone)]
pub struct SseDeltaAdapter {
    provider: ApiProvider,
}

impl SseDeltaAdapter {
    pub fn new(provider: ApiProvider) -> Self {
        Self { provider }
    }
}

impl StreamAdapter for SseDeltaAdapter {
    fn provider(&self) -> ApiProvider {
        self.provider
    }

    fn adapt(&mut self, line: &str) -> Result<Vec<StreamEvent>, AdapterError> {
        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            return Ok(vec![]);
        };
        let data = data.trim();
        if data == DONE_SENTINEL {
            return Ok(vec![StreamEvent::Done]);
        }

        let chunk: Value =
            serde_json::from_str(data).map_err(|e| AdapterError::ParseError(e.to_string()))?;
        if !chunk.is_object() {
            return Err(AdapterError::InvalidFormat(format!(
                "expected JSON object, got {}",
                data
            )));
        }

        Ok(extract_stream_delta(self.provider, &chunk)
            .filter(|content| !content.is_empty())
            .map(|content| vec![StreamEvent::TextDelta { content }])
            .unwrap_or_default())
    }
}

/// Byte buffer that yields complete newline-terminated lines.
///
/// Splitting happens on raw bytes so a multi-byte character cut across two
/// network chunks is reassembled before decoding.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    /// Bytes of `pending` already known to hold no newline.
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and drain every complete line it finishes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        for (offset, byte) in self.pending[self.scanned..].iter().enumerate() {
            if *byte == b'\n' {
                let end = self.scanned + offset;
                lines.push(decode_line(&self.pending[start..end]));
                start = end + 1;
            }
        }

        self.pending.drain(..start);
        self.scanned = self.pending.len();
        lines
    }

    /// Remaining partial line once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.pending);
        self.scanned = 0;
        Some(decode_line(&raw))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
