//! Response Shape Discriminator
//!
//! Provider responses come back as untyped JSON. This module recognises the
//! three shapes we know how to read (chat completion, Anthropic message,
//! Gemini candidates) and pulls the generated text out of them. Anything else
//! is rendered as pretty-printed JSON so the user still sees what came back.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::ApiProvider;

/// Known response layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `choices[0].message.content`
    ChatCompletion,
    /// `content[0].text`
    AnthropicMessage,
    /// `candidates[0].content.parts[0].text`
    GeminiCandidates,
}

impl ResponseShape {
    /// Shapes to try for a provider, in order.
    pub fn candidates(provider: ApiProvider) -> &'static [ResponseShape] {
        match provider {
            ApiProvider::OpenAI | ApiProvider::DeepSeek => &[ResponseShape::ChatCompletion],
            ApiProvider::Anthropic => &[ResponseShape::AnthropicMessage],
            ApiProvider::Gemini => &[ResponseShape::GeminiCandidates],
            ApiProvider::Custom => &[
                ResponseShape::ChatCompletion,
                ResponseShape::AnthropicMessage,
                ResponseShape::GeminiCandidates,
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicMessageResponse {
    pub content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicContentBlock {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponse {
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

/// A response decoded into one of the known shapes.
#[derive(Debug, Clone)]
pub enum LlmResponse {
    ChatCompletion(ChatCompletionResponse),
    AnthropicMessage(AnthropicMessageResponse),
    GeminiCandidates(GeminiResponse),
}

impl LlmResponse {
    pub fn shape(&self) -> ResponseShape {
        match self {
            LlmResponse::ChatCompletion(_) => ResponseShape::ChatCompletion,
            LlmResponse::AnthropicMessage(_) => ResponseShape::AnthropicMessage,
            LlmResponse::GeminiCandidates(_) => ResponseShape::GeminiCandidates,
        }
    }

    /// Text of the first choice/block/part. `None` when the list is empty.
    pub fn text(&self) -> Option<&str> {
        match self {
            LlmResponse::ChatCompletion(r) => r.choices.first().map(|c| c.message.content.as_str()),
            LlmResponse::AnthropicMessage(r) => r.content.first().map(|b| b.text.as_str()),
            LlmResponse::GeminiCandidates(r) => r
                .candidates
                .first()
                .and_then(|c| c.content.parts.first())
                .map(|p| p.text.as_str()),
        }
    }
}

/// Text pulled out of a recognised response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText {
    pub shape: ResponseShape,
    pub text: String,
}

/// None of the expected shapes matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Response did not match any of {tried:?}")]
pub struct ShapeMismatch {
    pub tried: Vec<ResponseShape>,
}

fn decode_as(shape: ResponseShape, value: &Value) -> Option<LlmResponse> {
    let decoded = match shape {
        ResponseShape::ChatCompletion => {
            ChatCompletionResponse::deserialize(value).ok().map(LlmResponse::ChatCompletion)
        }
        ResponseShape::AnthropicMessage => AnthropicMessageResponse::deserialize(value)
            .ok()
            .map(LlmResponse::AnthropicMessage),
        ResponseShape::GeminiCandidates => {
            GeminiResponse::deserialize(value).ok().map(LlmResponse::GeminiCandidates)
        }
    }?;
    // an empty list deserializes fine but carries no text
    decoded.text().is_some().then_some(decoded)
}

/// Decode a response using the shapes allowed for `provider`.
pub fn decode_response(provider: ApiProvider, value: &Value) -> Result<LlmResponse, ShapeMismatch> {
    let shapes = ResponseShape::candidates(provider);
    shapes
        .iter()
        .find_map(|shape| decode_as(*shape, value))
        .ok_or_else(|| ShapeMismatch {
            tried: shapes.to_vec(),
        })
}

/// Identify the response shape and extract its text.
pub fn discriminate(provider: ApiProvider, value: &Value) -> Result<ParsedText, ShapeMismatch> {
    let response = decode_response(provider, value)?;
    Ok(ParsedText {
        shape: response.shape(),
        text: response.text().unwrap_or_default().to_string(),
    })
}

/// Displayable text for a response, falling back to pretty JSON.
pub fn extract_response_text(provider: ApiProvider, value: &Value) -> String {
    match discriminate(provider, value) {
        Ok(parsed) => parsed.text,
        Err(mismatch) => {
            tracing::debug!("{}; rendering raw JSON", mismatch);
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// Incremental text carried by one decoded stream chunk.
///
/// Returns `None` when the chunk has no delta text (role announcements,
/// usage frames, stop events).
pub fn extract_stream_delta(provider: ApiProvider, chunk: &Value) -> Option<String> {
    ResponseShape::candidates(provider)
        .iter()
        .find_map(|shape| {
            let text = match shape {
                ResponseShape::ChatCompletion => chunk.pointer("/choices/0/delta/content"),
                ResponseShape::AnthropicMessage => chunk.pointer("/delta/text"),
                ResponseShape::GeminiCandidates => {
                    chunk.pointer("/candidates/0/content/parts/0/text")
                }
            };
            text.and_then(Value::as_str)
        })
        .map(str::to_string)
}
