//! Template Models
//!
//! Prompt templates as stored in `templates.json`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use prompt_forge_core::{parse_placeholders, synthesize_fields, InputField};
use serde::{Deserialize, Serialize};

/// A prompt template.
///
/// `content` is the source of truth for placeholders; `inputs` caches the
/// per-field metadata the user chose (type, required flag, options).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub inputs: Vec<InputField>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl PromptTemplate {
    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        parse_placeholders(&self.content)
    }

    /// Current field descriptors, merged with the stored metadata.
    pub fn fields(&self, values: &HashMap<String, String>) -> Vec<InputField> {
        synthesize_fields(&self.placeholders(), values, &self.inputs)
    }
}

/// Request to create a new template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCreateRequest {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub inputs: Vec<InputField>,
}

/// Partial update of a template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUpdate {
    pub name: Option<String>,
    pub content: Option<String>,
    pub inputs: Option<Vec<InputField>>,
}

impl TemplateUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none() && self.inputs.is_none()
    }
}
