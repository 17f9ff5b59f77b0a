//! Field Synthesizer
//!
//! Turns parsed placeholder names into input-field descriptors. Metadata a
//! user chose earlier (type, required flag, options, hint text) survives
//! every recomputation; fields for removed placeholders disappear and new
//! placeholders get defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Input widget kind for a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Select,
    Textarea,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Number => write!(f, "number"),
            FieldType::Select => write!(f, "select"),
            FieldType::Textarea => write!(f, "textarea"),
        }
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "number" => Ok(FieldType::Number),
            "select" => Ok(FieldType::Select),
            "textarea" => Ok(FieldType::Textarea),
            other => Err(CoreError::parse(format!("Unknown field type: {}", other))),
        }
    }
}

/// Descriptor for one placeholder's input field.
///
/// `key` always equals a placeholder name and is unique within a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Hint text shown in an empty input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

fn default_required() -> bool {
    true
}

impl InputField {
    /// A required text field with a label derived from the key.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: derive_label(&key),
            key,
            field_type: FieldType::Text,
            options: None,
            required: true,
            placeholder: None,
            value: None,
        }
    }

    /// Options of a select field, ignoring blank entries.
    pub fn selectable_options(&self) -> Vec<&str> {
        self.options
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|o| !o.trim().is_empty())
            .collect()
    }
}

/// Human label for a placeholder name: first letter capitalized and a space
/// inserted before every later ASCII capital (`userName` -> `User Name`).
pub fn derive_label(key: &str) -> String {
    let mut chars = key.chars();
    let mut label = String::with_capacity(key.len() + 4);
    if let Some(first) = chars.next() {
        label.extend(first.to_uppercase());
    }
    for c in chars {
        if c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}

/// Build one field per placeholder, in placeholder order.
///
/// Existing descriptors with a matching key keep their type, required flag,
/// options and hint text; the label is always re-derived and the value is
/// taken from `values`.
pub fn synthesize_fields(
    placeholders: &[String],
    values: &HashMap<String, String>,
    existing: &[InputField],
) -> Vec<InputField> {
    let prior: HashMap<&str, &InputField> =
        existing.iter().map(|f| (f.key.as_str(), f)).collect();

    placeholders
        .iter()
        .map(|key| {
            let mut field = InputField::new(key.as_str());
            if let Some(previous) = prior.get(key.as_str()) {
                field.field_type = previous.field_type;
                field.required = previous.required;
                field.options = previous.options.clone();
                field.placeholder = previous.placeholder.clone();
            }
            field.value = values.get(key).cloned();
            field
        })
        .collect()
}
