//! Template Input Session
//!
//! Live editing state for one template: the values typed so far, the field
//! descriptors derived from the content, and the interpolated preview.
//!
//! Field descriptors and validity always reflect the latest values. The
//! preview text only changes on commit, which happens explicitly or once the
//! debounce window has elapsed after the last update.

use std::collections::HashMap;
use std::time::Duration;

use prompt_forge_core::{
    interpolate, is_valid, missing_required, parse_placeholders, synthesize_fields, InputField,
};

use crate::models::template::PromptTemplate;
use crate::services::debounce::Debouncer;

#[derive(Debug, Clone)]
pub struct TemplateInputs {
    content: String,
    values: HashMap<String, String>,
    committed_values: HashMap<String, String>,
    /// Metadata remembered across content edits, including for placeholders
    /// that are currently absent.
    metadata: Vec<InputField>,
    fields: Vec<InputField>,
    output: String,
    debouncer: Debouncer,
}

impl TemplateInputs {
    pub fn new(content: impl Into<String>, metadata: Vec<InputField>, window: Duration) -> Self {
        let mut session = Self {
            content: content.into(),
            values: HashMap::new(),
            committed_values: HashMap::new(),
            metadata,
            fields: Vec::new(),
            output: String::new(),
            debouncer: Debouncer::new(window),
        };
        session.resynthesize();
        session.output = session.render_committed();
        session
    }

    pub fn from_template(template: &PromptTemplate, window: Duration) -> Self {
        Self::new(template.content.clone(), template.inputs.clone(), window)
    }

    fn resynthesize(&mut self) {
        let placeholders = parse_placeholders(&self.content);
        self.fields = synthesize_fields(&placeholders, &self.values, &self.metadata);
    }

    fn render_committed(&self) -> String {
        interpolate(&self.content, &self.committed_values, &self.fields)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Record a value. The preview is not recomputed until the next commit.
    pub fn update_input(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
        self.resynthesize();
        self.debouncer.touch();
    }

    /// Replace the content, keeping per-key metadata from before the edit.
    pub fn set_content(&mut self, content: impl Into<String>) {
        let mut metadata = self.fields.clone();
        for previous in &self.metadata {
            if !metadata.iter().any(|f| f.key == previous.key) {
                metadata.push(previous.clone());
            }
        }
        self.metadata = metadata;
        self.content = content.into();
        self.resynthesize();
        self.output = self.render_committed();
    }

    /// Update one field's metadata (type, options, required flag).
    pub fn set_field(&mut self, field: InputField) {
        self.metadata.retain(|f| f.key != field.key);
        self.metadata.push(field);
        self.resynthesize();
    }

    pub fn fields(&self) -> &[InputField] {
        &self.fields
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Field descriptors without values, suitable for persisting on the template.
    pub fn field_metadata(&self) -> Vec<InputField> {
        self.fields
            .iter()
            .cloned()
            .map(|mut f| {
                f.value = None;
                f
            })
            .collect()
    }

    /// Preview text as of the last commit.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Validity of the latest values, independent of the debounce.
    pub fn is_valid(&self) -> bool {
        is_valid(&self.fields, &self.values)
    }

    pub fn missing_required(&self) -> Vec<&str> {
        missing_required(&self.fields, &self.values)
    }

    /// Values changed since the last commit.
    pub fn is_dirty(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Re-interpolate now with the latest values.
    pub fn commit(&mut self) -> &str {
        self.debouncer.clear();
        self.committed_values = self.values.clone();
        self.output = self.render_committed();
        &self.output
    }

    /// Commit if the debounce window has elapsed. Returns whether it did.
    pub fn poll(&mut self) -> bool {
        if self.debouncer.is_due() {
            self.commit();
            true
        } else {
            false
        }
    }

    /// Wait out the debounce window, then commit.
    pub async fn settle(&mut self) -> &str {
        if self.debouncer.is_pending() {
            self.debouncer.settled().await;
            self.commit();
        }
        &self.output
    }
}
