//! Template Store
//!
//! Owns the template list and the active selection, persisted to
//! `templates.json` after every mutation.

use std::path::PathBuf;

use chrono::Utc;
use prompt_forge_core::{FieldType, InputField};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::template::{PromptTemplate, TemplateCreateRequest, TemplateUpdate};
use crate::storage::json_file;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateFile {
    #[serde(default)]
    templates: Vec<PromptTemplate>,
    #[serde(default)]
    active_template_id: Option<String>,
}

/// Template store backed by a JSON file
#[derive(Debug)]
pub struct TemplateStore {
    path: PathBuf,
    data: TemplateFile,
}

impl TemplateStore {
    /// Load templates from `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let mut data: TemplateFile = json_file::load_or_default(&path)?;

        let dangling = data
            .active_template_id
            .as_deref()
            .is_some_and(|id| !data.templates.iter().any(|t| t.id == id));
        if dangling {
            tracing::warn!("Active template no longer exists; clearing selection");
            data.active_template_id = None;
        }

        Ok(Self { path, data })
    }

    /// Persist `next`, then make it current. On failure nothing changes.
    fn commit(&mut self, next: TemplateFile) -> AppResult<()> {
        json_file::save(&self.path, &next)?;
        self.data = next;
        Ok(())
    }

    fn position(&self, id: &str) -> AppResult<usize> {
        self.data
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::not_found(format!("Template {}", id)))
    }

    pub fn templates(&self) -> &[PromptTemplate] {
        &self.data.templates
    }

    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.data.templates.iter().find(|t| t.id == id)
    }

    /// Like [`get`](Self::get), but a missing template is an error.
    pub fn require(&self, id: &str) -> AppResult<&PromptTemplate> {
        self.get(id)
            .ok_or_else(|| AppError::not_found(format!("Template {}", id)))
    }

    pub fn active_template(&self) -> Option<&PromptTemplate> {
        self.data
            .active_template_id
            .as_deref()
            .and_then(|id| self.get(id))
    }

    /// Select a template, or clear the selection with `None`.
    pub fn set_active_template(&mut self, id: Option<&str>) -> AppResult<()> {
        if let Some(id) = id {
            self.position(id)?;
        }
        let mut next = self.data.clone();
        next.active_template_id = id.map(str::to_string);
        self.commit(next)
    }

    pub fn add_template(&mut self, request: TemplateCreateRequest) -> AppResult<PromptTemplate> {
        if request.name.trim().is_empty() {
            return Err(AppError::validation("Template name cannot be empty"));
        }
        let now = Utc::now();
        let template = PromptTemplate {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            content: request.content,
            inputs: request.inputs,
            created_at: now,
            updated_at: now,
        };
        let mut next = self.data.clone();
        next.templates.push(template.clone());
        self.commit(next)?;
        tracing::info!(id = %template.id, name = %template.name, "Template added");
        Ok(template)
    }

    /// Merge `update` into a template and refresh `updated_at`.
    pub fn update_template(&mut self, id: &str, update: TemplateUpdate) -> AppResult<PromptTemplate> {
        let index = self.position(id)?;
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Template name cannot be empty"));
        }
        if update.is_empty() {
            return Ok(self.data.templates[index].clone());
        }

        let mut next = self.data.clone();
        let template = &mut next.templates[index];
        if let Some(name) = update.name {
            template.name = name;
        }
        if let Some(content) = update.content {
            template.content = content;
        }
        if let Some(inputs) = update.inputs {
            template.inputs = inputs;
        }
        template.updated_at = Utc::now();
        let updated = template.clone();

        self.commit(next)?;
        tracing::info!(id = %id, "Template updated");
        Ok(updated)
    }

    /// Hard-delete a template. Clears the active selection if it pointed here.
    pub fn delete_template(&mut self, id: &str) -> AppResult<()> {
        let index = self.position(id)?;
        let mut next = self.data.clone();
        next.templates.remove(index);
        if next.active_template_id.as_deref() == Some(id) {
            next.active_template_id = None;
        }
        self.commit(next)?;
        tracing::info!(id = %id, "Template deleted");
        Ok(())
    }

    /// Append templates, assigning fresh ids and timestamps.
    pub fn import_templates(
        &mut self,
        templates: Vec<PromptTemplate>,
    ) -> AppResult<Vec<PromptTemplate>> {
        let now = Utc::now();
        let imported: Vec<PromptTemplate> = templates
            .into_iter()
            .map(|t| PromptTemplate {
                id: Uuid::new_v4().to_string(),
                created_at: now,
                updated_at: now,
                ..t
            })
            .collect();

        let mut next = self.data.clone();
        next.templates.extend(imported.iter().cloned());
        self.commit(next)?;
        tracing::info!(count = imported.len(), "Templates imported");
        Ok(imported)
    }

    /// Change the input type of one placeholder's field.
    ///
    /// Fields are synthesized from the current content first, so this works
    /// for placeholders that have no stored metadata yet.
    pub fn set_field_type(
        &mut self,
        template_id: &str,
        key: &str,
        field_type: FieldType,
    ) -> AppResult<PromptTemplate> {
        let template = self.require(template_id)?;
        let mut inputs: Vec<InputField> = template.fields(&Default::default());
        let field = inputs
            .iter_mut()
            .find(|f| f.key == key)
            .ok_or_else(|| AppError::validation(format!("Unknown field: {}", key)))?;
        field.field_type = field_type;

        self.update_template(
            template_id,
            TemplateUpdate {
                inputs: Some(inputs),
                ..Default::default()
            },
        )
    }
}
