//! Template Commands
//!
//! Handlers for managing templates and rendering them.

use std::collections::HashMap;

use prompt_forge_core::FieldType;

use crate::models::response::CommandResponse;
use crate::models::template::{PromptTemplate, TemplateCreateRequest, TemplateUpdate};
use crate::services::prompt::{PromptService, RenderedPrompt};
use crate::state::AppState;

/// List all templates
pub async fn list_templates(state: &AppState) -> CommandResponse<Vec<PromptTemplate>> {
    state
        .with_templates(|store| Ok(store.templates().to_vec()))
        .await
        .into()
}

/// Get a template by id
pub async fn get_template(state: &AppState, id: &str) -> CommandResponse<PromptTemplate> {
    state
        .with_templates(|store| store.require(id).cloned())
        .await
        .into()
}

/// Create a template
pub async fn create_template(
    state: &AppState,
    request: TemplateCreateRequest,
) -> CommandResponse<PromptTemplate> {
    state
        .with_templates_mut(|store| store.add_template(request))
        .await
        .into()
}

/// Apply a partial update to a template
pub async fn update_template(
    state: &AppState,
    id: &str,
    update: TemplateUpdate,
) -> CommandResponse<PromptTemplate> {
    state
        .with_templates_mut(|store| store.update_template(id, update))
        .await
        .into()
}

/// Delete a template
pub async fn delete_template(state: &AppState, id: &str) -> CommandResponse<()> {
    state
        .with_templates_mut(|store| store.delete_template(id))
        .await
        .into()
}

/// Import templates from a list
pub async fn import_templates(
    state: &AppState,
    templates: Vec<PromptTemplate>,
) -> CommandResponse<Vec<PromptTemplate>> {
    state
        .with_templates_mut(|store| store.import_templates(templates))
        .await
        .into()
}

/// Change the input type of one field
pub async fn set_field_type(
    state: &AppState,
    template_id: &str,
    key: &str,
    field_type: FieldType,
) -> CommandResponse<PromptTemplate> {
    state
        .with_templates_mut(|store| store.set_field_type(template_id, key, field_type))
        .await
        .into()
}

/// Select the active template, or clear it with `None`
pub async fn set_active_template(state: &AppState, id: Option<&str>) -> CommandResponse<()> {
    state
        .with_templates_mut(|store| store.set_active_template(id))
        .await
        .into()
}

/// Get the active template, if any
pub async fn get_active_template(state: &AppState) -> CommandResponse<Option<PromptTemplate>> {
    state
        .with_templates(|store| Ok(store.active_template().cloned()))
        .await
        .into()
}

/// Render a template against a set of values
pub async fn render_template(
    state: &AppState,
    id: &str,
    values: HashMap<String, String>,
) -> CommandResponse<RenderedPrompt> {
    PromptService::new(state).render(id, &values).await.into()
}

/// Persist the synthesized fields onto the template
pub async fn sync_template_fields(state: &AppState, id: &str) -> CommandResponse<PromptTemplate> {
    PromptService::new(state).sync_template_fields(id).await.into()
}
