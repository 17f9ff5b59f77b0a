//! Prompt Service
//!
//! Runs the whole pipeline for a stored template: synthesize fields, render,
//! pick a config, dispatch, and extract the response text.

use std::collections::HashMap;
use std::time::Duration;

use prompt_forge_core::{interpolate, missing_required, InputField};
use prompt_forge_llm::{
    fetch_available_models, filter_chat_models, ApiConfig, CancellationToken, ModelConfig,
    PromptRequest,
};
use serde::{Deserialize, Serialize};

use crate::models::template::{PromptTemplate, TemplateUpdate};
use crate::services::template_inputs::TemplateInputs;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Request to send a template to a model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPromptRequest {
    pub template_id: String,
    #[serde(default)]
    pub values: HashMap<String, String>,
    /// Falls back to the default config when unset.
    pub config_id: Option<String>,
    /// Falls back to the config's selected model when unset.
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// A template rendered against a set of values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPrompt {
    pub text: String,
    pub is_valid: bool,
    pub fields: Vec<InputField>,
    pub missing: Vec<String>,
}

/// Outcome of a dispatched prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptOutcome {
    /// The prompt text that was sent
    pub prompt: String,
    /// Response text for buffered calls; `None` when streamed
    pub text: Option<String>,
    pub streamed: bool,
}

/// Service orchestrating template rendering and dispatch
pub struct PromptService<'a> {
    state: &'a AppState,
}

impl<'a> PromptService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    async fn template(&self, id: &str) -> AppResult<PromptTemplate> {
        self.state
            .with_templates(|store| store.require(id).cloned())
            .await
    }

    /// The requested config, or the default one.
    pub async fn resolve_config(&self, config_id: Option<&str>) -> AppResult<ApiConfig> {
        self.state
            .with_api_configs(|store| {
                let config = match config_id {
                    Some(id) => store.get(id),
                    None => store.get_default_config(),
                };
                config.cloned().ok_or_else(|| match config_id {
                    Some(id) => AppError::not_found(format!("API config {}", id)),
                    None => AppError::not_found("No default API config"),
                })
            })
            .await
    }

    /// Open an editing session for a template, debounced per settings.
    pub async fn input_session(&self, template_id: &str) -> AppResult<TemplateInputs> {
        let template = self.template(template_id).await?;
        let window = Duration::from_millis(self.state.get_settings().await.debounce_ms);
        Ok(TemplateInputs::from_template(&template, window))
    }

    /// Render a template without sending it.
    pub async fn render(
        &self,
        template_id: &str,
        values: &HashMap<String, String>,
    ) -> AppResult<RenderedPrompt> {
        let template = self.template(template_id).await?;
        let fields = template.fields(values);
        let missing: Vec<String> = missing_required(&fields, values)
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(RenderedPrompt {
            text: interpolate(&template.content, values, &fields),
            is_valid: missing.is_empty(),
            fields,
            missing,
        })
    }

    /// Render, validate and dispatch a template.
    ///
    /// Streamed text is delivered through `on_chunk`; buffered responses come
    /// back in [`PromptOutcome::text`].
    pub async fn send<F>(
        &self,
        request: SendPromptRequest,
        on_chunk: F,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<PromptOutcome>
    where
        F: FnMut(&str) + Send,
    {
        let rendered = self.render(&request.template_id, &request.values).await?;
        if !rendered.is_valid {
            return Err(AppError::validation(format!(
                "Missing required fields: {}",
                rendered.missing.join(", ")
            )));
        }

        let config = self.resolve_config(request.config_id.as_deref()).await?;
        let provider = config.provider.resolve()?;
        let settings = self.state.get_settings().await;

        let prompt_request = PromptRequest {
            prompt: rendered.text.clone(),
            model: request.model.or_else(|| config.selected_model.clone()),
            temperature: request.temperature.or(settings.default_temperature),
            max_tokens: request.max_tokens.or(settings.default_max_tokens),
        };

        tracing::info!(
            template_id = %request.template_id,
            config = %config.name,
            provider = %provider,
            "Sending prompt"
        );

        let output = self
            .state
            .dispatcher()
            .send_prompt(
                &config,
                &prompt_request,
                settings.stream_responses,
                on_chunk,
                cancel,
            )
            .await?;

        let text = output.text(provider);
        Ok(PromptOutcome {
            prompt: rendered.text,
            streamed: text.is_none(),
            text,
        })
    }

    /// Persist the synthesized field descriptors back onto the template.
    pub async fn sync_template_fields(&self, template_id: &str) -> AppResult<PromptTemplate> {
        let template = self.template(template_id).await?;
        let inputs = template.fields(&HashMap::new());
        self.state
            .with_templates_mut(|store| {
                store.update_template(
                    template_id,
                    TemplateUpdate {
                        inputs: Some(inputs),
                        ..Default::default()
                    },
                )
            })
            .await
    }

    /// Chat-capable models for a config.
    pub async fn list_models(&self, config_id: Option<&str>) -> AppResult<Vec<ModelConfig>> {
        let config = self.resolve_config(config_id).await?;
        let provider = config.provider.resolve()?;
        let models = fetch_available_models(self.state.http_client(), &config).await;
        Ok(filter_chat_models(provider, models))
    }
}
