//! Prompt Commands
//!
//! Sends a rendered template to the selected model.

use prompt_forge_llm::CancellationToken;

use crate::models::response::CommandResponse;
use crate::services::prompt::{PromptOutcome, PromptService, SendPromptRequest};
use crate::state::AppState;

/// Render and dispatch a template.
///
/// Streamed text arrives through `on_chunk` as it is decoded.
pub async fn send_prompt<F>(
    state: &AppState,
    request: SendPromptRequest,
    on_chunk: F,
    cancel: Option<&CancellationToken>,
) -> CommandResponse<PromptOutcome>
where
    F: FnMut(&str) + Send,
{
    let template_id = request.template_id.clone();
    let result = PromptService::new(state).send(request, on_chunk, cancel).await;
    if let Err(e) = &result {
        tracing::warn!(template_id = %template_id, "Prompt failed: {}", e);
    }
    result.into()
}
