//! Prompt Forge - Application Library
//!
//! Application layer of the prompt template editor. It includes:
//! - Command handlers returning a uniform response envelope
//! - Services: debounced input sessions and the prompt pipeline
//! - Storage: JSON-backed template, API config and settings stores
//! - Data models and utilities
//!
//! The template pipeline itself lives in `prompt-forge-core`; request
//! building and dispatch live in `prompt-forge-llm`.

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export models (avoiding settings module conflict)
pub use models::response::*;
pub use models::settings::{AppSettings, SettingsUpdate};
pub use services::prompt::{PromptOutcome, PromptService, RenderedPrompt, SendPromptRequest};
pub use services::template_inputs::TemplateInputs;
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
pub use utils::paths::DataPaths;
