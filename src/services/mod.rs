//! Services
//!
//! Business logic layered over the stores and the LLM crate.

pub mod debounce;
pub mod prompt;
pub mod template_inputs;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use prompt::{PromptOutcome, PromptService, RenderedPrompt, SendPromptRequest};
pub use template_inputs::TemplateInputs;
