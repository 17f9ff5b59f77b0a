//! Command Handlers
//!
//! Thin wrappers over the stores and services. Every handler returns a
//! [`CommandResponse`](crate::models::response::CommandResponse) so callers
//! get one envelope for both success and failure.

pub mod api_configs;
pub mod prompts;
pub mod settings;
pub mod templates;

pub use api_configs::*;
pub use prompts::*;
pub use settings::*;
pub use templates::*;
