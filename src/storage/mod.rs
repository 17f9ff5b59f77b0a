//! Storage Layer
//!
//! JSON-file persistence for templates, API configs and settings.

pub mod api_configs;
pub mod json_file;
pub mod settings;
pub mod templates;

pub use api_configs::ApiConfigStore;
pub use settings::SettingsService;
pub use templates::TemplateStore;
