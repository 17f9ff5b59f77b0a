//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod api_config;
pub mod response;
pub mod settings;
pub mod template;

pub use api_config::*;
pub use response::*;
pub use settings::*;
pub use template::*;
