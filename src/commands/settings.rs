//! Settings Commands
//!
//! Commands for reading and updating application settings.

use crate::models::response::CommandResponse;
use crate::models::settings::{AppSettings, SettingsUpdate};
use crate::state::AppState;

/// Get current application settings
pub async fn get_settings(state: &AppState) -> CommandResponse<AppSettings> {
    CommandResponse::ok(state.get_settings().await)
}

/// Update application settings with a partial update
pub async fn update_settings(
    state: &AppState,
    update: SettingsUpdate,
) -> CommandResponse<AppSettings> {
    match state.update_settings(update).await {
        Ok(settings) => CommandResponse::ok(settings),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

/// Restore default settings
pub async fn reset_settings(state: &AppState) -> CommandResponse<AppSettings> {
    state.reset_settings().await.into()
}
