//! Command Handler Integration Tests
//!
//! Handlers never fail outright; errors come back inside the envelope.

use std::collections::HashMap;

use prompt_forge::commands;
use prompt_forge::models::api_config::ApiConfigCreateRequest;
use prompt_forge::models::template::{TemplateCreateRequest, TemplateUpdate};
use prompt_forge::{AppState, DataPaths, SettingsUpdate};
use prompt_forge_core::FieldType;
use prompt_forge_llm::{ApiProvider, AuthType};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state() -> (TempDir, AppState) {
    let temp = tempfile::tempdir().unwrap();
    let state = AppState::open(DataPaths::new(temp.path())).unwrap();
    (temp, state)
}

// ============================================================================
// Templates
// ============================================================================

#[tokio::test]
async fn test_template_lifecycle() {
    let (_temp, state) = state();

    let created = commands::create_template(
        &state,
        TemplateCreateRequest {
            name: "Review".to_string(),
            content: "Review {code} in {language}".to_string(),
            inputs: vec![],
        },
    )
    .await;
    assert!(created.success);
    let id = created.data.unwrap().id;

    let typed = commands::set_field_type(&state, &id, "code", FieldType::Textarea).await;
    assert!(typed.success);

    let updated = commands::update_template(
        &state,
        &id,
        TemplateUpdate {
            content: Some("Review {code} in {language} for {reviewer}".to_string()),
            ..Default::default()
        },
    )
    .await
    .into_result()
    .unwrap();
    assert_eq!(updated.inputs.len(), 2);

    let synced = commands::sync_template_fields(&state, &id).await.into_result().unwrap();
    let keys: Vec<&str> = synced.inputs.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["code", "language", "reviewer"]);
    assert_eq!(synced.inputs[0].field_type, FieldType::Textarea);

    assert!(commands::set_active_template(&state, Some(id.as_str())).await.success);
    let active = commands::get_active_template(&state).await.into_result().unwrap();
    assert_eq!(active.map(|t| t.id), Some(id.clone()));

    assert!(commands::delete_template(&state, &id).await.success);
    let active = commands::get_active_template(&state).await.into_result().unwrap();
    assert!(active.is_none());
    assert!(commands::list_templates(&state).await.data.unwrap().is_empty());
}

#[tokio::test]
async fn test_errors_are_wrapped() {
    let (_temp, state) = state();

    let missing = commands::get_template(&state, "nope").await;
    assert!(!missing.success);
    assert!(missing.data.is_none());
    assert_eq!(missing.error.as_deref(), Some("Not found: Template nope"));

    let bad_settings = commands::update_settings(
        &state,
        SettingsUpdate {
            default_temperature: Some(3.0),
            ..Default::default()
        },
    )
    .await;
    assert!(!bad_settings.success);
    // Rejected updates leave settings untouched
    let settings = commands::get_settings(&state).await.into_result().unwrap();
    assert_eq!(settings.default_temperature, None);
}

#[tokio::test]
async fn test_render_template() {
    let (_temp, state) = state();
    let id = commands::create_template(
        &state,
        TemplateCreateRequest {
            name: "Escapes".to_string(),
            content: "{{literal}} {value}".to_string(),
            inputs: vec![],
        },
    )
    .await
    .into_result()
    .unwrap()
    .id;

    let values = HashMap::from([("value".to_string(), "  42 ".to_string())]);
    let rendered = commands::render_template(&state, &id, values)
        .await
        .into_result()
        .unwrap();
    assert_eq!(rendered.text, "{literal} 42");
    assert!(rendered.is_valid);
}

// ============================================================================
// API configs
// ============================================================================

#[tokio::test]
async fn test_config_listing_masks_secrets() {
    let (_temp, state) = state();
    let created = commands::create_api_config(
        &state,
        ApiConfigCreateRequest {
            name: "Prod".to_string(),
            url: "https://api.openai.com/v1".to_string(),
            provider: ApiProvider::OpenAI,
            auth_type: Some(AuthType::Bearer),
            auth_value: Some("sk-live-123".to_string()),
            ..Default::default()
        },
    )
    .await
    .into_result()
    .unwrap();

    let listed = commands::list_api_configs(&state).await.into_result().unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].has_auth_value);
    assert!(listed[0].is_default);
    let serialized = serde_json::to_string(&listed).unwrap();
    assert!(!serialized.contains("sk-live-123"));

    let default = commands::get_default_api_config(&state).await.into_result().unwrap();
    assert_eq!(default.id, created.id);

    assert!(commands::remove_api_config(&state, &created.id).await.success);
    assert!(!commands::get_default_api_config(&state).await.success);
}

#[tokio::test]
async fn test_list_models_filters_openai() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "gpt-4o"},
                {"id": "whisper-1"},
                {"id": "gpt-3.5-turbo"},
                {"id": "tts-1-hd"}
            ]
        })))
        .mount(&server)
        .await;

    let (_temp, state) = state();
    let config = commands::create_api_config(
        &state,
        ApiConfigCreateRequest {
            name: "Mock".to_string(),
            url: server.uri(),
            provider: ApiProvider::OpenAI,
            auth_type: Some(AuthType::Bearer),
            auth_value: Some("sk-test".to_string()),
            ..Default::default()
        },
    )
    .await
    .into_result()
    .unwrap();

    let models = commands::list_models(&state, Some(config.id.as_str()))
        .await
        .into_result()
        .unwrap();
    let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["gpt-4o", "gpt-3.5-turbo"]);
    assert_eq!(models[0].context_window, Some(8192));
}
