//! Storage Integration Tests
//!
//! Everything written through `AppState` must survive a reopen of the data
//! directory.

use prompt_forge::models::api_config::{ApiConfigCreateRequest, ApiConfigUpdate};
use prompt_forge::models::template::TemplateCreateRequest;
use prompt_forge::{AppState, DataPaths, SettingsUpdate};
use prompt_forge_llm::{ApiHeaderConfig, ApiProvider, AuthType};

fn config(name: &str, provider: ApiProvider) -> ApiConfigCreateRequest {
    ApiConfigCreateRequest {
        name: name.to_string(),
        url: "https://api.example.com/v1".to_string(),
        provider,
        auth_type: Some(AuthType::Custom),
        auth_key: Some("x-api-key".to_string()),
        auth_value: Some("secret".to_string()),
        headers: vec![ApiHeaderConfig::new("X-Team", "core")],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_everything_persists_across_reopen() {
    let temp = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(temp.path().join("forge"));

    let (template_id, config_id) = {
        let state = AppState::open(paths.clone()).unwrap();
        let template = state
            .with_templates_mut(|store| {
                let t = store.add_template(TemplateCreateRequest {
                    name: "Email".to_string(),
                    content: "Dear {recipientName}".to_string(),
                    inputs: vec![],
                })?;
                store.set_active_template(Some(t.id.as_str()))?;
                Ok(t)
            })
            .await
            .unwrap();
        let config = state
            .with_api_configs_mut(|store| store.add_config(config("Gemini", ApiProvider::Gemini)))
            .await
            .unwrap();
        state
            .update_settings(SettingsUpdate {
                debounce_ms: Some(150),
                default_temperature: Some(1.5),
                ..Default::default()
            })
            .await
            .unwrap();
        (template.id, config.id)
    };

    let state = AppState::open(paths).unwrap();

    let active = state
        .with_templates(|store| Ok(store.active_template().cloned()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, template_id);
    assert_eq!(active.content, "Dear {recipientName}");

    let stored = state
        .with_api_configs(|store| Ok(store.get_default_config().cloned()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, config_id);
    assert_eq!(stored.provider, ApiProvider::Gemini);
    assert_eq!(stored.auth_type, Some(AuthType::Custom));
    assert_eq!(stored.headers.len(), 1);
    assert!(stored.headers[0].enabled);

    let settings = state.get_settings().await;
    assert_eq!(settings.debounce_ms, 150);
    assert_eq!(settings.default_temperature, Some(1.5));
}

#[tokio::test]
async fn test_files_use_camel_case_and_iso_timestamps() {
    let temp = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(temp.path());
    let state = AppState::open(paths.clone()).unwrap();

    state
        .with_api_configs_mut(|store| store.add_config(config("A", ApiProvider::DeepSeek)))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(paths.api_configs()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &json[0];
    assert_eq!(entry["provider"], "deepseek");
    assert_eq!(entry["authType"], "custom");
    assert_eq!(entry["isDefault"], true);
    let created = entry["createdAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
}

#[tokio::test]
async fn test_default_survives_removal_and_reopen() {
    let temp = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(temp.path());

    {
        let state = AppState::open(paths.clone()).unwrap();
        state
            .with_api_configs_mut(|store| {
                let a = store.add_config(config("A", ApiProvider::OpenAI))?;
                let b = store.add_config(config("B", ApiProvider::Anthropic))?;
                store.update_config(
                    &b.id,
                    ApiConfigUpdate {
                        is_default: Some(true),
                        ..Default::default()
                    },
                )?;
                store.remove_config(&b.id)?;
                Ok(a)
            })
            .await
            .unwrap();
    }

    let state = AppState::open(paths).unwrap();
    let defaults = state
        .with_api_configs(|store| {
            Ok(store
                .configs()
                .iter()
                .filter(|c| c.is_default)
                .map(|c| c.name.clone())
                .collect::<Vec<_>>())
        })
        .await
        .unwrap();
    assert_eq!(defaults, vec!["A"]);
}
