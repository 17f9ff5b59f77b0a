//! Prompt Pipeline Integration Tests
//!
//! Template -> fields -> interpolation -> dispatch -> response text, with the
//! provider replaced by a wiremock server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use prompt_forge::models::api_config::ApiConfigCreateRequest;
use prompt_forge::models::template::TemplateCreateRequest;
use prompt_forge::{AppError, AppState, DataPaths, PromptService, SendPromptRequest, SettingsUpdate};
use prompt_forge_core::FieldType;
use prompt_forge_llm::{ApiProvider, AuthType, CancellationToken, LlmError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

async fn setup(server: &MockServer, provider: ApiProvider) -> (TempDir, AppState, String) {
    let temp = tempfile::tempdir().unwrap();
    let state = AppState::open(DataPaths::new(temp.path())).unwrap();

    state
        .with_api_configs_mut(|store| {
            store.add_config(ApiConfigCreateRequest {
                name: "Mock".to_string(),
                url: server.uri(),
                provider,
                auth_type: Some(AuthType::Bearer),
                auth_value: Some("sk-test".to_string()),
                ..Default::default()
            })
        })
        .await
        .unwrap();

    let template = state
        .with_templates_mut(|store| {
            store.add_template(TemplateCreateRequest {
                name: "Summary".to_string(),
                content: "Summarize {topic} for {audience}".to_string(),
                inputs: vec![],
            })
        })
        .await
        .unwrap();

    (temp, state, template.id)
}

fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn disable_streaming(state: &AppState) {
    state
        .update_settings(SettingsUpdate {
            stream_responses: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_render_reports_missing_fields() {
    let server = MockServer::start().await;
    let (_temp, state, id) = setup(&server, ApiProvider::OpenAI).await;

    let rendered = PromptService::new(&state)
        .render(&id, &values(&[("topic", "Rust")]))
        .await
        .unwrap();

    assert_eq!(rendered.text, "Summarize Rust for {audience}");
    assert!(!rendered.is_valid);
    assert_eq!(rendered.missing, vec!["audience"]);
    assert_eq!(rendered.fields.len(), 2);
    assert_eq!(rendered.fields[0].label, "Topic");
}

#[tokio::test]
async fn test_sync_fields_preserves_field_types() {
    let server = MockServer::start().await;
    let (_temp, state, id) = setup(&server, ApiProvider::OpenAI).await;

    state
        .with_templates_mut(|store| store.set_field_type(&id, "audience", FieldType::Textarea))
        .await
        .unwrap();

    let synced = PromptService::new(&state).sync_template_fields(&id).await.unwrap();
    assert_eq!(synced.inputs.len(), 2);
    assert_eq!(synced.inputs[1].field_type, FieldType::Textarea);
    assert!(synced.inputs.iter().all(|f| f.value.is_none()));
}

#[tokio::test(start_paused = true)]
async fn test_input_session_uses_configured_debounce() {
    let temp = tempfile::tempdir().unwrap();
    let state = AppState::open(DataPaths::new(temp.path())).unwrap();
    let id = state
        .with_templates_mut(|store| {
            store.add_template(TemplateCreateRequest {
                name: "Summary".to_string(),
                content: "Summarize {topic} for {audience}".to_string(),
                inputs: vec![],
            })
        })
        .await
        .unwrap()
        .id;
    state
        .update_settings(SettingsUpdate {
            debounce_ms: Some(50),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut session = PromptService::new(&state).input_session(&id).await.unwrap();
    session.update_input("topic", "Rust");
    session.update_input("audience", "teams");

    assert!(session.is_valid());
    assert_eq!(session.output(), "Summarize {topic} for {audience}");

    tokio::time::advance(std::time::Duration::from_millis(49)).await;
    assert!(!session.poll());

    assert_eq!(session.settle().await, "Summarize Rust for teams");
    assert!(!session.is_dirty());
}

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test]
async fn test_send_buffered_openai() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "Summarize Rust for beginners"}],
            "temperature": 0.25
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Rust is a systems language."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_temp, state, id) = setup(&server, ApiProvider::OpenAI).await;
    disable_streaming(&state).await;

    let outcome = PromptService::new(&state)
        .send(
            SendPromptRequest {
                template_id: id,
                values: values(&[("topic", "Rust"), ("audience", "beginners")]),
                model: Some("gpt-4o".to_string()),
                temperature: Some(0.25),
                ..Default::default()
            },
            |_| {},
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.prompt, "Summarize Rust for beginners");
    assert_eq!(outcome.text.as_deref(), Some("Rust is a systems language."));
    assert!(!outcome.streamed);
}

#[tokio::test]
async fn test_send_streams_openai_chunks() {
    let server = MockServer::start().await;
    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Ru\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"st\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse),
        )
        .mount(&server)
        .await;

    let (_temp, state, id) = setup(&server, ApiProvider::OpenAI).await;

    let chunks = Arc::new(Mutex::new(Vec::new()));
    let sink = chunks.clone();
    let outcome = PromptService::new(&state)
        .send(
            SendPromptRequest {
                template_id: id,
                values: values(&[("topic", "Rust"), ("audience", "kids")]),
                ..Default::default()
            },
            move |chunk| sink.lock().unwrap().push(chunk.to_string()),
            None,
        )
        .await
        .unwrap();

    assert!(outcome.streamed);
    assert!(outcome.text.is_none());
    assert_eq!(*chunks.lock().unwrap(), vec!["Ru", "st"]);
}

#[tokio::test]
async fn test_send_anthropic_uses_settings_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_partial_json(json!({
            "model": "claude-3-opus-20240229",
            "max_tokens": 256
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "Bonjour"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_temp, state, id) = setup(&server, ApiProvider::Anthropic).await;
    state
        .update_settings(SettingsUpdate {
            default_max_tokens: Some(256),
            ..Default::default()
        })
        .await
        .unwrap();

    // Streaming stays on in settings but anthropic is always buffered
    let outcome = PromptService::new(&state)
        .send(
            SendPromptRequest {
                template_id: id,
                values: values(&[("topic", "greetings"), ("audience", "French speakers")]),
                ..Default::default()
            },
            |_| panic!("no chunks expected"),
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.text.as_deref(), Some("Bonjour"));
}

#[tokio::test]
async fn test_send_refuses_invalid_input_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_temp, state, id) = setup(&server, ApiProvider::OpenAI).await;

    let err = PromptService::new(&state)
        .send(
            SendPromptRequest {
                template_id: id,
                values: values(&[("topic", "Rust"), ("audience", "  ")]),
                ..Default::default()
            },
            |_| {},
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.to_string(), "Validation error: Missing required fields: audience");
}

#[tokio::test]
async fn test_send_surfaces_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "bad key"}
        })))
        .mount(&server)
        .await;

    let (_temp, state, id) = setup(&server, ApiProvider::OpenAI).await;
    disable_streaming(&state).await;

    let err = PromptService::new(&state)
        .send(
            SendPromptRequest {
                template_id: id,
                values: values(&[("topic", "a"), ("audience", "b")]),
                ..Default::default()
            },
            |_| {},
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Llm(LlmError::AuthenticationFailed { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Invalid API key for openai. Please check your API configuration."
    );
}

#[tokio::test]
async fn test_send_without_config_is_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let state = AppState::open(DataPaths::new(temp.path())).unwrap();
    let template = state
        .with_templates_mut(|store| {
            store.add_template(TemplateCreateRequest {
                name: "Plain".to_string(),
                content: "No fields".to_string(),
                inputs: vec![],
            })
        })
        .await
        .unwrap();

    let err = PromptService::new(&state)
        .send(
            SendPromptRequest {
                template_id: template.id,
                ..Default::default()
            },
            |_| {},
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_send_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": []}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let (_temp, state, id) = setup(&server, ApiProvider::OpenAI).await;
    disable_streaming(&state).await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = PromptService::new(&state)
        .send(
            SendPromptRequest {
                template_id: id,
                values: values(&[("topic", "a"), ("audience", "b")]),
                ..Default::default()
            },
            |_| {},
            Some(&cancel),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Llm(LlmError::Cancelled)));
}

#[tokio::test]
async fn test_unknown_provider_config_does_not_block_others() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(temp.path());
    paths.ensure().unwrap();
    let configs = json!([
        {
            "id": "good", "name": "OpenAI", "url": server.uri(), "provider": "openai",
            "authType": "bearer", "authValue": "sk-test", "isDefault": true
        },
        {
            "id": "odd", "name": "Mistral", "url": server.uri(), "provider": "mistral",
            "authType": "bearer", "authValue": "sk-test"
        }
    ]);
    std::fs::write(paths.api_configs(), configs.to_string()).unwrap();

    let state = AppState::open(paths).unwrap();
    disable_streaming(&state).await;
    let id = state
        .with_templates_mut(|store| {
            store.add_template(TemplateCreateRequest {
                name: "Plain".to_string(),
                content: "Hello".to_string(),
                inputs: vec![],
            })
        })
        .await
        .unwrap()
        .id;

    let service = PromptService::new(&state);
    let request = |config_id: &str| SendPromptRequest {
        template_id: id.clone(),
        config_id: Some(config_id.to_string()),
        ..Default::default()
    };

    let err = service.send(request("odd"), |_| {}, None).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Llm(LlmError::UnsupportedProvider(_))
    ));
    assert_eq!(err.to_string(), "Unsupported provider: mistral");

    let outcome = service.send(request("good"), |_| {}, None).await.unwrap();
    assert_eq!(outcome.text.as_deref(), Some("ok"));

    state
        .with_api_configs_mut(|store| store.remove_config("odd"))
        .await
        .unwrap();
}
