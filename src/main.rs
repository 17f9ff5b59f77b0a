// Prompt Forge - Command Line Entry Point

mod cli;

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use cli::{Cli, Commands, ConfigCommand, SettingsCommand, TemplateCommand};
use prompt_forge::commands;
use prompt_forge::models::api_config::ApiConfigCreateRequest;
use prompt_forge::models::template::{PromptTemplate, TemplateCreateRequest};
use prompt_forge::{AppState, CommandResponse, DataPaths, SendPromptRequest, SettingsUpdate};
use prompt_forge_core::FieldType;
use prompt_forge_llm::{ApiProvider, AuthType, CancellationToken};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set RUST_LOG to override
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("prompt_forge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    let paths = match cli.data_dir {
        Some(dir) => DataPaths::new(dir),
        None => DataPaths::default_location()?,
    };
    let state = AppState::open(paths)?;

    match cli.command {
        Commands::Template(command) => handle_template(&state, command).await?,
        Commands::Render { id, values } => {
            let values = parse_values(&values)?;
            let rendered = data(commands::render_template(&state, &id, values).await)?;
            println!("{}", rendered.text);
            if !rendered.is_valid {
                eprintln!("Missing required fields: {}", rendered.missing.join(", "));
            }
        }
        Commands::Config(command) => handle_config(&state, command).await?,
        Commands::Models { config_id } => {
            let models = data(commands::list_models(&state, Some(config_id.as_str())).await)?;
            for model in models {
                println!("{}\t{}", model.id, model.name);
            }
        }
        Commands::Send {
            id,
            values,
            config,
            model,
        } => {
            let request = SendPromptRequest {
                template_id: id,
                values: parse_values(&values)?,
                config_id: config,
                model,
                ..Default::default()
            };
            handle_send(&state, request).await?;
        }
        Commands::Settings(command) => handle_settings(&state, command).await?,
    }

    Ok(())
}

/// Unwrap a command envelope into its data.
fn data<T>(response: CommandResponse<T>) -> anyhow::Result<T> {
    response.into_result().map_err(|e| anyhow!(e))
}

/// Parse repeated `key=value` arguments.
fn parse_values(pairs: &[String]) -> anyhow::Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", pair))
        })
        .collect()
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_templates(file: &Path) -> anyhow::Result<Vec<PromptTemplate>> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid template file {}", file.display()))
}

async fn handle_template(state: &AppState, command: TemplateCommand) -> anyhow::Result<()> {
    match command {
        TemplateCommand::List => {
            for template in data(commands::list_templates(state).await)? {
                println!("{}\t{}", template.id, template.name);
            }
        }
        TemplateCommand::Show { id } => {
            let template = data(commands::get_template(state, &id).await)?;
            println!("{}\n", template.content);
            for field in template.fields(&HashMap::new()) {
                let marker = if field.required { "*" } else { "" };
                println!("  {}{} ({}): {}", field.key, marker, field.field_type, field.label);
            }
        }
        TemplateCommand::Add { name, content } => {
            let request = TemplateCreateRequest {
                name,
                content,
                inputs: Vec::new(),
            };
            let template = data(commands::create_template(state, request).await)?;
            let template = data(commands::sync_template_fields(state, &template.id).await)?;
            println!("{}", template.id);
        }
        TemplateCommand::Delete { id } => data(commands::delete_template(state, &id).await)?,
        TemplateCommand::Import { file } => {
            let templates = read_templates(&file)?;
            let imported = data(commands::import_templates(state, templates).await)?;
            println!("Imported {} template(s)", imported.len());
        }
        TemplateCommand::SetType {
            id,
            key,
            field_type,
        } => {
            let field_type: FieldType = field_type.parse()?;
            data(commands::set_field_type(state, &id, &key, field_type).await)?;
        }
    }
    Ok(())
}

async fn handle_config(state: &AppState, command: ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::List => {
            for config in data(commands::list_api_configs(state).await)? {
                let marker = if config.is_default { "*" } else { " " };
                println!(
                    "{} {}\t{}\t{}\t{}",
                    marker,
                    config.id,
                    config.name,
                    config.provider.display_name(),
                    config.url
                );
            }
        }
        ConfigCommand::Add {
            name,
            url,
            provider,
            auth_type,
            auth_key,
            auth_value,
            model,
            default,
        } => {
            let request = ApiConfigCreateRequest {
                name,
                url,
                provider: provider.parse::<ApiProvider>()?,
                auth_type: Some(auth_type.parse::<AuthType>()?),
                auth_key,
                auth_value,
                selected_model: model,
                is_default: default,
                ..Default::default()
            };
            let config = data(commands::create_api_config(state, request).await)?;
            println!("{}", config.id);
        }
        ConfigCommand::Remove { id } => data(commands::remove_api_config(state, &id).await)?,
        ConfigCommand::Default { id } => data(commands::set_default_api_config(state, &id).await)?,
    }
    Ok(())
}

async fn handle_send(state: &AppState, request: SendPromptRequest) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut stdout = std::io::stdout();
    let on_chunk = move |chunk: &str| {
        // Broken pipes end output silently
        let _ = stdout.write_all(chunk.as_bytes());
        let _ = stdout.flush();
    };

    let outcome = data(commands::send_prompt(state, request, on_chunk, Some(&cancel)).await)?;
    match outcome.text {
        Some(text) => println!("{}", text),
        None => println!(),
    }
    Ok(())
}

async fn handle_settings(state: &AppState, command: SettingsCommand) -> anyhow::Result<()> {
    let update = match command {
        SettingsCommand::Show => {
            return print_json(&data(commands::get_settings(state).await)?);
        }
        SettingsCommand::Stream { state: flag } => SettingsUpdate {
            stream_responses: Some(match flag.as_str() {
                "on" => true,
                "off" => false,
                other => bail!("Expected on or off, got '{}'", other),
            }),
            ..Default::default()
        },
        SettingsCommand::Debounce { ms } => SettingsUpdate {
            debounce_ms: Some(ms),
            ..Default::default()
        },
    };
    print_json(&data(commands::update_settings(state, update).await)?)
}
