//! CLI interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prompt-forge")]
#[command(version, about = "Fill prompt templates and send them to LLM providers", long_about = None)]
pub struct Cli {
    /// Data directory (defaults to ~/.prompt-forge)
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage templates
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Render a template without sending it
    Render {
        /// Template id
        id: String,

        /// Field value as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,
    },

    /// Manage API configs
    #[command(subcommand)]
    Config(ConfigCommand),

    /// List chat models for a config
    Models {
        /// Config id
        config_id: String,
    },

    /// Render a template and send it to a model
    Send {
        /// Template id
        id: String,

        /// Field value as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,

        /// Config id (defaults to the default config)
        #[arg(long)]
        config: Option<String>,

        /// Model override
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// List templates
    List,

    /// Show a template and its fields
    Show { id: String },

    /// Add a template
    Add {
        name: String,

        /// Template text with {placeholders}
        content: String,
    },

    /// Delete a template
    Delete { id: String },

    /// Import templates from a JSON file
    Import { file: PathBuf },

    /// Change the input type of a field
    SetType {
        id: String,
        key: String,

        /// text, number, select or textarea
        field_type: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// List configs (secrets masked)
    List,

    /// Add a config
    Add {
        name: String,

        /// Base URL, or the full endpoint for custom providers
        url: String,

        /// openai, anthropic, deepseek, gemini or custom
        #[arg(short, long, default_value = "openai")]
        provider: String,

        /// bearer, basic or custom
        #[arg(long, default_value = "bearer")]
        auth_type: String,

        /// Username (basic) or header name (custom)
        #[arg(long)]
        auth_key: Option<String>,

        /// Secret value
        #[arg(long)]
        auth_value: Option<String>,

        /// Model to use by default
        #[arg(short, long)]
        model: Option<String>,

        /// Make this the default config
        #[arg(long)]
        default: bool,
    },

    /// Remove a config
    Remove { id: String },

    /// Make a config the default
    Default { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print current settings
    Show,

    /// Turn response streaming on or off
    Stream {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },

    /// Set the input debounce window
    Debounce { ms: u64 },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
