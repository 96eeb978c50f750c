//! `conceptviz`: turn a topic into a Mermaid diagram.
//!
//! Diagram source goes to stdout, logs to stderr.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conceptviz_core::{AiSettings, DiagramRequest, DiagramResponse, DiagramType};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "conceptviz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate Mermaid diagrams for a topic with an LLM", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the configured model for a diagram of TOPIC
    Generate {
        topic: String,

        /// Print `{"topic", "mermaidCode"}` instead of bare diagram source
        #[arg(long)]
        json: bool,

        /// Override the configured provider for this run
        #[arg(long)]
        provider: Option<String>,

        /// Override the configured model for this run
        #[arg(long)]
        model: Option<String>,
    },

    /// Sanitize raw model output read from FILE (or stdin)
    Sanitize {
        /// Topic used for the fallback diagram
        #[arg(short, long)]
        topic: String,

        /// Input file; `-` or omitted reads stdin
        file: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Check whether FILE (or stdin) is already a clean diagram; exits 1 if not
    Check { file: Option<PathBuf> },

    /// Print the fallback diagram for TOPIC
    Fallback { topic: String },

    /// Show or change AI provider settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print current settings (the API key is masked)
    Show,
    /// Update stored settings; omitted fields keep their value
    Set {
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    conceptviz_core::telemetry::init_tracing(cli.json_logs, level);

    match cli.command {
        Commands::Generate {
            topic,
            json,
            provider,
            model,
        } => cmd_generate(topic, json, provider, model).await,
        Commands::Sanitize { topic, file, json } => cmd_sanitize(&topic, file.as_deref(), json),
        Commands::Check { file } => cmd_check(file.as_deref()),
        Commands::Fallback { topic } => {
            println!("{}", conceptviz_suggest::fallback_diagram(&topic));
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Set {
                provider,
                model,
                api_key,
            } => cmd_config_set(provider, model, api_key),
        },
    }
}

async fn cmd_generate(
    topic: String,
    json: bool,
    provider: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let request = DiagramRequest::new(topic);
    request.validate().context("invalid topic")?;

    let mut settings = conceptviz_core::read_settings();
    if let Some(p) = provider {
        settings.provider = p;
    }
    if let Some(m) = model {
        settings.model = m;
    }
    if !conceptviz_core::ai_configured(&settings) {
        tracing::warn!("AI provider not configured, see `conceptviz config set`");
    }

    let response = conceptviz_suggest::generate_diagram(&request.topic, &settings).await;
    print_response(&response, json)
}

fn cmd_sanitize(topic: &str, file: Option<&Path>, json: bool) -> Result<()> {
    let raw = read_input(file)?;
    let outcome = conceptviz_suggest::sanitize_with_outcome(&raw, topic);
    info!(
        diagram_type = %outcome.diagram_type,
        fallback = outcome.fallback,
        "sanitized input"
    );
    let response = DiagramResponse {
        topic: topic.to_string(),
        mermaid_code: outcome.code,
    };
    print_response(&response, json)
}

fn cmd_check(file: Option<&Path>) -> Result<()> {
    let code = read_input(file)?;
    if conceptviz_suggest::is_valid_diagram(&code) {
        let kind = DiagramType::from_declaration(code.trim_start());
        println!("valid ({kind})");
        Ok(())
    } else {
        println!("invalid");
        std::process::exit(1);
    }
}

fn cmd_config_show() -> Result<()> {
    let settings = conceptviz_core::read_settings();
    println!("{}", serde_json::to_string_pretty(&settings.masked())?);
    println!("path: {}", conceptviz_core::settings_path().display());
    Ok(())
}

fn cmd_config_set(
    provider: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
) -> Result<()> {
    let path = conceptviz_core::settings_path();
    let mut settings: AiSettings = conceptviz_core::read_settings_from(&path);
    if let Some(p) = provider {
        settings.provider = p;
    }
    if let Some(m) = model {
        settings.model = m;
    }
    if let Some(k) = api_key {
        settings.api_key = k;
    }
    conceptviz_core::write_settings(&settings)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "settings saved");
    println!("{}", serde_json::to_string_pretty(&settings.masked())?);
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_response(response: &DiagramResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        println!("{}", response.mermaid_code);
    }
    Ok(())
}
