use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub mod config;
pub mod interview;
pub mod ollama;
pub mod prompts;
pub mod session;

use crate::config::{AppConfig, BackendConfig, ConfigError, APP_TITLE};
use crate::interview::{categorize_tech_stack, ConversationState, InterviewEngine};
use crate::ollama::{ChatBackend, OllamaClient};
use crate::session::{generate_conversation_summary, write_exports, ExportPaths};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(
        "Cannot connect to Ollama at {url}: {detail}\n\n\
         To fix this:\n\
         1. Install Ollama from https://ollama.ai\n\
         2. Start the server: ollama serve\n\
         3. Pull the model: ollama pull {model}"
    )]
    BackendUnavailable { url: String, model: String, detail: String },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Startup health probe. Failure here means no session can be served.
pub async fn check_backend(client: &OllamaClient, config: &BackendConfig) -> Result<Vec<String>, StartupError> {
    let models = client
        .list_models()
        .await
        .map_err(|e| StartupError::BackendUnavailable {
            url: client.health_url().to_string(),
            model: config.model.clone(),
            detail: e.to_string(),
        })?;

    if models.is_empty() {
        warn!("⚠️ Ollama is running but has no models. Run: ollama pull {}", config.model);
    } else if !models.iter().any(|m| m == &config.model || m.starts_with(&format!("{}:", config.model))) {
        warn!("⚠️ Model '{}' not found in Ollama (available: {})", config.model, models.join(", "));
    } else {
        info!("✅ Ollama is reachable, model '{}' available", config.model);
    }

    Ok(models)
}

/// Lines typed at the prompt that are handled by the host instead of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand<'a> {
    Status,
    Export,
    Summary,
    Utterance(&'a str),
}

pub fn parse_host_command(line: &str) -> Option<HostCommand<'_>> {
    let line = line.trim();
    match line {
        "" => None,
        "/status" => Some(HostCommand::Status),
        "/export" => Some(HostCommand::Export),
        "/summary" => Some(HostCommand::Summary),
        _ => Some(HostCommand::Utterance(line)),
    }
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Drives one conversation over a line-oriented input until it concludes or
/// the input ends. Returns the export written at conclusion, if any.
pub async fn run_chat<R, W>(
    engine: &mut InterviewEngine,
    backend: &dyn ChatBackend,
    input: R,
    mut output: W,
    export_dir: &Path,
) -> Result<Option<ExportPaths>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    say(&mut output, &format!("TalentScout: {}", engine.start())).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_host_command(&line) else {
            continue;
        };

        match command {
            HostCommand::Status => {
                let status = serde_json::to_string_pretty(&engine.status())?;
                say(&mut output, &status).await?;
            }
            HostCommand::Export => {
                let paths = write_exports(export_dir, &engine.snapshot(now()))?;
                say(&mut output, &format!("Exported {} and {}", paths.json.display(), paths.csv.display())).await?;
            }
            HostCommand::Summary => {
                let mut text = generate_conversation_summary(engine.transcript());
                for (category, techs) in categorize_tech_stack(engine.tech_stack()) {
                    text.push_str(&format!("{}: {}\n", category, techs.join(", ")));
                }
                say(&mut output, &text).await?;
            }
            HostCommand::Utterance(utterance) => {
                let reply = engine.respond(backend, utterance).await;
                say(&mut output, &format!("TalentScout: {}", reply.message)).await?;

                if reply.state == ConversationState::Conclusion {
                    let paths = write_exports(export_dir, &engine.snapshot(now()))?;
                    info!("📁 Session saved to {}", paths.json.display());
                    say(&mut output, &format!("Session saved to {}", paths.json.display())).await?;
                    return Ok(Some(paths));
                }
            }
        }
    }

    debug!("Input closed in state {}", engine.state());
    Ok(None)
}

pub async fn run() -> Result<()> {
    info!("{} starting...", APP_TITLE);

    let config = Arc::new(AppConfig::load().map_err(StartupError::from)?);
    let info = config.info();
    info!(
        "🔧 Model: {} | Base URL: {} | max_tokens: {} | temperature: {} | {} technologies | {} fallback questions",
        info.model, info.base_url, info.max_tokens, info.temperature, info.tech_keywords_count, info.fallback_questions_count
    );

    let client = OllamaClient::new(&config.backend)?;
    check_backend(&client, &config.backend).await?;

    let mut engine = InterviewEngine::new(Arc::clone(&config));
    let export_dir = std::env::current_dir()?;

    println!("=== {} ===", APP_TITLE);
    println!("Commands: /status, /summary, /export. Say goodbye to finish.\n");

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    if run_chat(&mut engine, &client, stdin, stdout, &export_dir).await?.is_none() {
        info!("👋 Session ended in state {}", engine.state());
    }

    Ok(())
}
