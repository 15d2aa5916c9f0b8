use anyhow::Result;
use log::{error, info};
use std::time::Duration;
use tokio::time::timeout;

use talentscout_lib::config::AppConfig;
use talentscout_lib::ollama::{ChatBackend, ChatMessage, ChatRequest, OllamaClient};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;
    let client = OllamaClient::new(&config.backend)?;

    println!("\n=== OLLAMA BACKEND CHECK ===\n");
    println!("Health URL:      {}", client.health_url());
    println!("Completions URL: {}", client.completions_url());
    println!("Model:           {}\n", config.backend.model);

    let models = match client.list_models().await {
        Ok(models) => models,
        Err(e) => {
            error!("❌ Cannot connect to Ollama: {}", e);
            println!("Please install and start Ollama:");
            println!("  1. Install from: https://ollama.ai/");
            println!("  2. Run: ollama serve");
            println!("  3. Pull a model: ollama pull {}", config.backend.model);
            std::process::exit(1);
        }
    };

    if models.is_empty() {
        println!("⚠️  Ollama is running but no models are installed. Run: ollama pull {}", config.backend.model);
        return Ok(());
    }

    println!("✅ Ollama is running. Available models:");
    for model in &models {
        println!("   - {}", model);
    }

    let request = ChatRequest {
        model: config.backend.model.clone(),
        messages: vec![ChatMessage::user("Reply with the single word: ready")],
        max_tokens: 20,
        temperature: 0.0,
    };

    info!("🧪 Sending test completion to {}", config.backend.model);
    match timeout(Duration::from_secs(60), client.complete(request)).await {
        Ok(Ok(text)) => println!("\n✅ Model answered: {}", text.trim()),
        Ok(Err(e)) => {
            println!("\n❌ Model '{}' failed ({:?}): {}", config.backend.model, e.kind(), e);
            std::process::exit(1);
        }
        Err(_) => {
            println!("\n⏰ Model '{}' did not answer within 60s", config.backend.model);
            std::process::exit(1);
        }
    }

    Ok(())
}
