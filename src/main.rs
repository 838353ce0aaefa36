//! Order desk driver
//!
//! Reads user messages from stdin, one per line, for a single session and
//! prints one JSON turn response per line.

use order_desk::config::AppConfig;
use order_desk::history::HistoryStore;
use order_desk::llm::{LoggingService, OpenAIService};
use order_desk::message::Message;
use order_desk::orders::HttpOrderBackend;
use order_desk::runtime::{LlmDecisionService, ProductionProcessor, TurnMachine, TurnProcessor};
use order_desk::system_prompt::build_system_prompt;
use order_desk::tools::{CatalogService, HttpCatalog, ToolRegistry, UnconfiguredCatalog};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries responses
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_desk=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = AppConfig::from_env();
    let session_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::info!(path = %config.db_path.display(), "Opening history database");
    let store = HistoryStore::open(&config.db_path)?;
    let history = store.session(session_id.clone());

    let processor = build_processor(&config)?;
    tracing::info!(session_id = %session_id, model = %config.llm_model, "Session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        match processor
            .process_turn(&session_id, &history, Message::human(text))
            .await
        {
            Ok(response) => {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Turn failed");
                stdout.write_all(b"{\"error\":\"turn failed\"}\n").await?;
                stdout.flush().await?;
            }
        }
    }

    Ok(())
}

fn build_processor(config: &AppConfig) -> Result<ProductionProcessor, Box<dyn std::error::Error>> {
    let api_key = config.llm_api_key.clone().unwrap_or_else(|| {
        tracing::warn!("LLM_API_KEY is not set; model requests will be rejected");
        String::new()
    });
    let llm = OpenAIService::new(api_key, config.llm_base_url.clone(), config.llm_model.clone())?;
    let decisions = LlmDecisionService::new(Arc::new(LoggingService::new(Arc::new(llm))));

    let orders = HttpOrderBackend::new(config.order_api_url.clone(), config.order_api_timeout)?;
    let catalog: Arc<dyn CatalogService> = match &config.catalog_api_url {
        Some(url) => Arc::new(HttpCatalog::new(url.clone(), config.order_api_timeout)?),
        None => {
            tracing::warn!("CATALOG_API_URL is not set; product tools will report errors");
            Arc::new(UnconfiguredCatalog)
        }
    };
    let tools = Arc::new(ToolRegistry::new(Arc::new(orders), catalog));

    let system_prompt = build_system_prompt(
        config.system_prompt_path.as_deref(),
        chrono::Local::now().date_naive(),
    )?;

    let machine = TurnMachine::new(decisions, tools, system_prompt)
        .with_temperature(config.temperature)
        .with_max_rounds_per_pass(config.max_rounds_per_pass);

    Ok(TurnProcessor::new(machine).with_max_iterations(config.max_iterations))
}
