use std::sync::Arc;

use anyhow::Context;

use career_guide::channels::{CliChannel, api_routes, cors_layer};
use career_guide::config::{AppConfig, RunMode};
use career_guide::guidance::{CareerAgent, ReferenceData, SessionRegistry};
use career_guide::llm::create_provider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let data = match &config.data_path {
        Some(path) => ReferenceData::from_path(path)
            .with_context(|| format!("failed to load reference data from {}", path.display()))?,
        None => ReferenceData::bundled().context("bundled reference data is invalid")?,
    };
    let data = Arc::new(data);

    let llm = create_provider(&config.llm).context("failed to create LLM provider")?;

    eprintln!("🎓 Career Guide v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   LLM: {}",
        llm.as_ref()
            .map(|p| p.model_name().to_string())
            .unwrap_or_else(|| "none (rule-based)".to_string())
    );

    match config.mode {
        RunMode::Cli => {
            eprintln!("   Type a message and press Enter. /quit to exit.\n");
            let agent = CareerAgent::new(data, llm, config.agent.clone());
            CliChannel::new(agent).run().await?;
        }
        RunMode::Http => {
            eprintln!("   Chat API: http://0.0.0.0:{}/api/chat\n", config.server.port);
            let registry = SessionRegistry::new(data, llm, config.agent.clone());
            let app = api_routes(registry).layer(cors_layer(&config.server.allowed_origins));

            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.server.port))
                .await
                .with_context(|| format!("failed to bind port {}", config.server.port))?;
            tracing::info!(port = config.server.port, "HTTP server started");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
