//! LLM integration for Career Guide.
//!
//! Supports:
//! - **Gemini**: Google Generative Language API via rig-core (primary)
//! - **Ollama**: local models via rig-core (fallback)
//!
//! rig-core handles HTTP transport; `RigAdapter` bridges rig's
//! `CompletionModel` to our `LlmProvider` trait. Configured providers are
//! chained behind a `FailoverProvider`, and each conversation talks to the
//! chain through its own `LlmSession`, which owns the conversation history.

pub mod failover;
pub mod provider;
mod rig_adapter;
pub mod session;

pub use failover::FailoverProvider;
pub use provider::*;
pub use rig_adapter::RigAdapter;
pub use session::LlmSession;

use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::error::LlmError;

/// Configuration for the provider chain.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub gemini_api_key: Option<secrecy::SecretString>,
    pub gemini_model: String,
    pub ollama_enabled: bool,
    pub ollama_base_url: String,
    pub ollama_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: "gemini-pro".to_string(),
            ollama_enabled: false,
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama2".to_string(),
        }
    }
}

/// Build the provider chain from configuration.
///
/// Returns `Ok(None)` when nothing is configured; callers then run without
/// enrichment.
pub fn create_provider(config: &LlmConfig) -> Result<Option<Arc<dyn LlmProvider>>, LlmError> {
    let mut providers: Vec<Arc<dyn LlmProvider>> = Vec::new();

    match config.gemini_api_key {
        Some(ref key) => providers.push(create_gemini_provider(key, &config.gemini_model)?),
        None => warn!("Gemini API key not found"),
    }

    if config.ollama_enabled {
        providers.push(create_ollama_provider(
            &config.ollama_base_url,
            &config.ollama_model,
        )?);
    }

    if providers.is_empty() {
        warn!("No LLM provider configured; recommendations will be rule-based only");
        return Ok(None);
    }

    Ok(Some(Arc::new(FailoverProvider::new(providers))))
}

fn create_gemini_provider(
    api_key: &secrecy::SecretString,
    model: &str,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::providers::gemini;

    let client: rig::client::Client<gemini::client::GeminiExt> =
        gemini::Client::new(api_key.expose_secret()).map_err(|e| LlmError::RequestFailed {
            provider: "gemini".to_string(),
            reason: format!("Failed to create Gemini client: {}", e),
        })?;

    let completion_model = client.completion_model(model);
    info!("Using Gemini (model: {})", model);
    Ok(Arc::new(RigAdapter::new(completion_model, model)))
}

fn create_ollama_provider(base_url: &str, model: &str) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::client::Nothing;
    use rig::providers::ollama;

    let client: rig::client::Client<ollama::OllamaExt> = ollama::Client::builder()
        .api_key(Nothing)
        .base_url(base_url.trim_end_matches('/'))
        .build()
        .map_err(|e| LlmError::RequestFailed {
            provider: "ollama".to_string(),
            reason: format!("Failed to create Ollama client: {}", e),
        })?;

    let completion_model = client.completion_model(model);
    info!("Using Ollama (model: {}, url: {})", model, base_url);
    Ok(Arc::new(RigAdapter::new(completion_model, model)))
}
