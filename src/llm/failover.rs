//! Ordered provider failover.
//!
//! Providers are tried in the order given. A provider that fails is marked
//! unhealthy and skipped on later calls, so a dead primary costs one failed
//! request per process rather than one per turn. When every healthy provider
//! has failed, the last error is returned.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{info, warn};

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider};
use crate::error::LlmError;

struct Slot {
    provider: Arc<dyn LlmProvider>,
    healthy: AtomicBool,
}

pub struct FailoverProvider {
    slots: Vec<Slot>,
}

impl FailoverProvider {
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self {
            slots: providers
                .into_iter()
                .map(|provider| Slot {
                    provider,
                    healthy: AtomicBool::new(true),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl LlmProvider for FailoverProvider {
    fn model_name(&self) -> &str {
        self.slots
            .iter()
            .find(|s| s.healthy.load(Ordering::Relaxed))
            .or_else(|| self.slots.last())
            .map(|s| s.provider.model_name())
            .unwrap_or("none")
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut last_error = None;
        let healthy: Vec<&Slot> = self
            .slots
            .iter()
            .filter(|s| s.healthy.load(Ordering::Relaxed))
            .collect();

        // Every provider failed earlier: give the last one another go rather
        // than refusing outright.
        let candidates: Vec<&Slot> = if healthy.is_empty() {
            self.slots.last().into_iter().collect()
        } else {
            healthy
        };

        for (i, slot) in candidates.iter().enumerate() {
            match slot.provider.complete(request.clone()).await {
                Ok(response) => {
                    if i > 0 {
                        info!(model = slot.provider.model_name(), "Served by fallback provider");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        model = slot.provider.model_name(),
                        error = %e,
                        "LLM provider failed, trying next"
                    );
                    slot.healthy.store(false, Ordering::Relaxed);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::NoProviders))
    }
}
