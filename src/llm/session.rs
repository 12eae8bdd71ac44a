//! Per-conversation LLM adapter with its own history buffer.
//!
//! `generate()` sends `[system?, ...history, user prompt]` to the provider,
//! bounded by a timeout. The prompt and the reply are appended to the
//! history only when the call succeeds, so a failed or timed-out call leaves
//! the buffer untouched.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::error::LlmError;

const TEMPERATURE: f32 = 0.7;

pub struct LlmSession {
    llm: Arc<dyn LlmProvider>,
    history: Vec<ChatMessage>,
    timeout: Duration,
}

impl LlmSession {
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            llm,
            history: Vec::new(),
            timeout,
        }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Generate a reply, bounded by the session's timeout.
    pub async fn generate(
        &mut self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(prompt));

        let request = CompletionRequest::new(messages).with_temperature(TEMPERATURE);

        let timeout = self.timeout;
        let response = tokio::time::timeout(timeout, self.llm.complete(request))
            .await
            .map_err(|_| LlmError::Timeout { timeout })??;

        debug!(
            model = self.llm.model_name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "LLM generation complete"
        );

        self.history.push(ChatMessage::user(prompt));
        self.history.push(ChatMessage::assistant(response.content.clone()));
        Ok(response.content)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        debug!("LLM conversation history cleared");
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }
}
