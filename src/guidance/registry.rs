//! Session registry: session id → conversation.
//!
//! Sessions are created on first use and reset in place; nothing is ever
//! evicted. Each conversation sits behind its own async mutex so concurrent
//! requests for one session are serialized while different sessions proceed
//! independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use super::catalog::ReferenceData;
use super::orchestrator::CareerAgent;
use crate::config::AgentConfig;
use crate::llm::LlmProvider;

pub type SharedAgent = Arc<Mutex<CareerAgent>>;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SharedAgent>>,
    data: Arc<ReferenceData>,
    llm: Option<Arc<dyn LlmProvider>>,
    config: AgentConfig,
}

impl SessionRegistry {
    pub fn new(
        data: Arc<ReferenceData>,
        llm: Option<Arc<dyn LlmProvider>>,
        config: AgentConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            data,
            llm,
            config,
        })
    }

    /// A fresh session id.
    pub fn new_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Look up a session without creating it.
    pub async fn get(&self, session_id: &str) -> Option<SharedAgent> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Look up a session, creating it on first use.
    pub async fn get_or_create(&self, session_id: &str) -> SharedAgent {
        if let Some(agent) = self.get(session_id).await {
            return agent;
        }

        let mut sessions = self.sessions.write().await;
        // Another request may have created it between the two locks.
        let agent = sessions.entry(session_id.to_string()).or_insert_with(|| {
            info!(session_id, "New session created");
            Arc::new(Mutex::new(CareerAgent::new(
                Arc::clone(&self.data),
                self.llm.clone(),
                self.config.clone(),
            )))
        });
        Arc::clone(agent)
    }

    /// Reset a session in place. Returns false if the id is unknown.
    pub async fn reset(&self, session_id: &str) -> bool {
        match self.get(session_id).await {
            Some(agent) => {
                agent.lock().await.reset();
                debug!(session_id, "Session reset");
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
