//! Integration tests for the chat HTTP API.
//!
//! Each test spins up an Axum server on a random port and drives the real
//! REST contract with reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use career_guide::channels::{api_routes, cors_layer};
use career_guide::config::AgentConfig;
use career_guide::error::LlmError;
use career_guide::guidance::{
    ConversationPhase, ReferenceData, SessionRegistry, Stream, validate_alignment,
};
use career_guide::llm::{CompletionRequest, CompletionResponse, LlmProvider};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

const COMMERCE_ANSWER: &str = "I love accounting and economics";

/// Stub LLM provider that always recommends the same Commerce careers.
struct StubLlm;

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: r#"[
                {"name": "Company Secretary (CS)", "justification": "stub justification"},
                {"name": "Astronaut", "justification": "not in the catalog"}
            ]"#
            .to_string(),
            input_tokens: 0,
            output_tokens: 0,
        })
    }
}

/// Start an Axum server on a random port, return (port, registry).
async fn start_server(llm: Option<Arc<dyn LlmProvider>>) -> (u16, Arc<SessionRegistry>) {
    let data = Arc::new(ReferenceData::bundled().unwrap());
    let registry = SessionRegistry::new(data, llm, AgentConfig::default());
    let app = api_routes(Arc::clone(&registry))
        .layer(cors_layer(&["http://localhost:8501".to_string()]));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, registry)
}

async fn chat(client: &reqwest::Client, port: u16, session_id: &str, message: &str) -> Value {
    let resp = client
        .post(format!("http://127.0.0.1:{port}/api/chat"))
        .json(&json!({"message": message, "session_id": session_id}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

/// Drive a session from the first message through stream confirmation.
async fn run_to_stream_questions(client: &reqwest::Client, port: u16, session_id: &str) {
    let data = ReferenceData::bundled().unwrap();
    chat(client, port, session_id, "hello").await;
    for _ in 0..data.general_questions().len() {
        chat(client, port, session_id, COMMERCE_ANSWER).await;
    }
    let body = chat(client, port, session_id, "yes").await;
    assert_eq!(body["complete"], false);
}

async fn finish_stream_questions(client: &reqwest::Client, port: u16, session_id: &str) -> Value {
    let data = ReferenceData::bundled().unwrap();
    let mut last = Value::Null;
    for _ in 0..data.stream_questions(Stream::Commerce).len() {
        last = chat(client, port, session_id, "high").await;
    }
    last
}

#[tokio::test]
async fn root_and_health() {
    timeout(TEST_TIMEOUT, async {
        let (port, _) = start_server(None).await;
        let client = reqwest::Client::new();

        let root: Value = client
            .get(format!("http://127.0.0.1:{port}/"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(root["status"], "running");
        assert!(root["version"].is_string());

        let health: Value = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "healthy");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn commerce_conversation_end_to_end() {
    timeout(TEST_TIMEOUT, async {
        let (port, registry) = start_server(None).await;
        let client = reqwest::Client::new();
        let data = ReferenceData::bundled().unwrap();

        run_to_stream_questions(&client, port, "e2e").await;
        let body = finish_stream_questions(&client, port, "e2e").await;

        assert_eq!(body["complete"], true);
        assert_eq!(body["session_id"], "e2e");
        let response = body["response"].as_str().unwrap();
        assert!(response.contains("certified human career counselor"));

        let shown: Vec<_> = data
            .careers(Stream::Commerce)
            .iter()
            .filter(|c| response.contains(&format!(". {}**", c.name)))
            .collect();
        assert_eq!(shown.len(), 3);
        for career in shown {
            assert!(validate_alignment(&career.name, Stream::Commerce, &data));
        }

        let agent = registry.get("e2e").await.unwrap();
        assert_eq!(agent.lock().await.phase(), ConversationPhase::Complete);

        // Further input gets the fixed completion message.
        let body = chat(&client, port, "e2e", "anything else?").await;
        assert_eq!(body["complete"], true);
        assert!(body["response"].as_str().unwrap().contains("Restart"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn enrichment_over_http_drops_unknown_careers() {
    timeout(TEST_TIMEOUT, async {
        let llm: Arc<dyn LlmProvider> = Arc::new(StubLlm);
        let (port, _) = start_server(Some(llm)).await;
        let client = reqwest::Client::new();

        run_to_stream_questions(&client, port, "llm").await;
        let body = finish_stream_questions(&client, port, "llm").await;

        let response = body["response"].as_str().unwrap();
        assert!(response.contains("**1. Company Secretary (CS)**"));
        assert!(response.contains("stub justification"));
        assert!(!response.contains("Astronaut"));
        assert_eq!(response.matches("---").count(), 3);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn restart_returns_session_to_welcome() {
    timeout(TEST_TIMEOUT, async {
        let (port, registry) = start_server(None).await;
        let client = reqwest::Client::new();

        chat(&client, port, "r1", "hello").await;
        chat(&client, port, "r1", "Asha").await;

        let resp: Value = client
            .post(format!("http://127.0.0.1:{port}/api/restart"))
            .json(&json!({"session_id": "r1"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(resp["success"], true);

        let agent = registry.get("r1").await.unwrap();
        let agent = agent.lock().await;
        assert_eq!(agent.phase(), ConversationPhase::Welcome);
        assert!(agent.profile().name.is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn language_endpoint_switches_question_language() {
    timeout(TEST_TIMEOUT, async {
        let (port, _) = start_server(None).await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/language"))
            .json(&json!({"session_id": "mr1", "language": "mr"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body = chat(&client, port, "mr1", "hello").await;
        assert!(body["response"].as_str().unwrap().starts_with("(प्रश्न 1 / 9)"));

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/language"))
            .json(&json!({"session_id": "mr1", "language": "de"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn concurrent_requests_for_one_session_are_serialized() {
    timeout(TEST_TIMEOUT, async {
        let (port, registry) = start_server(None).await;
        let client = reqwest::Client::new();

        // One message moves past Welcome, the other three answer the first
        // three general questions. None may be lost.
        let requests = (0..4).map(|i| {
            let client = client.clone();
            async move { chat(&client, port, "race", &format!("answer {i}")).await }
        });
        let replies = futures::future::join_all(requests).await;
        assert!(replies.iter().all(|r| r["complete"] == false));

        let agent = registry.get("race").await.unwrap();
        let agent = agent.lock().await;
        assert_eq!(agent.phase(), ConversationPhase::GeneralQuestions);
        let profile = agent.profile();
        assert!(!profile.name.is_empty());
        assert!(!profile.favourite_subjects.is_empty());
        assert!(!profile.weak_subjects.is_empty());
        assert!(profile.marks_range.is_empty());
        assert_eq!(registry.len().await, 1);
    })
    .await
    .expect("test timed out");
}
