//! Conversation orchestrator: drives one student's session through the
//! phase machine and sequences detection, scoring and formatting.
//!
//! Recommendation generation is computed against a tentative copy of the
//! profile and only committed on success, so a failed turn leaves the phase,
//! indices and profile exactly as they were and the student can simply retry.

use std::sync::{Arc, LazyLock};

use chrono::Utc;
use regex::Regex;
use tracing::{debug, error, info, warn};

use super::alignment::validate_alignment;
use super::catalog::{CareerCatalogEntry, Question, ReferenceData};
use super::classifier::detect_stream;
use super::enrichment::enrich;
use super::formatter::{format_recommendation, format_response};
use super::language::detect_language;
use super::messages::{MessageId, render, text};
use super::model::{Language, Recommendation, Stream, StudentProfile};
use super::scoring::{filter_careers, rank_careers};
use super::state::{ConversationPhase, ConversationState};
use crate::config::AgentConfig;
use crate::error::GuidanceError;
use crate::llm::{LlmProvider, LlmSession};

static AFFIRMATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(yes|yeah|yep|y|correct|right|होय|हो|ho|hoy)\b")
        .expect("affirmative pattern is valid")
});

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(no|nope|nah|n|wrong|नाही|नको|nahi)\b")
        .expect("negative pattern is valid")
});

fn is_affirmative(input: &str) -> bool {
    AFFIRMATIVE.is_match(input)
}

fn is_negative(input: &str) -> bool {
    NEGATIVE.is_match(input)
}

/// One turn's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub response: String,
    pub complete: bool,
}

impl AgentReply {
    fn ongoing(response: String) -> Self {
        Self {
            response,
            complete: false,
        }
    }

    fn finished(response: String) -> Self {
        Self {
            response,
            complete: true,
        }
    }
}

/// A single student's guidance conversation.
pub struct CareerAgent {
    data: Arc<ReferenceData>,
    llm: Option<LlmSession>,
    config: AgentConfig,
    profile: StudentProfile,
    state: ConversationState,
    /// Language chosen explicitly by the student; survives reset and
    /// disables auto-detection.
    language_pinned: bool,
    language_detected: bool,
}

impl CareerAgent {
    pub fn new(
        data: Arc<ReferenceData>,
        llm: Option<Arc<dyn LlmProvider>>,
        config: AgentConfig,
    ) -> Self {
        let llm = llm.map(|provider| LlmSession::new(provider, config.recommendation_timeout));
        Self {
            data,
            llm,
            config,
            profile: StudentProfile::default(),
            state: ConversationState::default(),
            language_pinned: false,
            language_detected: false,
        }
    }

    pub fn phase(&self) -> ConversationPhase {
        self.state.phase
    }

    pub fn profile(&self) -> &StudentProfile {
        &self.profile
    }

    pub fn language(&self) -> Language {
        self.profile.language
    }

    pub fn detected_stream(&self) -> Option<Stream> {
        self.state.detected_stream
    }

    /// Phases entered since the last reset, in order.
    pub fn visited_phases(&self) -> &[ConversationPhase] {
        &self.state.visited
    }

    pub fn is_complete(&self) -> bool {
        self.state.phase.is_terminal()
    }

    /// Localized greeting for front ends that show one before the first turn.
    pub fn welcome_message(&self) -> String {
        text(MessageId::Welcome, self.language())
    }

    /// Pin the conversation language. Unsupported codes are logged and
    /// ignored.
    pub fn set_language(&mut self, code: &str) -> bool {
        match Language::from_code(code) {
            Some(language) => {
                self.profile.language = language;
                self.language_pinned = true;
                info!(%language, "Language set explicitly");
                true
            }
            None => {
                warn!(code, "Unsupported language code ignored");
                false
            }
        }
    }

    /// Return to Welcome with a fresh profile. An explicitly chosen language
    /// is kept; an auto-detected one is not.
    pub fn reset(&mut self) {
        let language = if self.language_pinned {
            self.profile.language
        } else {
            Language::default()
        };
        self.profile = StudentProfile {
            language,
            ..Default::default()
        };
        self.state = ConversationState::default();
        self.language_detected = false;
        if let Some(session) = self.llm.as_mut() {
            session.clear_history();
        }
        info!("Conversation reset");
    }

    /// Handle one line of student input.
    pub async fn process_input(&mut self, input: &str) -> AgentReply {
        let input = input.trim();
        if input.is_empty() {
            return AgentReply {
                response: text(MessageId::EmptyInput, self.language()),
                complete: self.is_complete(),
            };
        }

        debug!(phase = %self.state.phase, "Processing input");

        let result = match self.state.phase {
            ConversationPhase::Welcome => self.handle_welcome(input),
            ConversationPhase::GeneralQuestions => self.handle_general_answer(input),
            ConversationPhase::StreamConfirmation => self.handle_stream_confirmation(input).await,
            ConversationPhase::StreamQuestions => self.handle_stream_answer(input).await,
            ConversationPhase::Recommendations | ConversationPhase::Complete => Ok(
                AgentReply::finished(text(MessageId::ConversationOver, self.language())),
            ),
        };

        result.unwrap_or_else(|e| {
            error!(error = %e, phase = %self.state.phase, "Failed to process input");
            AgentReply::ongoing(text(MessageId::UnexpectedError, self.language()))
        })
    }

    fn handle_welcome(&mut self, input: &str) -> Result<AgentReply, GuidanceError> {
        if !self.language_pinned && !self.language_detected {
            self.profile.language = detect_language(input);
            self.language_detected = true;
            info!(language = %self.profile.language, "Language detected");
        }

        self.state.transition(ConversationPhase::GeneralQuestions)?;

        let data = Arc::clone(&self.data);
        match data.general_questions().first() {
            Some(question) => Ok(AgentReply::ongoing(self.ask(question))),
            None => {
                let prompt = self.enter_stream_confirmation()?;
                Ok(AgentReply::ongoing(format!(
                    "{}\n\n{}",
                    self.welcome_message(),
                    prompt
                )))
            }
        }
    }

    fn handle_general_answer(&mut self, input: &str) -> Result<AgentReply, GuidanceError> {
        let data = Arc::clone(&self.data);
        let questions = data.general_questions();

        if let Some(question) = questions.get(self.state.general_index) {
            if !self.profile.update(&question.id, input) {
                debug!(id = %question.id, "General question has no profile field, answer not stored");
            }
            self.state.general_index += 1;
        }

        match questions.get(self.state.general_index) {
            Some(next) => Ok(AgentReply::ongoing(self.ask(next))),
            None => Ok(AgentReply::ongoing(self.enter_stream_confirmation()?)),
        }
    }

    /// Enter StreamConfirmation and run the classifier. Returns the prompt.
    fn enter_stream_confirmation(&mut self) -> Result<String, GuidanceError> {
        self.state.transition(ConversationPhase::StreamConfirmation)?;

        let detected = detect_stream(
            &self.profile.favourite_subjects,
            &self.profile.weak_subjects,
            &self.profile.interests,
        );
        self.state.detected_stream = detected;

        let language = self.language();
        Ok(match detected {
            Some(stream) => render(
                MessageId::ConfirmStream,
                language,
                &[("stream", self.data.stream_name(stream, language))],
            ),
            None => text(MessageId::AskStream, language),
        })
    }

    async fn handle_stream_confirmation(&mut self, input: &str) -> Result<AgentReply, GuidanceError> {
        if let Some(stream) = Stream::from_name(input) {
            return self.commit_stream(stream).await;
        }

        if is_affirmative(input) {
            return match self.state.detected_stream {
                Some(stream) => self.commit_stream(stream).await,
                None => Ok(AgentReply::ongoing(text(MessageId::AskStream, self.language()))),
            };
        }

        if is_negative(input) {
            debug!("Detected stream rejected, asking explicitly");
            self.state.detected_stream = None;
            return Ok(AgentReply::ongoing(text(MessageId::AskStream, self.language())));
        }

        Ok(AgentReply::ongoing(text(MessageId::InvalidStream, self.language())))
    }

    async fn commit_stream(&mut self, stream: Stream) -> Result<AgentReply, GuidanceError> {
        let data = Arc::clone(&self.data);
        let questions = data.stream_questions(stream);

        let Some(first) = questions.first() else {
            let tentative = StudentProfile {
                stream: Some(stream),
                ..self.profile.clone()
            };
            info!(%stream, "Stream confirmed, no stream questions");
            return self.finish(tentative).await;
        };

        self.state.transition(ConversationPhase::StreamQuestions)?;
        self.profile.stream = Some(stream);
        self.state.detected_stream = None;
        self.state.stream_index = 0;
        info!(%stream, "Stream confirmed");

        Ok(AgentReply::ongoing(self.ask(first)))
    }

    async fn handle_stream_answer(&mut self, input: &str) -> Result<AgentReply, GuidanceError> {
        let stream = self.profile.stream.ok_or(GuidanceError::StreamNotConfirmed)?;
        let data = Arc::clone(&self.data);
        let questions = data.stream_questions(stream);

        let Some(question) = questions.get(self.state.stream_index) else {
            return self.finish(self.profile.clone()).await;
        };

        if let Some(next) = questions.get(self.state.stream_index + 1) {
            self.profile.set_aptitude(&question.id, input);
            self.state.stream_index += 1;
            return Ok(AgentReply::ongoing(self.ask(next)));
        }

        let mut tentative = self.profile.clone();
        tentative.set_aptitude(&question.id, input);
        let reply = self.finish(tentative).await?;
        self.state.stream_index = questions.len();
        Ok(reply)
    }

    /// Generate recommendations for `tentative` and, only if that succeeds,
    /// commit it and close the conversation.
    async fn finish(&mut self, mut tentative: StudentProfile) -> Result<AgentReply, GuidanceError> {
        let mut next_state = self.state.clone();
        next_state.transition(ConversationPhase::Recommendations)?;
        next_state.transition(ConversationPhase::Complete)?;
        next_state.detected_stream = None;

        let response = self.generate_recommendations(&tentative).await?;

        tentative.completed_at = Some(Utc::now());
        self.profile = tentative;
        self.state = next_state;
        info!(stream = ?self.profile.stream, "Conversation complete");
        Ok(AgentReply::finished(response))
    }

    async fn generate_recommendations(
        &mut self,
        profile: &StudentProfile,
    ) -> Result<String, GuidanceError> {
        let stream = profile.stream.ok_or(GuidanceError::StreamNotConfirmed)?;
        let language = profile.language;
        let data = Arc::clone(&self.data);

        let rule_based = || -> Vec<Recommendation> {
            filter_careers(stream, profile, &data)
                .into_iter()
                .map(|career| format_recommendation(career, stream, language, &data))
                .collect()
        };

        let mut recommendations = match self.llm.as_mut() {
            Some(session) => {
                let candidates: Vec<&CareerCatalogEntry> = rank_careers(stream, profile, &data)
                    .into_iter()
                    .map(|scored| scored.career)
                    .collect();
                match enrich(
                    session,
                    profile,
                    stream,
                    &candidates,
                    language,
                    &data,
                )
                .await
                {
                    Ok(enriched) if !enriched.is_empty() => enriched,
                    Ok(_) => rule_based(),
                    Err(e) => {
                        warn!(error = %e, "Enrichment failed, using rule-based recommendations");
                        rule_based()
                    }
                }
            }
            None => rule_based(),
        };

        recommendations.retain(|rec| validate_alignment(&rec.name, stream, &data));
        if recommendations.is_empty() {
            return Err(GuidanceError::NoAlignedCareers {
                stream: stream.to_string(),
            });
        }

        Ok(format_response(&recommendations, language))
    }

    /// Localized question text, optionally numbered.
    fn ask(&self, question: &Question) -> String {
        let language = self.language();
        let body = question.text(language);
        if !self.config.number_questions {
            return body.to_string();
        }
        let number = render(
            MessageId::QuestionNumber,
            language,
            &[
                ("n", &(self.state.answered_in_phase() + 1).to_string()),
                ("total", &self.data.total_questions().to_string()),
            ],
        );
        format!("{number} {body}")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::LlmError;
    use crate::guidance::catalog::tests::minimal_json;
    use crate::llm::{CompletionRequest, CompletionResponse};

    const COMMERCE_ANSWER: &str = "I love accounting and economics";

    fn bundled() -> Arc<ReferenceData> {
        Arc::new(ReferenceData::bundled().unwrap())
    }

    fn agent() -> CareerAgent {
        CareerAgent::new(bundled(), None, AgentConfig::default())
    }

    fn unnumbered(data: Arc<ReferenceData>, llm: Option<Arc<dyn LlmProvider>>) -> CareerAgent {
        let config = AgentConfig {
            number_questions: false,
            ..AgentConfig::default()
        };
        CareerAgent::new(data, llm, config)
    }

    /// Answer every general question with the same text.
    async fn answer_general(agent: &mut CareerAgent, answer: &str) -> AgentReply {
        let count = agent.data.general_questions().len();
        let mut reply = agent.process_input("hello").await;
        for _ in 0..count {
            reply = agent.process_input(answer).await;
        }
        reply
    }

    async fn answer_stream(agent: &mut CareerAgent, answer: &str) -> AgentReply {
        let stream = agent.profile().stream.unwrap();
        let count = agent.data.stream_questions(stream).len();
        let mut reply = AgentReply::ongoing(String::new());
        for _ in 0..count {
            reply = agent.process_input(answer).await;
        }
        reply
    }

    fn recommended_names(response: &str, data: &ReferenceData, stream: Stream) -> Vec<String> {
        data.careers(stream)
            .iter()
            .filter(|c| response.contains(&format!(". {}**", c.name)))
            .map(|c| c.name.clone())
            .collect()
    }

    struct ScriptedLlm {
        reply: Mutex<Result<String, ()>>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn new(reply: Result<&str, ()>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(reply.map(str::to_string)),
                calls: AtomicUsize::new(0),
            })
        }

        fn set_reply(&self, reply: Result<&str, ()>) {
            *self.reply.lock().unwrap() = reply.map(str::to_string);
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply.lock().unwrap().clone() {
                Ok(content) => Ok(CompletionResponse {
                    content,
                    input_tokens: 1,
                    output_tokens: 1,
                }),
                Err(()) => Err(LlmError::RequestFailed {
                    provider: "scripted".into(),
                    reason: "unavailable".into(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn first_input_asks_first_numbered_question() {
        let mut agent = agent();
        let reply = agent.process_input("hi").await;
        assert!(!reply.complete);
        assert_eq!(agent.phase(), ConversationPhase::GeneralQuestions);
        let first = &agent.data.general_questions()[0];
        assert_eq!(
            reply.response,
            format!("(Question 1 of {}) {}", agent.data.total_questions(), first.text_en)
        );
    }

    #[tokio::test]
    async fn numbering_counts_answers_in_phase() {
        let mut agent = agent();
        agent.process_input("hi").await;
        let reply = agent.process_input("Asha").await;
        assert!(reply.response.starts_with("(Question 2 of 9)"));
    }

    #[tokio::test]
    async fn commerce_end_to_end() {
        let data = bundled();
        let mut agent = unnumbered(Arc::clone(&data), None);

        let reply = answer_general(&mut agent, COMMERCE_ANSWER).await;
        assert_eq!(agent.phase(), ConversationPhase::StreamConfirmation);
        assert_eq!(agent.detected_stream(), Some(Stream::Commerce));
        assert!(reply.response.contains("Commerce"));
        assert!(reply.response.contains("(Yes/No)"));

        let reply = agent.process_input("yes").await;
        assert_eq!(agent.phase(), ConversationPhase::StreamQuestions);
        assert_eq!(agent.profile().stream, Some(Stream::Commerce));
        assert!(!reply.complete);

        let reply = answer_stream(&mut agent, "yes").await;
        assert!(reply.complete);
        assert_eq!(agent.phase(), ConversationPhase::Complete);
        assert!(agent.profile().completed_at.is_some());

        let names = recommended_names(&reply.response, &data, Stream::Commerce);
        assert_eq!(names.len(), 3);
        for name in &names {
            assert!(validate_alignment(name, Stream::Commerce, &data));
        }
        assert!(reply.response.contains("certified human career counselor"));
        assert_eq!(reply.response.matches("**1. ").count(), 1);
        assert_eq!(reply.response.matches("**3. ").count(), 1);
        assert_eq!(reply.response.matches("**4. ").count(), 0);
    }

    #[tokio::test]
    async fn no_then_invalid_stream_stays_in_confirmation() {
        let mut agent = agent();
        answer_general(&mut agent, COMMERCE_ANSWER).await;

        let reply = agent.process_input("no").await;
        assert_eq!(agent.phase(), ConversationPhase::StreamConfirmation);
        assert!(reply.response.contains("specify your stream"));

        let reply = agent.process_input("xyz").await;
        assert_eq!(agent.phase(), ConversationPhase::StreamConfirmation);
        assert!(reply.response.starts_with("Invalid stream"));
        assert_eq!(agent.profile().stream, None);

        // "yes" no longer refers to a pending detection
        let reply = agent.process_input("yes").await;
        assert!(reply.response.contains("specify your stream"));
        assert_eq!(agent.phase(), ConversationPhase::StreamConfirmation);
        assert_eq!(agent.profile().stream, None);

        agent.process_input("arts").await;
        assert_eq!(agent.profile().stream, Some(Stream::Arts));
        assert_eq!(agent.phase(), ConversationPhase::StreamQuestions);
    }

    #[tokio::test]
    async fn ambiguous_answers_ask_for_stream_name() {
        let mut agent = agent();
        let reply = answer_general(&mut agent, "music").await;
        assert_eq!(agent.phase(), ConversationPhase::StreamConfirmation);
        assert_eq!(agent.detected_stream(), None);
        assert!(reply.response.contains("specify your stream"));

        // bare yes with nothing detected asks for the stream by name
        let reply = agent.process_input("yes").await;
        assert!(reply.response.contains("specify your stream"));
        assert!(!reply.response.starts_with("Invalid stream"));
        assert_eq!(agent.phase(), ConversationPhase::StreamConfirmation);

        agent.process_input("PCB").await;
        assert_eq!(agent.profile().stream, Some(Stream::Pcb));
    }

    #[tokio::test]
    async fn explicit_stream_overrides_detection() {
        let mut agent = agent();
        answer_general(&mut agent, COMMERCE_ANSWER).await;
        agent.process_input("Vocational").await;
        assert_eq!(agent.profile().stream, Some(Stream::Vocational));
    }

    #[tokio::test]
    async fn empty_input_changes_nothing() {
        let mut agent = agent();
        agent.process_input("hi").await;
        let before_profile = agent.profile().clone();
        let before_phase = agent.phase();

        let reply = agent.process_input("   ").await;
        assert_eq!(reply.response, "Please provide a valid answer.");
        assert!(!reply.complete);
        assert_eq!(agent.phase(), before_phase);
        assert_eq!(agent.profile(), &before_profile);
    }

    #[tokio::test]
    async fn complete_conversation_rejects_further_input() {
        let mut agent = agent();
        answer_general(&mut agent, COMMERCE_ANSWER).await;
        agent.process_input("yes").await;
        answer_stream(&mut agent, "high").await;
        let profile = agent.profile().clone();

        let reply = agent.process_input("more please").await;
        assert!(reply.complete);
        assert!(reply.response.starts_with("Conversation is complete"));
        assert_eq!(agent.profile(), &profile);

        let reply = agent.process_input("").await;
        assert!(reply.complete);
    }

    #[tokio::test]
    async fn visited_phases_follow_canonical_order() {
        use ConversationPhase::*;
        let canonical = [
            Welcome,
            GeneralQuestions,
            StreamConfirmation,
            StreamQuestions,
            Recommendations,
            Complete,
        ];

        let mut agent = agent();
        answer_general(&mut agent, COMMERCE_ANSWER).await;
        agent.process_input("no").await;
        agent.process_input("xyz").await;
        agent.process_input("commerce").await;
        answer_stream(&mut agent, "ok").await;

        assert_eq!(agent.visited_phases(), &canonical);
    }

    #[tokio::test]
    async fn stream_without_questions_skips_to_recommendations() {
        let json = minimal_json(
            r#"[{"id": "favourite_subjects", "text_en": "Favourite subjects?"},
                {"id": "interests", "text_en": "Interests?"}]"#,
            "{}",
        );
        let data = Arc::new(ReferenceData::from_json(&json).unwrap());
        let mut agent = unnumbered(data, None);

        agent.process_input("hi").await;
        agent.process_input("physics and mathematics").await;
        let reply = agent.process_input("engineering").await;
        assert!(reply.response.contains("PCM"));

        let reply = agent.process_input("yes").await;
        assert!(reply.complete);
        assert!(reply.response.contains("Mechanical Engineering"));
        assert_eq!(
            agent.visited_phases(),
            &[
                ConversationPhase::Welcome,
                ConversationPhase::GeneralQuestions,
                ConversationPhase::StreamConfirmation,
                ConversationPhase::Recommendations,
                ConversationPhase::Complete,
            ]
        );
    }

    #[tokio::test]
    async fn no_general_questions_goes_straight_to_stream() {
        let json = minimal_json("[]", "{}");
        let data = Arc::new(ReferenceData::from_json(&json).unwrap());
        let mut agent = unnumbered(data, None);

        let reply = agent.process_input("hi").await;
        assert_eq!(agent.phase(), ConversationPhase::StreamConfirmation);
        assert!(reply.response.starts_with("Hello!"));
        assert!(reply.response.contains("specify your stream"));
    }

    #[tokio::test]
    async fn reset_is_idempotent() {
        let mut agent = agent();
        answer_general(&mut agent, COMMERCE_ANSWER).await;
        agent.process_input("yes").await;

        agent.reset();
        let once = (agent.profile().clone(), agent.state.clone());
        agent.reset();
        let twice = (agent.profile().clone(), agent.state.clone());

        assert_eq!(once, twice);
        assert_eq!(agent.phase(), ConversationPhase::Welcome);
        assert_eq!(agent.profile(), &StudentProfile::default());
        assert_eq!(agent.detected_stream(), None);
    }

    #[tokio::test]
    async fn detected_language_is_not_kept_on_reset() {
        let mut agent = agent();
        agent
            .process_input("नमस्कार, मला करिअर मार्गदर्शन हवे आहे")
            .await;
        assert_eq!(agent.language(), Language::Marathi);

        agent.reset();
        assert_eq!(agent.language(), Language::English);
    }

    #[tokio::test]
    async fn pinned_language_survives_reset_and_skips_detection() {
        let mut agent = agent();
        assert!(agent.set_language("mr"));
        agent.reset();
        assert_eq!(agent.language(), Language::Marathi);

        let reply = agent
            .process_input("Hello, I would like some help choosing a career please")
            .await;
        assert_eq!(agent.language(), Language::Marathi);
        assert!(reply.response.starts_with("(प्रश्न 1 / 9)"));
    }

    #[tokio::test]
    async fn unsupported_language_is_ignored() {
        let mut agent = agent();
        assert!(!agent.set_language("fr"));
        assert_eq!(agent.language(), Language::English);
        assert!(!agent.language_pinned);
    }

    #[tokio::test]
    async fn marathi_flow_uses_marathi_messages() {
        let data = bundled();
        let mut agent = unnumbered(Arc::clone(&data), None);
        agent.set_language("mr");

        let reply = answer_general(&mut agent, "मला जीवशास्त्र आणि वैद्यकीय क्षेत्र आवडते").await;
        assert_eq!(agent.detected_stream(), Some(Stream::Pcb));
        assert!(reply.response.contains("होय/नाही"));

        agent.process_input("होय").await;
        assert_eq!(agent.profile().stream, Some(Stream::Pcb));

        let reply = answer_stream(&mut agent, "हो").await;
        assert!(reply.complete);
        assert!(reply.response.contains("महत्वाचे"));
        assert_eq!(recommended_names(&reply.response, &data, Stream::Pcb).len(), 3);
    }

    #[tokio::test]
    async fn enrichment_justifications_reach_the_student() {
        let data = bundled();
        let llm = ScriptedLlm::new(Ok(
            r#"[{"name": "Digital Marketing", "justification": "You think like a marketer."},
                {"name": "Medical Doctor (MBBS)", "justification": "Wrong stream."}]"#,
        ));
        let mut agent = unnumbered(Arc::clone(&data), Some(llm.clone() as Arc<dyn LlmProvider>));

        answer_general(&mut agent, COMMERCE_ANSWER).await;
        agent.process_input("yes").await;
        let reply = answer_stream(&mut agent, "high").await;

        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        assert!(reply.response.contains("**1. Digital Marketing**"));
        assert!(reply.response.contains("You think like a marketer."));
        assert!(!reply.response.contains("MBBS"));
        assert_eq!(recommended_names(&reply.response, &data, Stream::Commerce).len(), 3);
    }

    #[tokio::test]
    async fn enrichment_failure_falls_back_to_rules() {
        let data = bundled();
        let llm = ScriptedLlm::new(Err(()));
        let mut agent = unnumbered(Arc::clone(&data), Some(llm.clone() as Arc<dyn LlmProvider>));

        answer_general(&mut agent, COMMERCE_ANSWER).await;
        agent.process_input("yes").await;
        let reply = answer_stream(&mut agent, "high").await;

        assert!(reply.complete);
        assert!(reply.response.contains("This career aligns with Commerce stream."));
        assert_eq!(recommended_names(&reply.response, &data, Stream::Commerce).len(), 3);

        // a later, healthy provider is used after reset
        llm.set_reply(Ok("not json at all"));
        agent.reset();
        answer_general(&mut agent, COMMERCE_ANSWER).await;
        agent.process_input("yes").await;
        let reply = answer_stream(&mut agent, "high").await;
        assert!(reply.complete);
        assert!(reply.response.contains("This career aligns with Commerce stream."));
    }

    #[tokio::test]
    async fn failed_recommendation_turn_can_be_retried() {
        let json = minimal_json(
            r#"[{"id": "interests", "text_en": "Interests?"}]"#,
            r#"{"PCM": [{"id": "math_aptitude", "text_en": "Math?"}]}"#,
        );
        let data = Arc::new(ReferenceData::from_json(&json).unwrap());
        let mut agent = unnumbered(Arc::clone(&data), None);

        agent.process_input("hi").await;
        agent.process_input("physics and mathematics").await;
        agent.process_input("yes").await;
        assert_eq!(agent.phase(), ConversationPhase::StreamQuestions);

        // Force the generation step to fail by clearing the confirmed stream.
        agent.profile.stream = None;
        let reply = agent.process_input("high").await;
        assert_eq!(reply.response, "Unexpected error. Please try again.");
        assert!(!reply.complete);
        assert_eq!(agent.phase(), ConversationPhase::StreamQuestions);
        assert_eq!(agent.state.stream_index, 0);
        assert!(agent.profile().stream_aptitude.is_empty());

        agent.profile.stream = Some(Stream::Pcm);
        let reply = agent.process_input("high").await;
        assert!(reply.complete);
        assert_eq!(agent.profile().aptitude("math_aptitude"), "high");
    }

    #[test]
    fn yes_no_detection() {
        for yes in ["yes", "Yes, that's right", "y", "होय", "हो बरोबर"] {
            assert!(is_affirmative(yes), "{yes}");
        }
        for no in ["no", "Nope", "n", "नाही", "नको"] {
            assert!(is_negative(no), "{no}");
        }
        assert!(!is_affirmative("yellow"));
        assert!(!is_negative("nothing else"));
    }
}
