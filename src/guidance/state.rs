//! Conversation state machine: which phase the student is in and how far
//! through each question list they are.

use serde::{Deserialize, Serialize};

use super::model::Stream;
use crate::error::GuidanceError;

/// The phases of a guidance conversation.
///
/// Welcome → GeneralQuestions → StreamConfirmation → StreamQuestions →
/// Recommendations → Complete. StreamQuestions is skipped when the
/// confirmed stream has no stream-specific questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    #[default]
    Welcome,
    GeneralQuestions,
    StreamConfirmation,
    StreamQuestions,
    Recommendations,
    Complete,
}

impl ConversationPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: ConversationPhase) -> bool {
        use ConversationPhase::*;
        matches!(
            (self, target),
            (Welcome, GeneralQuestions)
                | (GeneralQuestions, StreamConfirmation)
                | (StreamConfirmation, StreamQuestions)
                | (StreamConfirmation, Recommendations)
                | (StreamQuestions, Recommendations)
                | (Recommendations, Complete)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl std::fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::GeneralQuestions => "general_questions",
            Self::StreamConfirmation => "stream_confirmation",
            Self::StreamQuestions => "stream_questions",
            Self::Recommendations => "recommendations",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// Mutable position of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub phase: ConversationPhase,
    /// Index of the next general question to ask.
    pub general_index: usize,
    /// Index of the next stream-specific question to ask.
    pub stream_index: usize,
    /// Stream proposed by the classifier, awaiting a yes/no. `None` while
    /// in StreamConfirmation means the next input is read as a stream name.
    pub detected_stream: Option<Stream>,
    /// Every phase entered since the last reset, in order.
    pub visited: Vec<ConversationPhase>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            phase: ConversationPhase::Welcome,
            general_index: 0,
            stream_index: 0,
            detected_stream: None,
            visited: vec![ConversationPhase::Welcome],
        }
    }
}

impl ConversationState {
    /// Move to `target`, rejecting anything the phase graph does not allow.
    pub fn transition(&mut self, target: ConversationPhase) -> Result<(), GuidanceError> {
        if !self.phase.can_transition_to(target) {
            return Err(GuidanceError::InvalidTransition {
                from: self.phase.to_string(),
                to: target.to_string(),
            });
        }
        self.phase = target;
        self.visited.push(target);
        Ok(())
    }

    /// Number of answers accepted in the current question phase.
    pub fn answered_in_phase(&self) -> usize {
        match self.phase {
            ConversationPhase::GeneralQuestions => self.general_index,
            ConversationPhase::StreamQuestions => self.stream_index,
            _ => 0,
        }
    }
}
