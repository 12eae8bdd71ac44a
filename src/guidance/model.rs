//! Student profile and recommendation data models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conversation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "mr")]
    Marathi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Marathi => "mr",
        }
    }

    /// Parse a language code ("en" / "mr"), case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::English),
            "mr" => Some(Self::Marathi),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Higher-secondary academic stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stream {
    #[serde(rename = "PCM")]
    Pcm,
    #[serde(rename = "PCB")]
    Pcb,
    Commerce,
    Arts,
    Vocational,
}

impl Stream {
    /// All streams in their canonical order. Classifier ties resolve to the
    /// earliest entry.
    pub const ALL: [Stream; 5] = [
        Stream::Pcm,
        Stream::Pcb,
        Stream::Commerce,
        Stream::Arts,
        Stream::Vocational,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Pcm => "PCM",
            Self::Pcb => "PCB",
            Self::Commerce => "Commerce",
            Self::Arts => "Arts",
            Self::Vocational => "Vocational",
        }
    }

    /// Case-insensitive exact match against the five stream codes.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.code().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Everything the conversation has learned about the student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub favourite_subjects: String,
    pub weak_subjects: String,
    pub marks_range: String,
    pub interests: String,
    /// Confirmed stream. Set once per session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<Stream>,
    /// Stream-specific question id → answer.
    pub stream_aptitude: BTreeMap<String, String>,
    pub personality_traits: String,
    pub budget_preference: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl StudentProfile {
    /// Store a general-question answer. Unknown ids are ignored and reported
    /// back as `false`.
    pub fn update(&mut self, field: &str, value: &str) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "favourite_subjects" => &mut self.favourite_subjects,
            "weak_subjects" => &mut self.weak_subjects,
            "marks_range" => &mut self.marks_range,
            "interests" => &mut self.interests,
            "personality_traits" => &mut self.personality_traits,
            "budget_preference" => &mut self.budget_preference,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    pub fn set_aptitude(&mut self, question_id: &str, answer: &str) {
        self.stream_aptitude
            .insert(question_id.to_string(), answer.to_string());
    }

    pub fn aptitude(&self, question_id: &str) -> &str {
        self.stream_aptitude
            .get(question_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Render the profile as a compact summary for LLM prompts.
    pub fn summary(&self) -> String {
        let mut parts = vec!["# Student Profile".to_string()];

        let fields = [
            ("Name", &self.name),
            ("Favourite subjects", &self.favourite_subjects),
            ("Weak subjects", &self.weak_subjects),
            ("Marks range", &self.marks_range),
            ("Interests", &self.interests),
            ("Personality", &self.personality_traits),
            ("Budget preference", &self.budget_preference),
        ];
        for (label, value) in fields {
            if !value.is_empty() {
                parts.push(format!("- **{label}:** {value}"));
            }
        }

        if let Some(stream) = self.stream {
            parts.push(format!("- **Stream:** {stream}"));
        }

        for (id, answer) in &self.stream_aptitude {
            parts.push(format!("- **{id}:** {answer}"));
        }

        parts.join("\n")
    }
}

/// A fully localized career recommendation, ready to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub stream_justification: String,
    pub pathway: String,
    pub entrance_exams: Vec<String>,
    pub skills: Vec<String>,
    pub risks: String,
}
