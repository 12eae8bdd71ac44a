//! Reference data: the per-stream career catalog and the question bank.
//!
//! Loaded once at startup and shared read-only across sessions behind an
//! `Arc`. The bundled `data/careers.json` is compiled into the binary; an
//! alternative file can be supplied at runtime.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::model::{Language, Stream};
use crate::error::CatalogError;

const BUNDLED_DATA: &str = include_str!("../../data/careers.json");

/// One career in a stream's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerCatalogEntry {
    pub name: String,
    pub pathway: String,
    pub entrance_exams: Vec<String>,
    pub skills: Vec<String>,
    pub risks: String,
}

/// A stream's display names and careers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamCatalog {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_mr: Option<String>,
    pub careers: Vec<CareerCatalogEntry>,
}

/// A question with per-language text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_mr: Option<String>,
}

impl Question {
    /// Text in the requested language, falling back to English.
    pub fn text(&self, language: Language) -> &str {
        match (language, &self.text_mr) {
            (Language::Marathi, Some(text)) => text,
            _ => &self.text_en,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    pub general: Vec<Question>,
    #[serde(default)]
    pub stream_specific: BTreeMap<Stream, Vec<Question>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceData {
    pub streams: BTreeMap<Stream, StreamCatalog>,
    pub questions: QuestionBank,
}

impl ReferenceData {
    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_DATA)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let data = Self::from_json(&json)?;
        info!(path = %path.display(), "Loaded reference data");
        Ok(data)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for stream in Stream::ALL {
            let catalog = self
                .streams
                .get(&stream)
                .ok_or_else(|| CatalogError::MissingStream {
                    stream: stream.to_string(),
                })?;
            if catalog.careers.is_empty() {
                return Err(CatalogError::EmptyStream {
                    stream: stream.to_string(),
                });
            }
        }

        let lists = std::iter::once(&self.questions.general)
            .chain(self.questions.stream_specific.values());
        for list in lists {
            let mut seen = HashSet::new();
            for question in list {
                if !seen.insert(question.id.as_str()) {
                    return Err(CatalogError::DuplicateQuestion {
                        id: question.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Careers registered under a stream, in catalog order.
    pub fn careers(&self, stream: Stream) -> &[CareerCatalogEntry] {
        self.streams
            .get(&stream)
            .map(|c| c.careers.as_slice())
            .unwrap_or(&[])
    }

    /// Display name of a stream, localized where a translation exists.
    pub fn stream_name(&self, stream: Stream, language: Language) -> &str {
        match self.streams.get(&stream) {
            Some(catalog) => match (language, &catalog.name_mr) {
                (Language::Marathi, Some(name)) => name.as_str(),
                _ => catalog.name.as_str(),
            },
            None => stream.code(),
        }
    }

    pub fn general_questions(&self) -> &[Question] {
        &self.questions.general
    }

    pub fn stream_questions(&self, stream: Stream) -> &[Question] {
        self.questions
            .stream_specific
            .get(&stream)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// General-question count plus the longest stream-specific list. Constant
    /// for the lifetime of the catalog, so it can be shown as "of N".
    pub fn total_questions(&self) -> usize {
        let longest_stream = self
            .questions
            .stream_specific
            .values()
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        self.questions.general.len() + longest_stream
    }
}
