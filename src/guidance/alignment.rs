//! Stream alignment validation.
//!
//! Every career shown to a student must belong to their confirmed stream.
//! The stream's catalog is the allow-list: a name passes only if it matches a
//! catalog entry (substring in either direction, case-insensitive). Names
//! outside the catalog are rejected, and those hitting a forbidden
//! cross-stream keyword are logged as such.

use tracing::{debug, warn};

use super::catalog::ReferenceData;
use super::model::Stream;

/// Keywords that must never appear in a career recommended to a stream.
pub fn forbidden_keywords(stream: Stream) -> &'static [&'static str] {
    match stream {
        Stream::Arts => &[
            "engineering",
            "medical",
            "doctor",
            "mbbs",
            "neet",
            "jee",
            "ca",
            "chartered accountancy",
        ],
        Stream::Commerce => &[
            "medical",
            "doctor",
            "mbbs",
            "neet",
            "engineering",
            "jee",
            "core engineering",
        ],
        Stream::Pcm => &["medical", "doctor", "mbbs", "neet", "biology"],
        Stream::Pcb => &[
            "software engineer",
            "core engineering",
            "jee",
            "computer science engineering",
        ],
        Stream::Vocational => &["mbbs", "neet", "jee", "engineering degree", "medical degree"],
    }
}

/// Outcome of an alignment check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alignment {
    /// Matched this catalog entry.
    Aligned { matched: String },
    /// Contains a keyword forbidden for the stream.
    Forbidden { keyword: &'static str },
    /// Not in the stream's catalog.
    Unlisted,
}

impl Alignment {
    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned { .. })
    }
}

/// Classify a proposed career name against a stream.
pub fn check_alignment(career_name: &str, stream: Stream, data: &ReferenceData) -> Alignment {
    let career_lower = career_name.trim().to_lowercase();
    if career_lower.is_empty() {
        return Alignment::Unlisted;
    }

    for entry in data.careers(stream) {
        let entry_lower = entry.name.to_lowercase();
        if career_lower.contains(&entry_lower) || entry_lower.contains(&career_lower) {
            debug!(career = career_name, %stream, matched = %entry.name, "Career aligned");
            return Alignment::Aligned {
                matched: entry.name.clone(),
            };
        }
    }

    if let Some(keyword) = forbidden_keywords(stream)
        .iter()
        .find(|kw| career_lower.contains(**kw))
    {
        warn!(
            career = career_name,
            %stream,
            keyword = *keyword,
            "Blocked cross-stream recommendation"
        );
        return Alignment::Forbidden { keyword };
    }

    warn!(
        career = career_name,
        %stream,
        "Career not in stream catalog, rejecting"
    );
    Alignment::Unlisted
}

/// Whether a career may be recommended to a student in `stream`.
pub fn validate_alignment(career_name: &str, stream: Stream, data: &ReferenceData) -> bool {
    check_alignment(career_name, stream, data).is_aligned()
}
