//! Rule-based career scoring and top-3 selection.
//!
//! Each catalog entry in the confirmed stream collects points from three
//! independent buckets (interest keywords, marks band, stream aptitude).
//! Entries are stable-sorted by score so catalog order breaks ties.

use tracing::{debug, info};

use super::catalog::{CareerCatalogEntry, ReferenceData};
use super::model::{Stream, StudentProfile};

/// Number of recommendations shown to the student.
pub const RECOMMENDATION_COUNT: usize = 3;

const INTEREST_BONUS: f32 = 2.0;
const TOP_MARKS_BONUS: f32 = 1.0;
const UPPER_MID_MARKS_BONUS: f32 = 0.5;
const APTITUDE_BONUS: f32 = 1.5;

/// An interest cluster: if the student mentions any `interests` keyword,
/// careers whose name contains any `careers` keyword get the bonus.
struct InterestRule {
    interests: &'static [&'static str],
    careers: &'static [&'static str],
}

const INTEREST_RULES: &[InterestRule] = &[
    InterestRule {
        interests: &["tech", "technology", "innovation"],
        careers: &["engineering", "data"],
    },
    InterestRule {
        interests: &["medical", "health", "doctor"],
        careers: &["medical", "pharmacy", "biotechnology"],
    },
    InterestRule {
        interests: &["business", "finance", "money"],
        careers: &["business", "finance", "ca"],
    },
    InterestRule {
        interests: &["creative", "writing", "communication"],
        careers: &["journalism", "psychology"],
    },
];

/// Stream-specific aptitude question, the answers that count as high comfort,
/// and the careers that benefit.
struct AptitudeRule {
    question_id: &'static str,
    high_answers: &'static [&'static str],
    careers: &'static [&'static str],
}

fn aptitude_rule(stream: Stream) -> Option<AptitudeRule> {
    match stream {
        Stream::Pcm => Some(AptitudeRule {
            question_id: "math_aptitude",
            high_answers: &["high", "very high", "comfortable"],
            careers: &["engineering", "data"],
        }),
        Stream::Pcb => Some(AptitudeRule {
            question_id: "biology_interest",
            high_answers: &["high", "very high", "yes"],
            careers: &["medical", "biotechnology"],
        }),
        Stream::Commerce => Some(AptitudeRule {
            question_id: "accounting_aptitude",
            high_answers: &["high", "comfortable", "yes"],
            careers: &["ca", "accounting"],
        }),
        Stream::Arts => Some(AptitudeRule {
            question_id: "communication",
            high_answers: &["high", "strong", "yes"],
            careers: &["journalism", "law"],
        }),
        Stream::Vocational => None,
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// A catalog entry paired with its score.
#[derive(Debug, Clone)]
pub struct ScoredCareer<'a> {
    pub career: &'a CareerCatalogEntry,
    pub score: f32,
}

/// Score a single career for a student.
pub fn score_career(career: &CareerCatalogEntry, stream: Stream, profile: &StudentProfile) -> f32 {
    let career_name = career.name.to_lowercase();
    let interests = profile.interests.to_lowercase();
    let mut score = 0.0;

    for rule in INTEREST_RULES {
        if contains_any(&interests, rule.interests) && contains_any(&career_name, rule.careers) {
            score += INTEREST_BONUS;
        }
    }

    let marks = profile.marks_range.as_str();
    if marks.contains("80-90") || marks.contains("90+") {
        score += TOP_MARKS_BONUS;
    } else if marks.contains("70-80") {
        score += UPPER_MID_MARKS_BONUS;
    }

    if let Some(rule) = aptitude_rule(stream) {
        let answer = profile.aptitude(rule.question_id).trim().to_lowercase();
        if rule.high_answers.contains(&answer.as_str()) && contains_any(&career_name, rule.careers) {
            score += APTITUDE_BONUS;
        }
    }

    score
}

/// Score every career in the stream, best first. Equal scores keep catalog
/// order.
pub fn rank_careers<'a>(
    stream: Stream,
    profile: &StudentProfile,
    data: &'a ReferenceData,
) -> Vec<ScoredCareer<'a>> {
    let mut scored: Vec<ScoredCareer<'a>> = data
        .careers(stream)
        .iter()
        .map(|career| ScoredCareer {
            career,
            score: score_career(career, stream, profile),
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        scores = ?scored
            .iter()
            .map(|s| (s.career.name.as_str(), s.score))
            .collect::<Vec<_>>(),
        "Ranked careers"
    );
    scored
}

/// The top three careers for the student, filled from catalog order when
/// the stream has fewer ranked entries.
pub fn filter_careers<'a>(
    stream: Stream,
    profile: &StudentProfile,
    data: &'a ReferenceData,
) -> Vec<&'a CareerCatalogEntry> {
    let mut top: Vec<&CareerCatalogEntry> = rank_careers(stream, profile, data)
        .into_iter()
        .take(RECOMMENDATION_COUNT)
        .map(|s| s.career)
        .collect();

    for career in data.careers(stream) {
        if top.len() >= RECOMMENDATION_COUNT {
            break;
        }
        if !top.iter().any(|t| std::ptr::eq(*t, career)) {
            top.push(career);
        }
    }

    info!(
        %stream,
        careers = ?top.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        "Filtered careers"
    );
    top
}
