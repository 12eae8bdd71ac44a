//! LLM enrichment of recommendation justifications.
//!
//! The model only ever sees catalog entries that already passed scoring. It
//! picks and explains; it never adds careers. Every name it returns is
//! matched back to a supplied entry and re-checked for stream alignment, so
//! a hallucinated or cross-stream career can not reach the student.

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::alignment::validate_alignment;
use super::catalog::{CareerCatalogEntry, ReferenceData};
use super::formatter::{format_recommendation, with_justification};
use super::model::{Language, Recommendation, Stream, StudentProfile};
use super::scoring::RECOMMENDATION_COUNT;
use crate::error::LlmError;
use crate::llm::LlmSession;

const SYSTEM_PROMPT: &str = "You are a careful career counselor for Indian students who have just \
finished 12th grade. You only recommend careers from the list you are given and you never \
suggest careers outside the student's stream.";

#[derive(Debug, Deserialize)]
struct EnrichedCareer {
    name: String,
    #[serde(default, alias = "stream_justification")]
    justification: String,
}

/// Build the enrichment prompt for a set of pre-filtered candidates.
pub fn build_prompt(
    profile: &StudentProfile,
    stream: Stream,
    candidates: &[&CareerCatalogEntry],
    language: Language,
) -> String {
    let list = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {} ({})", i + 1, c.name, c.pathway))
        .collect::<Vec<_>>()
        .join("\n");

    let reply_language = match language {
        Language::English => "English",
        Language::Marathi => "Marathi",
    };

    format!(
        "{summary}\n\n\
         The student is in the {stream} stream. Candidate careers, best match first:\n\
         {list}\n\n\
         Choose the {count} careers from this list that best fit the student. For each, \
         write a two-sentence justification in {reply_language} explaining how it fits \
         the student's interests, marks and stream.\n\n\
         Respond with ONLY a JSON array, no other text:\n\
         [{{\"name\": \"<career name exactly as listed>\", \"justification\": \"...\"}}]",
        summary = profile.summary(),
        count = RECOMMENDATION_COUNT,
    )
}

/// Ask the LLM to justify the candidates, falling back to the rule-based
/// justification for any slot it does not fill.
///
/// Returns an error only when the call itself fails or nothing usable comes
/// back; the caller then uses the fully rule-based list.
pub async fn enrich(
    session: &mut LlmSession,
    profile: &StudentProfile,
    stream: Stream,
    candidates: &[&CareerCatalogEntry],
    language: Language,
    data: &ReferenceData,
) -> Result<Vec<Recommendation>, LlmError> {
    let prompt = build_prompt(profile, stream, candidates, language);
    let raw = session.generate(&prompt, Some(SYSTEM_PROMPT)).await?;

    let enriched = parse_enriched(&raw, session.model_name())?;
    let recommendations = reconcile(enriched, stream, candidates, language, data);

    info!(
        model = session.model_name(),
        count = recommendations.len(),
        "Recommendations enriched"
    );
    Ok(recommendations)
}

fn parse_enriched(raw: &str, model: &str) -> Result<Vec<EnrichedCareer>, LlmError> {
    let json = extract_json_array(raw);
    let parsed: Vec<EnrichedCareer> = serde_json::from_str(&json).map_err(|e| {
        warn!(error = %e, "Failed to parse enrichment response");
        LlmError::InvalidResponse {
            provider: model.to_string(),
            reason: format!("unparseable recommendation JSON: {e}"),
        }
    })?;

    if parsed.is_empty() {
        return Err(LlmError::InvalidResponse {
            provider: model.to_string(),
            reason: "empty recommendation list".into(),
        });
    }
    Ok(parsed)
}

/// Keep LLM picks that map onto a supplied, aligned candidate, then top up
/// from the candidates in ranked order.
fn reconcile(
    enriched: Vec<EnrichedCareer>,
    stream: Stream,
    candidates: &[&CareerCatalogEntry],
    language: Language,
    data: &ReferenceData,
) -> Vec<Recommendation> {
    let mut used: Vec<&CareerCatalogEntry> = Vec::new();
    let mut recommendations = Vec::with_capacity(RECOMMENDATION_COUNT);

    for item in enriched {
        if recommendations.len() >= RECOMMENDATION_COUNT {
            break;
        }
        let wanted = item.name.trim();
        let Some(career) = candidates
            .iter()
            .copied()
            .find(|c| c.name.eq_ignore_ascii_case(wanted))
        else {
            warn!(career = wanted, "LLM returned a career outside the candidate list, dropping");
            continue;
        };
        if used.iter().any(|u| std::ptr::eq(*u, career)) {
            continue;
        }
        if !validate_alignment(&career.name, stream, data) {
            continue;
        }
        let justification = item.justification.trim();
        let rec = if justification.is_empty() {
            format_recommendation(career, stream, language, data)
        } else {
            with_justification(career, justification.to_string())
        };
        used.push(career);
        recommendations.push(rec);
    }

    for &career in candidates {
        if recommendations.len() >= RECOMMENDATION_COUNT {
            break;
        }
        if used.iter().any(|u| std::ptr::eq(*u, career)) {
            continue;
        }
        debug!(career = %career.name, "Topping up with rule-based recommendation");
        used.push(career);
        recommendations.push(format_recommendation(career, stream, language, data));
    }

    recommendations
}

/// Pull a JSON array out of an LLM reply that may be wrapped in prose or a
/// markdown code fence.
fn extract_json_array(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.starts_with('[') {
        return trimmed.to_string();
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('[') {
                return inner.to_string();
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('['), trimmed.rfind(']')) {
        if end > start {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}
