//! Rule-based recommendation formatting and the final response layout.

use super::catalog::{CareerCatalogEntry, ReferenceData};
use super::messages::{MessageId, render, text};
use super::model::{Language, Recommendation, Stream};

/// Wrap a catalog entry as a recommendation with the templated stream
/// justification.
pub fn format_recommendation(
    career: &CareerCatalogEntry,
    stream: Stream,
    language: Language,
    data: &ReferenceData,
) -> Recommendation {
    let justification = render(
        MessageId::StreamJustification,
        language,
        &[("stream", data.stream_name(stream, language))],
    );
    with_justification(career, justification)
}

/// Catalog fields plus a caller-supplied justification.
pub fn with_justification(career: &CareerCatalogEntry, justification: String) -> Recommendation {
    Recommendation {
        name: career.name.clone(),
        stream_justification: justification,
        pathway: career.pathway.clone(),
        entrance_exams: career.entrance_exams.clone(),
        skills: career.skills.clone(),
        risks: career.risks.clone(),
    }
}

/// Render the recommendation list as the closing message, disclaimer last.
pub fn format_response(recommendations: &[Recommendation], language: Language) -> String {
    let label = |id| text(id, language);
    let mut response = text(MessageId::RecommendationsHeader, language);
    response.push_str("\n\n");

    for (i, rec) in recommendations.iter().enumerate() {
        response.push_str(&format!("**{}. {}**\n\n", i + 1, rec.name));
        response.push_str(&format!(
            "**{}:** {}\n\n",
            label(MessageId::LabelJustification),
            rec.stream_justification
        ));
        response.push_str(&format!(
            "**{}:** {}\n\n",
            label(MessageId::LabelPathway),
            rec.pathway
        ));
        response.push_str(&format!(
            "**{}:** {}\n\n",
            label(MessageId::LabelExams),
            rec.entrance_exams.join(", ")
        ));
        response.push_str(&format!(
            "**{}:** {}\n\n",
            label(MessageId::LabelSkills),
            rec.skills.join(", ")
        ));
        response.push_str(&format!(
            "**{}:** {}\n\n",
            label(MessageId::LabelRisks),
            rec.risks
        ));
        response.push_str("---\n\n");
    }

    response.push('\n');
    response.push_str(&text(MessageId::Disclaimer, language));
    response
}
