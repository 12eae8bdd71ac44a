//! Keyword-based stream classification.
//!
//! Each stream has an English and a Marathi keyword list. A stream's score is
//! the number of its keywords found as substrings of the case-folded answers.
//! The strictly highest score wins; ties go to the stream listed first in
//! `Stream::ALL`. A winning score below `MIN_CONFIDENCE` is ambiguous, so a
//! single incidental keyword never assigns a stream.

use tracing::{debug, info, warn};

use super::model::Stream;

/// Minimum winning score for a confident classification.
pub const MIN_CONFIDENCE: usize = 2;

struct StreamKeywords {
    stream: Stream,
    en: &'static [&'static str],
    mr: &'static [&'static str],
}

const KEYWORDS: &[StreamKeywords] = &[
    StreamKeywords {
        stream: Stream::Pcm,
        en: &["physics", "chemistry", "mathematics", "math", "pcm", "engineering", "tech"],
        mr: &["भौतिकशास्त्र", "रसायनशास्त्र", "गणित", "अभियांत्रिकी"],
    },
    StreamKeywords {
        stream: Stream::Pcb,
        en: &["biology", "bio", "medical", "medicine", "pcb", "healthcare", "doctor", "neet"],
        mr: &["जीवशास्त्र", "वैद्यकीय", "औषध", "डॉक्टर", "आरोग्य"],
    },
    StreamKeywords {
        stream: Stream::Commerce,
        en: &["commerce", "accounting", "accountancy", "business", "economics", "finance", "ca"],
        mr: &["वाणिज्य", "लेखा", "व्यवसाय", "अर्थशास्त्र", "वित्त"],
    },
    StreamKeywords {
        stream: Stream::Arts,
        en: &["arts", "humanities", "history", "psychology", "sociology", "literature", "political"],
        mr: &["कला", "मानवतावादी", "इतिहास", "मानसशास्त्र", "समाजशास्त्र", "साहित्य"],
    },
    StreamKeywords {
        stream: Stream::Vocational,
        en: &[
            "vocational", "skill", "trade", "technical", "certification", "diploma", "iti",
            "practical", "hands-on",
        ],
        mr: &["व्यावसायिक", "कौशल्य", "व्यापार", "तांत्रिक", "प्रमाणपत्र", "व्यावहारिक", "हाताने"],
    },
];

/// Per-stream keyword hit counts, in `Stream::ALL` order.
pub fn stream_scores(text: &str) -> Vec<(Stream, usize)> {
    let text = text.to_lowercase();
    KEYWORDS
        .iter()
        .map(|k| {
            let score = k
                .en
                .iter()
                .chain(k.mr.iter())
                .filter(|kw| text.contains(**kw))
                .count();
            (k.stream, score)
        })
        .collect()
}

/// Infer a stream from the student's subject and interest answers.
///
/// Returns `None` when nothing scores at least `MIN_CONFIDENCE`.
pub fn detect_stream(favourite_subjects: &str, weak_subjects: &str, interests: &str) -> Option<Stream> {
    let text = format!("{favourite_subjects} {weak_subjects} {interests}");
    let scores = stream_scores(&text);
    debug!(?scores, "Stream detection scores");

    // First maximum wins, so ties keep the canonical stream order.
    let (best, max_score) = scores
        .iter()
        .copied()
        .fold(None, |best: Option<(Stream, usize)>, (stream, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((stream, score)),
        })?;

    if max_score >= MIN_CONFIDENCE {
        info!(stream = %best, score = max_score, "Stream detected");
        Some(best)
    } else {
        warn!(
            score = max_score,
            "Stream detection confidence too low, asking explicitly"
        );
        None
    }
}
