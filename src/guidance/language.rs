//! Language identification for the first user message.

use tracing::debug;
use whatlang::{Lang, Script};

use super::model::Language;

/// Classify free text as English or Marathi.
///
/// Marathi and Hindi share the Devanagari script and short Marathi phrases
/// are regularly identified as Hindi, so any Devanagari text is treated as
/// Marathi. Everything else, including text too short to classify, falls
/// back to English.
pub fn detect_language(text: &str) -> Language {
    let Some(info) = whatlang::detect(text) else {
        debug!("Language detection inconclusive, defaulting to English");
        return Language::English;
    };

    debug!(
        lang = ?info.lang(),
        script = ?info.script(),
        confidence = info.confidence(),
        "Language detected"
    );

    if info.lang() == Lang::Mar || info.script() == Script::Devanagari {
        Language::Marathi
    } else {
        Language::English
    }
}
