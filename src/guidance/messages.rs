//! Localized message templates.
//!
//! Every user-facing string goes through `render()`: one lookup keyed by
//! message id and language, followed by `{placeholder}` substitution.

use super::model::Language;

/// Identifier of a user-facing message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageId {
    Welcome,
    EmptyInput,
    ConfirmStream,
    AskStream,
    InvalidStream,
    RecommendationsHeader,
    StreamJustification,
    Disclaimer,
    ConversationOver,
    UnexpectedError,
    QuestionNumber,
    LabelJustification,
    LabelPathway,
    LabelExams,
    LabelSkills,
    LabelRisks,
}

fn template(id: MessageId, language: Language) -> &'static str {
    use Language::*;
    use MessageId::*;
    match (id, language) {
        (Welcome, English) => {
            "Hello! I'm your career guidance assistant. I'll help you discover career options based on your academic stream and interests. Let's begin!"
        }
        (Welcome, Marathi) => {
            "नमस्कार! मी तुमचा करिअर मार्गदर्शन सहाय्यक आहे. मी तुम्हाला तुमच्या शैक्षणिक स्ट्रीम आणि आवडींवर आधारित करिअर शिफारसी देण्यात मदत करू. चला सुरू करूया!"
        }
        (EmptyInput, English) => "Please provide a valid answer.",
        (EmptyInput, Marathi) => "कृपया वैध उत्तर प्रदान करा.",
        (ConfirmStream, English) => {
            "Based on your answers, it appears you are in the {stream} stream. Is this correct? (Yes/No)"
        }
        (ConfirmStream, Marathi) => {
            "तुमच्या उत्तरांवर आधारित, तुम्ही {stream} स्ट्रीममध्ये असल्याचे दिसते. हे बरोबर आहे का? (होय/नाही)"
        }
        (AskStream, English) => "Please specify your stream (PCM/PCB/Commerce/Arts/Vocational)",
        (AskStream, Marathi) => "कृपया तुमचा स्ट्रीम स्पष्ट करा (PCM/PCB/Commerce/Arts/Vocational)",
        (InvalidStream, English) => {
            "Invalid stream. Please choose PCM, PCB, Commerce, Arts, or Vocational."
        }
        (InvalidStream, Marathi) => {
            "अवैध स्ट्रीम. कृपया PCM, PCB, Commerce, Arts किंवा Vocational निवडा."
        }
        (RecommendationsHeader, English) => {
            "**Based on your profile, here are 3 career recommendations:**"
        }
        (RecommendationsHeader, Marathi) => "तुमच्या प्रोफाइलवर आधारित, येथे 3 करिअर शिफारसी आहेत:",
        (StreamJustification, English) => "This career aligns with {stream} stream.",
        (StreamJustification, Marathi) => "ही करिअर {stream} स्ट्रीमशी संरेखित आहे.",
        (Disclaimer, English) => {
            "⚠️ **Important:** This guidance is indicative only. Please confirm your decision with a certified human career counselor."
        }
        (Disclaimer, Marathi) => {
            "⚠️ **महत्वाचे:** हे मार्गदर्शन केवळ सूचक आहे. कृपया तुमचा निर्णय प्रमाणित मानवी करिअर काउन्सेलरसोबत पुष्टी करा."
        }
        (ConversationOver, English) => {
            "Conversation is complete. To start again, please use the 'Restart' button."
        }
        (ConversationOver, Marathi) => {
            "संभाषण पूर्ण झाले आहे. पुन्हा सुरू करण्यासाठी, कृपया 'Restart' बटण वापरा."
        }
        (UnexpectedError, English) => "Unexpected error. Please try again.",
        (UnexpectedError, Marathi) => "अनपेक्षित त्रुटी. कृपया पुन्हा प्रयत्न करा.",
        (QuestionNumber, English) => "(Question {n} of {total})",
        (QuestionNumber, Marathi) => "(प्रश्न {n} / {total})",
        (LabelJustification, English) => "Stream Justification",
        (LabelJustification, Marathi) => "स्ट्रीम औचित्य",
        (LabelPathway, English) => "Education Pathway",
        (LabelPathway, Marathi) => "शैक्षणिक मार्ग",
        (LabelExams, English) => "Entrance Exams",
        (LabelExams, Marathi) => "प्रवेश परीक्षा",
        (LabelSkills, English) => "Required Skills",
        (LabelSkills, Marathi) => "आवश्यक कौशल्ये",
        (LabelRisks, English) => "Risks/Limitations",
        (LabelRisks, Marathi) => "जोखीम/मर्यादा",
    }
}

/// Render a message in `language`, substituting `{key}` placeholders.
pub fn render(id: MessageId, language: Language, args: &[(&str, &str)]) -> String {
    let mut text = template(id, language).to_string();
    for (key, value) in args {
        text = text.replace(&format!("{{{key}}}"), value);
    }
    text
}

/// Render a message that takes no arguments.
pub fn text(id: MessageId, language: Language) -> String {
    render(id, language, &[])
}
