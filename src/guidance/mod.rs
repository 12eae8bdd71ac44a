//! Career guidance: the conversation state machine and the stream-aligned
//! recommendation engine behind it.

pub mod alignment;
pub mod catalog;
pub mod classifier;
pub mod enrichment;
pub mod formatter;
pub mod language;
pub mod messages;
pub mod model;
pub mod orchestrator;
pub mod registry;
pub mod scoring;
pub mod state;

pub use alignment::{Alignment, check_alignment, validate_alignment};
pub use catalog::{CareerCatalogEntry, Question, ReferenceData};
pub use classifier::detect_stream;
pub use language::detect_language;
pub use model::{Language, Recommendation, Stream, StudentProfile};
pub use orchestrator::{AgentReply, CareerAgent};
pub use registry::SessionRegistry;
pub use scoring::{filter_careers, rank_careers};
pub use state::ConversationPhase;
