//! AI facade: structured crop analysis, grounded summaries, speech, chat.
//!
//! Every analysis operation follows the same two-phase shape: a
//! schema-constrained primary call whose failure folds the whole result to
//! `None`, then a best-effort audio-synthesis call whose failure only clears
//! the `audio` field. Callers can rely on "analysis present implies audio may
//! still be absent" but never the reverse.

mod chat;
mod client;
mod facade;
pub mod schema;
pub mod template;
mod tts;
pub mod types;

pub use chat::ChatSession;
pub use client::{global, GenAiClient, GenAiClientBuilder};
pub use types::{
    encode_inline, AnalysisOutcome, AudioPayload, DailySummaryResult, PestAnalysisResult,
    SoilAnalysisResult, SourceCitation, SummaryOutcome,
};
