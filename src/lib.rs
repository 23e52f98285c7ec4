//! # cropsense
//!
//! Client-side integration layer for a plant-health/agronomy assistant. It
//! wraps two external HTTP services behind two independent facades: a
//! generative-AI API (image analysis, speech synthesis, grounded search
//! summaries, conversational chat) and an identity provider (email/password
//! and phone-number authentication).
//!
//! ## Overview
//!
//! Everything non-trivial is delegated to the providers; this crate marshals
//! requests, unmarshals responses, and maps provider error codes to a small
//! local taxonomy. There is no storage, no cache, no retry: each operation is
//! a single-shot async request.
//!
//! The two facades deliberately propagate failures differently:
//!
//! - **AI facade** ([`ai`]): never raises past its boundary. All failures fold
//!   into `None` fields of the returned outcome; callers distinguish "no
//!   analysis" from "analysis but no audio" by field, not by error signal.
//! - **Auth facade** ([`auth`]): raises a typed [`auth::AuthError`] carrying a
//!   closed set of local kinds, insulating callers from provider codes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cropsense::ai;
//!
//! #[tokio::main]
//! async fn main() -> cropsense::Result<()> {
//!     let client = ai::global()?;
//!     let outcome = client
//!         .analyze_pest(
//!             "<base64 image>",
//!             "image/jpeg",
//!             "Identify this pest and how to manage it.",
//!             "The pest is {name}. {description}. Prevention: {prevention}. Treatment: {treatment}.",
//!         )
//!         .await;
//!
//!     if let Some(analysis) = outcome.analysis {
//!         println!("{}: {}", analysis.name, analysis.description);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`ai`] | Crop analysis, grounded summaries, speech, chat session |
//! | [`auth`] | Account lifecycle and auth-state subscription |
//! | [`transport`] | Shared HTTP plumbing (key auth, correlation ids) |
//! | [`config`] | Keyring/env credential resolution and knobs |

pub mod ai;
pub mod auth;
pub mod config;
pub mod transport;

// Re-export main types for convenience
pub use ai::{
    AnalysisOutcome, AudioPayload, ChatSession, DailySummaryResult, GenAiClient,
    GenAiClientBuilder, PestAnalysisResult, SoilAnalysisResult, SourceCitation, SummaryOutcome,
};
pub use auth::{
    AuthClient, AuthClientBuilder, AuthError, AuthErrorKind, AuthenticatedUser,
    ChallengeVerifier, PhoneConfirmation, Subscription,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
