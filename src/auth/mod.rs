//! Auth facade: account lifecycle against the identity provider.
//!
//! Unlike the AI facade, failures here are surfaced as typed [`AuthError`]
//! values; callers map the [`AuthErrorKind`] to a user-facing message. Unknown
//! provider codes still raise, carrying the raw code for diagnostics rather
//! than being silently swallowed.

mod client;
mod error;
pub mod types;

pub use client::{global, AuthClient, AuthClientBuilder, PhoneConfirmation};
pub use error::{AuthError, AuthErrorKind};
pub use types::{AuthenticatedUser, ChallengeVerifier, Subscription, DEFAULT_DISPLAY_NAME};
