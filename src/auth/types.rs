//! Boundary types for the auth facade.

use super::AuthError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Display name used when the provider record carries none.
pub const DEFAULT_DISPLAY_NAME: &str = "Farmer";

/// Identity handed to callers. Derived from the provider record with fallback
/// defaults, never re-read from the provider after signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub display_name: String,
    pub email: String,
}

/// Provider identity record tracked as the current session.
#[derive(Debug, Clone)]
pub(crate) struct SessionRecord {
    pub id_token: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl AuthenticatedUser {
    /// Login defaulting: missing display name becomes "Farmer", missing email
    /// becomes the empty string.
    pub(crate) fn from_record(record: &SessionRecord) -> Self {
        Self {
            display_name: record
                .display_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            email: record.email.clone().unwrap_or_default(),
        }
    }

    /// Subscription defaulting: as [`from_record`](Self::from_record), with the
    /// phone number as a further email fallback.
    pub(crate) fn from_session(record: &SessionRecord) -> Self {
        Self {
            display_name: record
                .display_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            email: record
                .email
                .clone()
                .or_else(|| record.phone_number.clone())
                .unwrap_or_default(),
        }
    }
}

/// Caller-supplied human-challenge verifier for phone sign-in.
///
/// Opaque to this layer: it produces a challenge token however it likes
/// (captcha widget, test stub) and this layer passes the token through.
#[async_trait]
pub trait ChallengeVerifier: Send + Sync {
    async fn verify(&self) -> Result<String, AuthError>;
}

pub(crate) type StateCallback = dyn Fn(Option<AuthenticatedUser>) + Send + Sync;
pub(crate) type SubscriberMap = Mutex<HashMap<u64, Arc<StateCallback>>>;

/// Handle for one auth-state subscription. Dropping it (or calling
/// [`unsubscribe`](Self::unsubscribe)) stops further callback invocations.
pub struct Subscription {
    pub(crate) registry: Weak<SubscriberMap>,
    pub(crate) id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut map) = registry.lock() {
                map.remove(&self.id);
            }
        }
    }
}
