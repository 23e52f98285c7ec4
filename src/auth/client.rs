use super::error::{map_code, AuthError, AuthOp};
use super::types::{
    AuthenticatedUser, ChallengeVerifier, SessionRecord, StateCallback, Subscription,
    SubscriberMap,
};
use crate::config;
use crate::transport::{HttpReply, HttpTransport};
use crate::{Error, ErrorContext, Result};
use once_cell::sync::OnceCell;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

/// Client for the identity provider.
///
/// Owns the tracked session (there is no push channel on a REST identity API,
/// so state transitions originate here) and the subscriber registry.
pub struct AuthClient {
    transport: HttpTransport,
    session: Mutex<Option<SessionRecord>>,
    subscribers: Arc<SubscriberMap>,
    next_subscriber_id: AtomicU64,
}

static GLOBAL: OnceCell<AuthClient> = OnceCell::new();

/// Process-wide client, constructed once from configuration and held for the
/// process lifetime.
pub fn global() -> Result<&'static AuthClient> {
    GLOBAL.get_or_try_init(|| AuthClientBuilder::new().build())
}

impl AuthClient {
    pub fn builder() -> AuthClientBuilder {
        AuthClientBuilder::new()
    }

    /// Create the account, then set the display name as a second step.
    ///
    /// Returns the supplied name/email directly rather than re-reading them
    /// from the provider, since both were just set.
    pub async fn signup(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> std::result::Result<AuthenticatedUser, AuthError> {
        let reply = self
            .call(
                "/v1/accounts:signUp",
                &json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
                AuthOp::Signup,
            )
            .await?;
        let id_token = token_of(&reply);

        self.call(
            "/v1/accounts:update",
            &json!({
                "idToken": id_token,
                "displayName": display_name,
                "returnSecureToken": false,
            }),
            AuthOp::Signup,
        )
        .await?;

        self.set_session(Some(SessionRecord {
            id_token,
            display_name: Some(display_name.to_string()),
            email: Some(email.to_string()),
            phone_number: None,
        }));

        Ok(AuthenticatedUser {
            display_name: display_name.to_string(),
            email: email.to_string(),
        })
    }

    /// Authenticate with email/password. Missing provider fields default to
    /// `"Farmer"` / `""`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<AuthenticatedUser, AuthError> {
        let reply = self
            .call(
                "/v1/accounts:signInWithPassword",
                &json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
                AuthOp::Login,
            )
            .await?;

        let record = SessionRecord {
            id_token: token_of(&reply),
            display_name: reply.body["displayName"].as_str().map(str::to_string),
            email: reply.body["email"].as_str().map(str::to_string),
            phone_number: reply.body["phoneNumber"].as_str().map(str::to_string),
        };
        let user = AuthenticatedUser::from_record(&record);
        self.set_session(Some(record));

        Ok(user)
    }

    /// Terminate the current session and notify subscribers with `None`.
    pub fn logout(&self) {
        self.set_session(None);
    }

    /// Request a password-reset message be sent to `email`.
    pub async fn reset_password(&self, email: &str) -> std::result::Result<(), AuthError> {
        self.call(
            "/v1/accounts:sendOobCode",
            &json!({
                "requestType": "PASSWORD_RESET",
                "email": email,
            }),
            AuthOp::Reset,
        )
        .await?;
        Ok(())
    }

    /// Initiate phone-based verification. The verifier solves the human
    /// challenge; the returned handle completes the flow with the received code.
    pub async fn sign_in_with_phone_number<'a>(
        &'a self,
        phone_number: &str,
        verifier: &dyn ChallengeVerifier,
    ) -> std::result::Result<PhoneConfirmation<'a>, AuthError> {
        let challenge_token = verifier.verify().await?;

        let reply = self
            .call(
                "/v1/accounts:sendVerificationCode",
                &json!({
                    "phoneNumber": phone_number,
                    "recaptchaToken": challenge_token,
                }),
                AuthOp::Phone,
            )
            .await?;

        let session_info = reply.body["sessionInfo"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(PhoneConfirmation {
            client: self,
            session_info,
        })
    }

    /// Subscribe to session-state transitions. The callback fires immediately
    /// with the current state, then on every transition until the returned
    /// handle is dropped or unsubscribed.
    pub fn on_auth_state_changed<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<AuthenticatedUser>) + Send + Sync + 'static,
    {
        let callback: Arc<StateCallback> = Arc::new(callback);
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);

        callback(self.current_user());
        self.subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .insert(id, callback);

        Subscription {
            registry: Arc::downgrade(&self.subscribers),
            id,
        }
    }

    /// Snapshot of the signed-in user, if any (subscription defaulting rules).
    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        self.session
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .map(AuthenticatedUser::from_session)
    }

    /// Bearer token of the current session, for callers that talk to other
    /// first-party services.
    pub fn current_id_token(&self) -> Option<String> {
        self.session
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .map(|record| record.id_token.clone())
    }

    fn set_session(&self, record: Option<SessionRecord>) {
        let user = record.as_ref().map(AuthenticatedUser::from_session);
        *self.session.lock().expect("session lock poisoned") = record;

        // Snapshot callbacks so a subscriber may unsubscribe from within.
        let callbacks: Vec<Arc<StateCallback>> = self
            .subscribers
            .lock()
            .expect("subscriber registry poisoned")
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(user.clone());
        }
    }

    async fn call(
        &self,
        path: &str,
        body: &serde_json::Value,
        op: AuthOp,
    ) -> std::result::Result<HttpReply, AuthError> {
        let reply = self
            .transport
            .post_json(path, body)
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;

        if !reply.is_success() {
            return Err(provider_error(op, &reply));
        }
        Ok(reply)
    }
}

fn token_of(reply: &HttpReply) -> String {
    reply.body["idToken"].as_str().unwrap_or_default().to_string()
}

fn provider_error(op: AuthOp, reply: &HttpReply) -> AuthError {
    let code = reply.body["error"]["code"]
        .as_str()
        .unwrap_or("auth/internal-error");
    let message = reply.body["error"]["message"].as_str().unwrap_or_default();
    map_code(op, code, message)
}

/// Opaque handle for an in-progress phone-verification challenge.
pub struct PhoneConfirmation<'a> {
    client: &'a AuthClient,
    session_info: String,
}

impl PhoneConfirmation<'_> {
    /// Complete the challenge with the code the user received.
    pub async fn confirm(
        self,
        code: &str,
    ) -> std::result::Result<AuthenticatedUser, AuthError> {
        let reply = self
            .client
            .call(
                "/v1/accounts:signInWithPhoneNumber",
                &json!({
                    "sessionInfo": self.session_info,
                    "code": code,
                }),
                AuthOp::Phone,
            )
            .await?;

        let record = SessionRecord {
            id_token: token_of(&reply),
            display_name: reply.body["displayName"].as_str().map(str::to_string),
            email: reply.body["email"].as_str().map(str::to_string),
            phone_number: reply.body["phoneNumber"].as_str().map(str::to_string),
        };
        let user = AuthenticatedUser::from_session(&record);
        self.client.set_session(Some(record));

        Ok(user)
    }
}

/// Builder for [`AuthClient`].
pub struct AuthClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl AuthClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the provider base URL (primarily for testing with mock servers).
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<AuthClient> {
        let api_key = self
            .api_key
            .or_else(|| config::resolve_api_key("auth"))
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key required",
                    ErrorContext::new().with_field_path("config.api_key"),
                )
            })?;
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let transport = HttpTransport::new(base_url, api_key)?;

        Ok(AuthClient {
            transport,
            session: Mutex::new(None),
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_subscriber_id: AtomicU64::new(0),
        })
    }
}

impl Default for AuthClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
