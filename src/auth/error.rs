//! Auth error taxonomy.
//!
//! Provider error codes are mapped to a closed set of local kinds through
//! declarative per-operation tables. The tables are per operation on purpose:
//! "user not found" means different things in login and in password reset.

use thiserror::Error;

/// Local error kinds surfaced to callers. `Default` covers unrecognized
/// provider codes; the raw code stays on the error for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    EmailInUse,
    InvalidEmail,
    WeakPassword,
    OperationNotAllowed,
    NetworkFailed,
    InvalidCredential,
    UserNotFound,
    Default,
}

/// Typed auth failure: local kind plus the provider's original code/message.
#[derive(Debug, Clone, Error)]
#[error("auth error {kind:?} ({code}): {message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub(crate) fn network(message: impl Into<String>) -> Self {
        Self {
            kind: AuthErrorKind::NetworkFailed,
            code: "auth/network-request-failed".to_string(),
            message: message.into(),
        }
    }
}

/// Operation whose mapping table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthOp {
    Signup,
    Login,
    Reset,
    Phone,
}

const SIGNUP_CODES: &[(&str, AuthErrorKind)] = &[
    ("auth/email-already-in-use", AuthErrorKind::EmailInUse),
    ("auth/invalid-email", AuthErrorKind::InvalidEmail),
    ("auth/weak-password", AuthErrorKind::WeakPassword),
    ("auth/operation-not-allowed", AuthErrorKind::OperationNotAllowed),
    ("auth/network-request-failed", AuthErrorKind::NetworkFailed),
];

// The provider intentionally avoids distinguishing missing users from bad
// passwords; all three codes collapse to InvalidCredential.
const LOGIN_CODES: &[(&str, AuthErrorKind)] = &[
    ("auth/user-not-found", AuthErrorKind::InvalidCredential),
    ("auth/wrong-password", AuthErrorKind::InvalidCredential),
    ("auth/invalid-credential", AuthErrorKind::InvalidCredential),
    ("auth/operation-not-allowed", AuthErrorKind::OperationNotAllowed),
    ("auth/network-request-failed", AuthErrorKind::NetworkFailed),
];

const RESET_CODES: &[(&str, AuthErrorKind)] =
    &[("auth/user-not-found", AuthErrorKind::UserNotFound)];

const PHONE_CODES: &[(&str, AuthErrorKind)] = &[
    ("auth/invalid-phone-number", AuthErrorKind::InvalidCredential),
    ("auth/network-request-failed", AuthErrorKind::NetworkFailed),
];

fn table_for(op: AuthOp) -> &'static [(&'static str, AuthErrorKind)] {
    match op {
        AuthOp::Signup => SIGNUP_CODES,
        AuthOp::Login => LOGIN_CODES,
        AuthOp::Reset => RESET_CODES,
        AuthOp::Phone => PHONE_CODES,
    }
}

/// Map a provider code into the operation's local kind. Unmapped codes fall
/// through to `Default`, preserving the raw code.
pub(crate) fn map_code(op: AuthOp, code: &str, message: &str) -> AuthError {
    let kind = table_for(op)
        .iter()
        .find(|(provider_code, _)| *provider_code == code)
        .map(|(_, kind)| *kind)
        .unwrap_or(AuthErrorKind::Default);

    AuthError {
        kind,
        code: code.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_email_in_use() {
        let err = map_code(AuthOp::Signup, "auth/email-already-in-use", "exists");
        assert_eq!(err.kind, AuthErrorKind::EmailInUse);
    }

    #[test]
    fn test_unmapped_code_falls_through_with_raw_code() {
        let err = map_code(AuthOp::Signup, "auth/foo", "mystery");
        assert_eq!(err.kind, AuthErrorKind::Default);
        assert!(err.code.contains("foo"));
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_login_collapses_credential_codes() {
        for code in [
            "auth/user-not-found",
            "auth/wrong-password",
            "auth/invalid-credential",
        ] {
            let err = map_code(AuthOp::Login, code, "denied");
            assert_eq!(err.kind, AuthErrorKind::InvalidCredential, "code {code}");
        }
    }

    #[test]
    fn test_user_not_found_differs_per_operation() {
        let login = map_code(AuthOp::Login, "auth/user-not-found", "denied");
        let reset = map_code(AuthOp::Reset, "auth/user-not-found", "no account");
        assert_eq!(login.kind, AuthErrorKind::InvalidCredential);
        assert_eq!(reset.kind, AuthErrorKind::UserNotFound);
    }
}
