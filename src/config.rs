//! Process-wide configuration resolved once at client construction.

use keyring::Entry;
use std::env;
use std::time::Duration;

/// Keyring service name under which credentials may be stored.
const KEYRING_SERVICE: &str = "cropsense";

/// Resolve a credential for the given provider slot.
///
/// Resolution order: OS keyring entry (`cropsense`/`<slot>`), then the
/// `<SLOT>_API_KEY` environment variable.
pub fn resolve_api_key(slot: &str) -> Option<String> {
    // 1. Try Keyring
    if let Ok(entry) = Entry::new(KEYRING_SERVICE, slot) {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }

    // 2. Try Environment Variable (SLOT_API_KEY)
    let env_var = format!("{}_API_KEY", slot.to_uppercase());
    env::var(env_var).ok()
}

/// HTTP timeout for both facades (env-overridable).
pub fn http_timeout() -> Duration {
    let secs = env::var("CROPSENSE_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(30);
    Duration::from_secs(secs)
}
