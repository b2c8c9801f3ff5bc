use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};

use super::{AuthFlowState, Grant, Profile, Session, SessionId};

/// Length of generated session ids and OAuth state values.
///
/// 32 alphanumeric characters carry a little over 190 bits of entropy.
const TOKEN_LEN: usize = 32;

fn random_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Generate a cryptographically random session ID.
pub fn generate_session_id() -> SessionId {
    SessionId::new(random_token())
}

/// Generate a random state parameter for CSRF protection.
pub fn generate_state() -> String {
    random_token()
}

/// Check if a session has expired.
pub fn is_session_expired(session: &Session, now: DateTime<Utc>) -> bool {
    session.expires_at <= now
}

/// How long a consent round trip may take before its state is rejected.
pub const AUTH_FLOW_TTL: Duration = Duration::minutes(10);

/// Check if an auth flow is too old to be completed.
pub fn is_flow_stale(flow: &AuthFlowState, now: DateTime<Utc>) -> bool {
    flow.created_at + AUTH_FLOW_TTL <= now
}

/// Calculate session expiry from creation time and TTL.
pub fn calculate_expiry(created_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    created_at + ttl
}

/// Extract username from email if no name provided.
pub fn email_to_name(email: &str) -> String {
    match email.split('@').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "User".to_string(),
    }
}

/// Build a profile from raw provider claims, filling in a display name when
/// the provider did not send one.
pub fn build_profile(
    subject: String,
    name: Option<String>,
    email: Option<String>,
    photo_url: Option<String>,
) -> Profile {
    let email = email.unwrap_or_default();
    let display_name = name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email_to_name(&email));

    Profile {
        subject,
        display_name,
        email,
        photo_url: photo_url.filter(|p| !p.is_empty()),
    }
}

/// Assemble a fresh session record for a successful grant.
pub fn new_session(grant: Grant, now: DateTime<Utc>, ttl: Duration) -> Session {
    let Grant {
        profile,
        access_token,
        provider,
    } = grant;

    Session {
        id: generate_session_id(),
        user_id: profile.subject,
        display_name: profile.display_name,
        email: profile.email,
        photo_url: profile.photo_url,
        access_token,
        provider,
        created_at: now,
        expires_at: calculate_expiry(now, ttl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::auth::IdentityProvider;

    fn grant() -> Grant {
        Grant::new(
            build_profile(
                "108".to_string(),
                Some("Hermione Granger".to_string()),
                Some("hermione@hogwarts.uk".to_string()),
                Some("https://example.com/h.png".to_string()),
            ),
            "token-1",
        )
    }

    #[test]
    fn generate_session_id_produces_32_char_alphanumeric() {
        let id = generate_session_id();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generate_session_id_is_unique() {
        let ids: HashSet<SessionId> = (0..1_000).map(|_| generate_session_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn generate_state_produces_32_char_string() {
        let state = generate_state();
        assert_eq!(state.len(), 32);
    }

    #[test]
    fn is_session_expired_returns_false_for_future_expiry() {
        let now = Utc::now();
        let session = new_session(grant(), now, Duration::hours(1));
        assert!(!is_session_expired(&session, now));
    }

    #[test]
    fn is_session_expired_returns_true_for_past_expiry() {
        let now = Utc::now();
        let session = new_session(grant(), now - Duration::hours(2), Duration::hours(1));
        assert!(is_session_expired(&session, now));
    }

    #[test]
    fn is_session_expired_returns_true_at_exact_expiry() {
        let now = Utc::now();
        let session = new_session(grant(), now - Duration::hours(1), Duration::hours(1));
        assert!(is_session_expired(&session, now));
    }

    #[test]
    fn is_flow_stale_after_ttl() {
        let now = Utc::now();
        let flow = |age: Duration| AuthFlowState {
            pkce_verifier: "verifier".to_string(),
            provider: IdentityProvider::Google,
            created_at: now - age,
        };

        assert!(!is_flow_stale(&flow(Duration::minutes(9)), now));
        assert!(is_flow_stale(&flow(AUTH_FLOW_TTL), now));
    }

    #[test]
    fn calculate_expiry_adds_ttl_to_created_at() {
        let created = Utc::now();
        let ttl = Duration::days(7);
        let expiry = calculate_expiry(created, ttl);
        assert_eq!(expiry, created + ttl);
    }

    #[test]
    fn new_session_copies_profile_and_token() {
        let now = Utc::now();
        let session = new_session(grant(), now, Duration::days(7));

        assert_eq!(session.user_id, "108");
        assert_eq!(session.display_name, "Hermione Granger");
        assert_eq!(session.email, "hermione@hogwarts.uk");
        assert_eq!(session.access_token, "token-1");
        assert_eq!(session.expires_at, now + Duration::days(7));
    }

    #[test]
    fn build_profile_falls_back_to_email_local_part() {
        let profile = build_profile(
            "1".to_string(),
            None,
            Some("ron.weasley@hogwarts.uk".to_string()),
            Some(String::new()),
        );
        assert_eq!(profile.display_name, "ron.weasley");
        assert_eq!(profile.photo_url, None);
    }

    #[test]
    fn build_profile_without_name_or_email() {
        let profile = build_profile("1".to_string(), Some("  ".to_string()), None, None);
        assert_eq!(profile.display_name, "User");
        assert_eq!(profile.email, "");
    }

    #[test]
    fn email_to_name_extracts_username() {
        assert_eq!(email_to_name("john.doe@example.com"), "john.doe");
        assert_eq!(email_to_name("alice@test.org"), "alice");
    }

    #[test]
    fn email_to_name_handles_invalid_email() {
        assert_eq!(email_to_name("no-at-sign"), "no-at-sign");
        assert_eq!(email_to_name(""), "User");
    }
}
