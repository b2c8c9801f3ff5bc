mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{
    build_profile, calculate_expiry, email_to_name, generate_session_id, generate_state,
    is_flow_stale, is_session_expired, new_session, AUTH_FLOW_TTL,
};
pub use traits::{IdentityProviderClient, Result, SessionRepository};
pub use types::{AuthFlowState, Grant, IdentityProvider, MeView, Profile, Session, SessionId};
