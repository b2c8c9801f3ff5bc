//! Identity provider implementations.
//!
//! This module contains implementations of `IdentityProviderClient` for:
//! - Google (OIDC discovery, PKCE, ID token verification)
//! - Mock (with `mock` feature, offline development and tests)

mod google;
#[cfg(feature = "mock")]
mod mock;

pub use google::GoogleProvider;
#[cfg(feature = "mock")]
pub use mock::MockProvider;
