//! Google OAuth and session management for hedwige.
//!
//! This crate provides:
//! - The OAuth2/OIDC authorization-code flow with Google (PKCE + CSRF state)
//! - `SessionManager` over pluggable session storage
//!   (in-memory, SQLite or Redis via feature flags)
//! - Axum extractors and the `/auth/*`, `/logout` and `/me` routes

mod config;
mod error;
mod extractors;
mod handlers;
mod manager;
mod providers;
mod sessions;
mod state;

pub use config::{AuthConfig, ProviderConfig};
pub use error::AuthError;
pub use extractors::CurrentSession;
pub use handlers::auth_routes;
pub use manager::SessionManager;
#[cfg(feature = "mock")]
pub use providers::MockProvider;
pub use providers::GoogleProvider;
#[cfg(feature = "redis")]
pub use sessions::RedisSessionStore;
#[cfg(feature = "sqlite")]
pub use sessions::SqliteSessionStore;
pub use sessions::InMemorySessionStore;
pub use state::AuthState;
