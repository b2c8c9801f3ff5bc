//! SQLite session storage implementation.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

use hedwige_core::auth::{
    AuthError, AuthFlowState, IdentityProvider, Result, Session, SessionId, SessionRepository,
    AUTH_FLOW_TTL,
};

type SessionRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    String,
    String,
);

/// SQLite-backed session storage.
///
/// Timestamps are stored as fixed-width UTC RFC 3339 text so they compare
/// lexicographically. Expired sessions and stale flows are purged on insert.
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Runs database migrations to create required tables.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                display_name TEXT NOT NULL,
                email TEXT NOT NULL,
                photo_url TEXT,
                access_token TEXT NOT NULL,
                provider TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);

            CREATE TABLE IF NOT EXISTS auth_flows (
                state TEXT PRIMARY KEY,
                pkce_verifier TEXT NOT NULL,
                provider TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_auth_flows_created_at ON auth_flows(created_at);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(())
    }
}

fn storage(e: impl std::fmt::Display) -> AuthError {
    AuthError::Storage(e.to_string())
}

fn parse_provider(provider: &str) -> Result<IdentityProvider> {
    provider.parse().map_err(AuthError::Storage)
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(storage)?
        .with_timezone(&Utc))
}

fn session_from_row(row: SessionRow) -> Result<Session> {
    let (
        id,
        user_id,
        display_name,
        email,
        photo_url,
        access_token,
        provider,
        created_at,
        expires_at,
    ) = row;

    Ok(Session {
        id: SessionId::new(id),
        user_id,
        display_name,
        email,
        photo_url,
        access_token,
        provider: parse_provider(&provider)?,
        created_at: parse_timestamp(&created_at)?,
        expires_at: parse_timestamp(&expires_at)?,
    })
}

#[async_trait]
impl SessionRepository for SqliteSessionStore {
    async fn create_session(&self, session: &Session) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(timestamp(Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        sqlx::query(
            "INSERT INTO sessions (id, user_id, display_name, email, photo_url, access_token, provider, created_at, expires_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(session.id.as_str())
        .bind(&session.user_id)
        .bind(&session.display_name)
        .bind(&session.email)
        .bind(&session.photo_url)
        .bind(&session.access_token)
        .bind(session.provider.to_string())
        .bind(timestamp(session.created_at))
        .bind(timestamp(session.expires_at))
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT id, user_id, display_name, email, photo_url, access_token, provider, created_at, expires_at FROM sessions WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(session_from_row).transpose()
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(())
    }

    async fn store_auth_flow(&self, state: &str, flow: &AuthFlowState) -> Result<()> {
        sqlx::query("DELETE FROM auth_flows WHERE created_at <= ?")
            .bind(timestamp(Utc::now() - AUTH_FLOW_TTL))
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        sqlx::query(
            "INSERT OR REPLACE INTO auth_flows (state, pkce_verifier, provider, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(state)
        .bind(&flow.pkce_verifier)
        .bind(flow.provider.to_string())
        .bind(timestamp(flow.created_at))
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        Ok(())
    }

    async fn take_auth_flow(&self, state: &str) -> Result<Option<AuthFlowState>> {
        // SELECT and DELETE share a transaction so a state cannot be replayed.
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let row = sqlx::query_as::<_, (String, String, String)>(
            "SELECT pkce_verifier, provider, created_at FROM auth_flows WHERE state = ?",
        )
        .bind(state)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?;

        if row.is_some() {
            sqlx::query("DELETE FROM auth_flows WHERE state = ?")
                .bind(state)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;

        row.map(|(pkce_verifier, provider, created_at)| {
            Ok(AuthFlowState {
                pkce_verifier,
                provider: parse_provider(&provider)?,
                created_at: parse_timestamp(&created_at)?,
            })
        })
        .transpose()
    }
}
