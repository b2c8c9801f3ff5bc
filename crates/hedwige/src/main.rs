mod app;
mod config;
mod error;
mod google;
mod handlers;
mod proxy;
mod state;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hedwige_auth::{AuthConfig, AuthState};
use hedwige_core::auth::SessionRepository;

use crate::{
    app::create_app,
    config::Config,
    google::{http_client, CalendarClient, GmailClient},
    state::AppState,
};

/// Hedwige - Google sign-in with a read-only view of Gmail and Calendar
#[derive(Parser, Debug)]
#[command(name = "hedwige")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "5000", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hedwige=debug,hedwige_auth=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let auth_config = AuthConfig::from_env()?;

    let repository = session_repository(&config, &auth_config).await?;
    let auth = auth_state(repository, auth_config).await?;

    let client = http_client(config.upstream_timeout())?;
    let mail = Arc::new(GmailClient::new(client.clone())?);
    let calendar = Arc::new(CalendarClient::new(client)?);

    let state = AppState::new(auth, mail, calendar, config);
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// SQLite session store at `SQLITE_PATH`.
#[cfg(feature = "sqlite")]
async fn session_repository(
    config: &Config,
    _auth: &AuthConfig,
) -> Result<Arc<dyn SessionRepository>> {
    use hedwige_auth::SqliteSessionStore;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    let options = SqliteConnectOptions::new()
        .filename(&config.sqlite_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    let store = SqliteSessionStore::new(pool);
    store.migrate().await?;

    tracing::info!(path = %config.sqlite_path, "using SQLite session store");
    Ok(Arc::new(store))
}

/// Redis session store at `REDIS_URL`.
#[cfg(all(feature = "redis", not(feature = "sqlite")))]
async fn session_repository(
    config: &Config,
    auth: &AuthConfig,
) -> Result<Arc<dyn SessionRepository>> {
    use fred::prelude::*;
    use hedwige_auth::RedisSessionStore;

    let redis_config = fred::prelude::Config::from_url(&config.redis_url)?;
    let pool = Builder::from_config(redis_config).build_pool(4)?;
    pool.init().await?;

    tracing::info!("using Redis session store");
    Ok(Arc::new(RedisSessionStore::new(pool, auth.session_ttl)))
}

/// Process-local session store; sessions do not survive a restart.
#[cfg(not(any(feature = "sqlite", feature = "redis")))]
async fn session_repository(
    _config: &Config,
    _auth: &AuthConfig,
) -> Result<Arc<dyn SessionRepository>> {
    tracing::warn!("using in-memory session store");
    Ok(Arc::new(hedwige_auth::InMemorySessionStore::new()))
}

/// Auth state backed by the offline mock provider.
#[cfg(feature = "mock")]
async fn auth_state(
    repository: Arc<dyn SessionRepository>,
    config: AuthConfig,
) -> Result<AuthState> {
    let provider = hedwige_auth::MockProvider::new(config.callback_url()?);
    tracing::warn!("mock identity provider enabled, every login succeeds");
    Ok(AuthState::new(repository, config, Some(Arc::new(provider))))
}

/// Auth state backed by Google OIDC discovery.
#[cfg(not(feature = "mock"))]
async fn auth_state(
    repository: Arc<dyn SessionRepository>,
    config: AuthConfig,
) -> Result<AuthState> {
    Ok(AuthState::connect(repository, config).await?)
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
