use std::sync::Arc;

use axum::extract::FromRef;

use hedwige_auth::AuthState;
use hedwige_core::upstream::{CalendarApi, MailApi};

use crate::config::Config;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub mail: Arc<dyn MailApi>,
    pub calendar: Arc<dyn CalendarApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        auth: AuthState,
        mail: Arc<dyn MailApi>,
        calendar: Arc<dyn CalendarApi>,
        config: Config,
    ) -> Self {
        Self {
            auth,
            mail,
            calendar,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
