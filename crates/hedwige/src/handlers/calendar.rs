use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::Value;

use crate::{
    error::ApiError, handlers::RequireSession, proxy::calendar::list_upcoming_events,
    state::AppState,
};

/// GET /calendar - Upcoming events, Calendar API payload shape.
pub async fn list_events(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
) -> Result<Json<Value>, ApiError> {
    let events = list_upcoming_events(state.calendar.as_ref(), &session, Utc::now()).await?;
    Ok(Json(events))
}
