use axum::{
    extract::{Path, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};

use hedwige_core::mail::MailDetail;

use crate::{
    error::ApiError,
    handlers::RequireSession,
    proxy::mail::{get_mail_content, list_recent_mail},
    state::AppState,
};

/// Number of list rows dropped because their metadata fetch failed.
pub const MAIL_FAILURES_HEADER: &str = "x-mail-failures";

/// GET /gmail - Most recent messages as `[{id, subject, date}]`.
pub async fn list_mail(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
) -> Result<Response, ApiError> {
    let listing = list_recent_mail(
        state.mail.as_ref(),
        &session,
        state.config.mail_list_limit,
        state.config.mail_fetch_concurrency,
    )
    .await?;

    let mut response = Json(listing.messages).into_response();
    if listing.failed > 0 {
        response
            .headers_mut()
            .insert(MAIL_FAILURES_HEADER, HeaderValue::from(listing.failed));
    }

    Ok(response)
}

/// GET /gmail/{id} - One message as `{id, subject, body}`.
pub async fn get_mail(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Path(id): Path<String>,
) -> Result<Json<MailDetail>, ApiError> {
    let detail = get_mail_content(state.mail.as_ref(), &session, &id).await?;
    Ok(Json(detail))
}
