use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use hedwige_auth::auth_routes;

use crate::{
    handlers::{
        calendar::list_events,
        gmail::{get_mail, list_mail, MAIL_FAILURES_HEADER},
        health::livez,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // Only the configured frontend may call us, with cookies.
    let frontend_origin = state.auth.config.frontend_origin();
    let allow_origin = match HeaderValue::from_str(&frontend_origin) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            tracing::warn!(origin = %frontend_origin, "unusable frontend origin, CORS disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([HeaderName::from_static(MAIL_FAILURES_HEADER)]);

    let auth = auth_routes().with_state(state.auth.clone());
    let request_timeout = state.config.request_timeout();

    Router::new()
        .route("/livez", get(livez))
        .route("/gmail", get(list_mail))
        .route("/gmail/{id}", get(get_mail))
        .route("/calendar", get(list_events))
        .with_state(state)
        .merge(auth)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}
