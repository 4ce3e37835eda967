use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::domain::config::ApiSecret;

pub const SECRET_HEADER: &str = "X-Relay-Secret";

/// Middleware to validate the X-Relay-Secret header
pub async fn validate_relay_secret(
    State(secret): State<ApiSecret>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Response {
    match headers.get(SECRET_HEADER) {
        Some(header_value) => match header_value.to_str() {
            Ok(provided_secret) if provided_secret == &*secret.0 => next.run(request).await,
            Ok(_) => {
                warn!("Invalid secret provided in {} header", SECRET_HEADER);
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            Err(_) => {
                warn!("{} header contains invalid UTF-8", SECRET_HEADER);
                (StatusCode::BAD_REQUEST, "Bad request").into_response()
            }
        },
        None => {
            warn!("{} header is missing", SECRET_HEADER);
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}
