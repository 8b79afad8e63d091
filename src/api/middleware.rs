//! Edge authentication middleware
//!
//! Guards routes that require a bearer token. On success the [`Principal`]
//! is inserted into the request extensions for downstream handlers; on
//! failure the request is answered with 401 and never reaches the handler.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::response::{ErrorBody, GENERIC_ERROR_MESSAGE};
use crate::auth::Principal;
use crate::AppState;

const REJECTION_MESSAGE: &str = "Invalid or expired token";

/// Middleware that authenticates the `Authorization: Bearer` header.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default().to_string());

    match state.edge.authenticate(header_value.as_deref()) {
        Ok(principal) => {
            tracing::debug!(subject = %principal.subject, "Authenticated request");
            request.extensions_mut().insert::<Principal>(principal);
            next.run(request).await
        }
        Err(rejection) if rejection.is_unauthenticated() => {
            tracing::debug!(reason = %rejection, path = %request.uri().path(), "Rejected bearer token");
            error_response(
                StatusCode::UNAUTHORIZED,
                REJECTION_MESSAGE,
                request.uri().path(),
            )
        }
        Err(rejection) => {
            tracing::error!(error = %rejection, "Edge verification failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_MESSAGE,
                request.uri().path(),
            )
        }
    }
}

/// Build an error response that includes the request path.
fn error_response(status: StatusCode, message: &str, path: &str) -> Response {
    let body = ErrorBody::new(status, message, Some(path.to_string()));
    if status == StatusCode::UNAUTHORIZED {
        (status, [(header::WWW_AUTHENTICATE, "Bearer")], Json(body)).into_response()
    } else {
        (status, Json(body)).into_response()
    }
}
