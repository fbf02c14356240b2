mod auth;
mod courses;
mod enrollments;
mod lessons;
mod organisations;
mod uploads;
mod users;

use axum::Router;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::backend::{ForwardRequest, Shape};
use crate::error::AppError;
use crate::state::AppState;

/// Every proxy route, relative to `/api`.
pub fn router() -> Router<AppState> {
    let organisations = organisations::router();

    Router::new()
        .nest("/auth", auth::router())
        .nest("/courses", courses::router())
        .nest("/lessons", lessons::router())
        .nest("/enrollments", enrollments::router())
        .nest("/organisations", organisations.clone())
        .nest("/organizations", organisations)
        .nest("/users", users::router())
        .nest("/uploads", uploads::router())
}

/// Relays `request` and hands the backend's answer back verbatim.
/// Successful bodies must decode as `shape` before they are relayed.
async fn proxy(state: &AppState, request: ForwardRequest, shape: Shape) -> Result<Response, AppError> {
    let method = request.method.clone();
    let target = request.target();

    let upstream = state.backend.forward(request).await?;
    if upstream.status.is_success() {
        shape.validate(&upstream.body)?;
    }

    info!("{} {} -> {}", method, target, upstream.status);
    Ok(upstream.into_response())
}

/// Rejects blank path parameters, including the `undefined`/`null` strings browsers send
/// when a client forgot to fill one in, and percent-encodes the rest.
fn require_param(name: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "undefined" || trimmed == "null" {
        return Err(AppError::BadRequest(format!("{} is required", name)));
    }
    Ok(urlencoding::encode(trimmed).into_owned())
}
