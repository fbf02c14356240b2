use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use super::{proxy, require_param};
use crate::backend::{ForwardRequest, Shape};
use crate::error::AppError;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(current_user))
        .route("/{id}", get(get_user))
        .route("/{id}/courses", get(user_courses))
        .route("/{id}/enrollments", get(user_enrollments))
}

async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let request = ForwardRequest::get("/api/users/me").authorized_by(&headers);
    proxy(&state, request, Shape::User).await
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("user id", &id)?;
    let request = ForwardRequest::get(format!("/api/users/{}", id)).authorized_by(&headers);
    proxy(&state, request, Shape::User).await
}

/// Courses the user teaches.
async fn user_courses(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("user id", &id)?;
    let request =
        ForwardRequest::get(format!("/api/users/{}/courses", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Courses).await
}

async fn user_enrollments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("user id", &id)?;
    let request =
        ForwardRequest::get(format!("/api/users/{}/enrollments", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Enrollments).await
}
