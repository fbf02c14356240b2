use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::Value;

use super::{proxy, require_param};
use crate::backend::{ForwardRequest, Shape};
use crate::error::AppError;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments).post(enroll))
        .route("/{id}", delete(withdraw))
}

async fn list_enrollments(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let request = ForwardRequest::get("/api/enrollments")
        .authorized_by(&headers)
        .with_query(query);
    proxy(&state, request, Shape::Enrollments).await
}

async fn enroll(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let request = ForwardRequest::post("/api/enrollments")
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Enrollment).await
}

async fn withdraw(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("enrollment id", &id)?;
    let request =
        ForwardRequest::delete(format!("/api/enrollments/{}", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Any).await
}
