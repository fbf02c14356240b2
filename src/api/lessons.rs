use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use super::{proxy, require_param};
use crate::backend::{ForwardRequest, Shape};
use crate::error::AppError;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lesson))
        .route(
            "/{id}",
            get(get_lesson).put(update_lesson).delete(delete_lesson),
        )
        .route("/{id}/progress", get(get_progress).post(record_progress))
}

async fn create_lesson(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let request = ForwardRequest::post("/api/lessons")
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Lesson).await
}

async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("lesson id", &id)?;
    let request = ForwardRequest::get(format!("/api/lessons/{}", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Lesson).await
}

async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let id = require_param("lesson id", &id)?;
    let request = ForwardRequest::put(format!("/api/lessons/{}", id))
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Lesson).await
}

async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("lesson id", &id)?;
    let request = ForwardRequest::delete(format!("/api/lessons/{}", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Any).await
}

async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("lesson id", &id)?;
    let request =
        ForwardRequest::get(format!("/api/lessons/{}/progress", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Progress).await
}

async fn record_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let id = require_param("lesson id", &id)?;
    let request = ForwardRequest::post(format!("/api/lessons/{}/progress", id))
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Progress).await
}
