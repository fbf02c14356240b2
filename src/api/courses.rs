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
        .route("/", get(list_courses).post(create_course))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/lessons", get(list_course_lessons))
        .route(
            "/{id}/instructors",
            get(list_instructors).post(add_instructor),
        )
        .route("/{id}/instructors/{user_id}", delete(remove_instructor))
        .route("/{id}/enrollment", get(enrollment_status))
}

async fn list_courses(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let request = ForwardRequest::get("/api/courses")
        .authorized_by(&headers)
        .with_query(query);
    proxy(&state, request, Shape::Courses).await
}

async fn create_course(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let request = ForwardRequest::post("/api/courses")
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Course).await
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("course id", &id)?;
    let request = ForwardRequest::get(format!("/api/courses/{}", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Course).await
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let id = require_param("course id", &id)?;
    let request = ForwardRequest::put(format!("/api/courses/{}", id))
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Course).await
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("course id", &id)?;
    let request = ForwardRequest::delete(format!("/api/courses/{}", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Any).await
}

async fn list_course_lessons(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("course id", &id)?;
    let request =
        ForwardRequest::get(format!("/api/courses/{}/lessons", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Lessons).await
}

async fn list_instructors(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("course id", &id)?;
    let request =
        ForwardRequest::get(format!("/api/courses/{}/instructors", id)).authorized_by(&headers);
    proxy(&state, request, Shape::Users).await
}

async fn add_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let id = require_param("course id", &id)?;
    let request = ForwardRequest::post(format!("/api/courses/{}/instructors", id))
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Any).await
}

async fn remove_instructor(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("course id", &id)?;
    let user_id = require_param("user id", &user_id)?;
    let request = ForwardRequest::delete(format!("/api/courses/{}/instructors/{}", id, user_id))
        .authorized_by(&headers);
    proxy(&state, request, Shape::Any).await
}

async fn enrollment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("course id", &id)?;
    let request =
        ForwardRequest::get(format!("/api/courses/{}/enrollment", id)).authorized_by(&headers);
    proxy(&state, request, Shape::EnrollmentStatus).await
}
