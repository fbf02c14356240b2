use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::Value;

use super::{proxy, require_param};
use crate::backend::{ForwardRequest, Shape};
use crate::error::AppError;
use crate::state::AppState;

/// Mounted under both `/organisations` and `/organizations`.
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_organisations).post(create_organisation))
        .route("/owned", get(owned_organisations))
        .route("/slug/{slug}", get(organisation_by_slug))
        .route(
            "/{id}",
            get(get_organisation)
                .put(update_organisation)
                .delete(delete_organisation),
        )
        .route("/{id}/courses", get(organisation_courses))
        .route("/{id}/members", get(list_members).post(add_member))
        .route(
            "/{id}/members/{user_id}",
            put(update_member).delete(remove_member),
        )
}

fn org_path(state: &AppState, rest: &str) -> String {
    format!("/api/{}{}", state.backend.org_segment(), rest)
}

async fn list_organisations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let request = ForwardRequest::get(org_path(&state, "")).authorized_by(&headers);
    proxy(&state, request, Shape::Organizations).await
}

async fn create_organisation(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let request = ForwardRequest::post(org_path(&state, ""))
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Organization).await
}

async fn owned_organisations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let request = ForwardRequest::get(org_path(&state, "/owned")).authorized_by(&headers);
    proxy(&state, request, Shape::Organizations).await
}

async fn organisation_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let slug = require_param("organization slug", &slug)?;
    let request = ForwardRequest::get(org_path(&state, &format!("/slug/{}", slug)))
        .authorized_by(&headers);
    proxy(&state, request, Shape::Organization).await
}

async fn get_organisation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("organization id", &id)?;
    let request =
        ForwardRequest::get(org_path(&state, &format!("/{}", id))).authorized_by(&headers);
    proxy(&state, request, Shape::Organization).await
}

async fn update_organisation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let id = require_param("organization id", &id)?;
    let request = ForwardRequest::put(org_path(&state, &format!("/{}", id)))
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Organization).await
}

async fn delete_organisation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("organization id", &id)?;
    let request =
        ForwardRequest::delete(org_path(&state, &format!("/{}", id))).authorized_by(&headers);
    proxy(&state, request, Shape::Any).await
}

async fn organisation_courses(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("organization id", &id)?;
    let request = ForwardRequest::get(org_path(&state, &format!("/{}/courses", id)))
        .authorized_by(&headers);
    proxy(&state, request, Shape::Courses).await
}

async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("organization id", &id)?;
    let request = ForwardRequest::get(org_path(&state, &format!("/{}/members", id)))
        .authorized_by(&headers);
    proxy(&state, request, Shape::Members).await
}

async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let id = require_param("organization id", &id)?;
    let request = ForwardRequest::post(org_path(&state, &format!("/{}/members", id)))
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Any).await
}

async fn update_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let id = require_param("organization id", &id)?;
    let user_id = require_param("user id", &user_id)?;
    let request = ForwardRequest::put(org_path(&state, &format!("/{}/members/{}", id, user_id)))
        .authorized_by(&headers)
        .with_body(body);
    proxy(&state, request, Shape::Any).await
}

async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let id = require_param("organization id", &id)?;
    let user_id = require_param("user id", &user_id)?;
    let request =
        ForwardRequest::delete(org_path(&state, &format!("/{}/members/{}", id, user_id)))
            .authorized_by(&headers);
    proxy(&state, request, Shape::Any).await
}
