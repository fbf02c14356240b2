use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use super::proxy;
use crate::backend::{ForwardRequest, Shape};
use crate::error::AppError;
use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let request = ForwardRequest::post("/api/auth/login").with_body(body);
    proxy(&state, request, Shape::Token).await
}

async fn signup(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let request = ForwardRequest::post("/api/auth/signup").with_body(body);
    proxy(&state, request, Shape::Token).await
}

async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let request = ForwardRequest::get("/api/auth/me").authorized_by(&headers);
    proxy(&state, request, Shape::User).await
}
