use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use coursehub::client::{ApiClient, FileTokenStore, MemoryTokenStore, Session, SessionError, TokenStore};
use coursehub::navigation::Route;
use serde_json::{Value, json};

mod support;

fn auth_backend() -> Router {
    Router::new()
        .route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                match body["password"].as_str() {
                    Some("correct horse") => (StatusCode::OK, Json(json!({ "accessToken": "tok-1" }))),
                    Some("teapot") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
                    Some("short") => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        Json(json!({ "message": "Password must be at least 8 characters" })),
                    ),
                    _ => (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "message": "bad credentials" })),
                    ),
                }
            }),
        )
        .route(
            "/api/auth/signup",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "message": "email taken" })),
                )
            }),
        )
        .route(
            "/api/auth/me",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok());
                if auth == Some("Bearer tok-1") {
                    (
                        StatusCode::OK,
                        Json(json!({ "id": 5, "email": "ada@example.com", "role": "instructor" })),
                    )
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "no session" })))
                }
            }),
        )
}

async fn session_with(tokens: Arc<dyn TokenStore>) -> Session {
    let base = support::spawn(auth_backend()).await;
    let api = ApiClient::new(&base, tokens.clone()).unwrap();
    Session::new(Arc::new(api), tokens)
}

#[tokio::test]
async fn rejected_login_shows_credential_message_and_stores_nothing() {
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let session = session_with(tokens.clone()).await;

    let err = session.login("ada@example.com", "nope").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(tokens.load().is_none());
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn successful_login_stores_token_and_lands_on_role_dashboard() {
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let session = session_with(tokens.clone()).await;

    let route = session.login(" ada@example.com ", "correct horse").await.unwrap();

    assert_eq!(route, Route::InstructorDashboard);
    assert_eq!(tokens.load().as_deref(), Some("tok-1"));
    assert_eq!(session.current_user().unwrap().id.as_str(), "5");
}

#[tokio::test]
async fn server_failure_is_not_reported_as_bad_credentials() {
    let session = session_with(Arc::new(MemoryTokenStore::new())).await;

    let err = session.login("ada@example.com", "teapot").await.unwrap_err();

    assert!(matches!(err, SessionError::Server));
}

#[tokio::test]
async fn validation_failure_carries_backend_message() {
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let session = session_with(tokens.clone()).await;

    let err = session.login("ada@example.com", "short").await.unwrap_err();

    match err {
        SessionError::Validation(message) => {
            assert_eq!(message, "Password must be at least 8 characters")
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(tokens.load().is_none());
}

#[tokio::test]
async fn duplicate_signup_is_explained() {
    let session = session_with(Arc::new(MemoryTokenStore::new())).await;
    let request = coursehub::models::SignupRequest {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        password: "pw123456".to_string(),
        role: None,
    };

    let err = session.signup(&request).await.unwrap_err();

    assert_eq!(err.to_string(), "An account with this email already exists");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let api = ApiClient::new(&format!("http://{}", addr), tokens.clone()).unwrap();
    let session = Session::new(Arc::new(api), tokens);

    let err = session.login("ada@example.com", "pw").await.unwrap_err();

    assert_eq!(err.to_string(), "Unable to reach the server. Check your connection.");
}

#[tokio::test]
async fn persisted_token_survives_restart_until_logout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&path));
    let session = session_with(tokens).await;
    session.login("ada@example.com", "correct horse").await.unwrap();

    let reopened: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&path));
    let restored = session_with(reopened.clone()).await;
    let user = restored.init().await.expect("stored token is still valid");
    assert_eq!(user.email, "ada@example.com");

    assert_eq!(restored.logout(), Route::SignIn);
    assert!(FileTokenStore::new(&path).load().is_none());
}
