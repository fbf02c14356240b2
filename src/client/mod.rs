//! Typed HTTP client for the proxy routes, plus the session that owns the bearer token.

pub mod session;
pub mod store;

pub use session::{Session, SessionError};
pub use store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};

use std::borrow::Cow;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::forms::{CourseForm, LessonForm, OrganizationForm, Validate, ValidationErrors};
use crate::models::{
    Course, Enrollment, EnrollmentStatus, Envelope, Id, Lesson, LessonProgress, LoginRequest,
    Organization, SignupRequest, TokenResponse, User,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid form: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("{0}")]
    Unprocessable(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("server error ({0})")]
    Server(StatusCode),

    #[error("unexpected status {0}: {1}")]
    Status(StatusCode, String),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("token storage failed: {0}")]
    Storage(#[from] io::Error),
}

impl ClientError {
    /// Classifies a non-success response by status code.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::UNPROCESSABLE_ENTITY => ClientError::Unprocessable(message),
            StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
            StatusCode::NOT_FOUND => ClientError::NotFound,
            StatusCode::CONFLICT => ClientError::Conflict(message),
            s if s.is_server_error() => ClientError::Server(s),
            s => ClientError::Status(s, message),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ClientError::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            ClientError::Unprocessable(_) => Some(StatusCode::UNPROCESSABLE_ENTITY),
            ClientError::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            ClientError::NotFound => Some(StatusCode::NOT_FOUND),
            ClientError::Conflict(_) => Some(StatusCode::CONFLICT),
            ClientError::Server(s) | ClientError::Status(s, _) => Some(*s),
            _ => None,
        }
    }
}

/// Pulls a human-readable message out of an error body (`message`, then `error`), else the raw text.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ClientError>;
    async fn signup(&self, request: &SignupRequest) -> Result<TokenResponse, ClientError>;
    async fn me(&self) -> Result<User, ClientError>;
}

#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn get_course(&self, course_id: &Id) -> Result<Course, ClientError>;
    async fn course_lessons(&self, course_id: &Id) -> Result<Vec<Lesson>, ClientError>;
    async fn update_course(&self, course_id: &Id, form: &CourseForm) -> Result<Course, ClientError>;
    async fn update_lesson(&self, lesson_id: &Id, form: &LessonForm) -> Result<Lesson, ClientError>;
    /// Writes a previously loaded course back as-is, without form validation.
    async fn restore_course(&self, snapshot: &Course) -> Result<Course, ClientError>;
    /// Writes a previously loaded lesson back as-is, without form validation.
    async fn restore_lesson(&self, snapshot: &Lesson) -> Result<Lesson, ClientError>;
    async fn enrollment_status(&self, course_id: &Id) -> Result<EnrollmentStatus, ClientError>;
    async fn enroll(&self, course_id: &Id) -> Result<Enrollment, ClientError>;
}

/// Percent-encodes an id for use as one path segment.
fn segment(id: &Id) -> Cow<'_, str> {
    urlencoding::encode(id.as_str())
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Every request goes through here so the stored token is attached uniformly.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("request failed with {}: {}", status, body);
            return Err(ClientError::from_response(status, &body));
        }

        Ok(serde_json::from_str::<Envelope<T>>(&body)?.into_inner())
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response(status, &body));
        }
        Ok(())
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, ClientError> {
        self.send(self.request(Method::GET, "/api/courses")).await
    }

    /// Courses taught by `user_id`.
    pub async fn instructor_courses(&self, user_id: &Id) -> Result<Vec<Course>, ClientError> {
        let path = format!("/api/users/{}/courses", segment(user_id));
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn create_course(&self, form: &CourseForm) -> Result<Course, ClientError> {
        form.validate()?;
        self.send(self.request(Method::POST, "/api/courses").json(form))
            .await
    }

    pub async fn delete_course(&self, course_id: &Id) -> Result<(), ClientError> {
        let path = format!("/api/courses/{}", segment(course_id));
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    pub async fn create_lesson(&self, form: &LessonForm) -> Result<Lesson, ClientError> {
        form.validate()?;
        self.send(self.request(Method::POST, "/api/lessons").json(form))
            .await
    }

    pub async fn my_enrollments(&self) -> Result<Vec<Enrollment>, ClientError> {
        self.send(self.request(Method::GET, "/api/enrollments")).await
    }

    pub async fn record_progress(
        &self,
        lesson_id: &Id,
        completed: bool,
    ) -> Result<LessonProgress, ClientError> {
        let path = format!("/api/lessons/{}/progress", segment(lesson_id));
        let body = json!({ "completed": completed });
        self.send(self.request(Method::POST, &path).json(&body))
            .await
    }

    pub async fn owned_organizations(&self) -> Result<Vec<Organization>, ClientError> {
        self.send(self.request(Method::GET, "/api/organisations/owned"))
            .await
    }

    /// Default organization for the instructor's course form.
    pub async fn first_owned_organization(&self) -> Result<Option<Organization>, ClientError> {
        Ok(self.owned_organizations().await?.into_iter().next())
    }

    pub async fn create_organization(
        &self,
        form: &OrganizationForm,
    ) -> Result<Organization, ClientError> {
        form.validate()?;
        self.send(self.request(Method::POST, "/api/organisations").json(form))
            .await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ClientError> {
        self.send(self.request(Method::POST, "/api/auth/login").json(request))
            .await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<TokenResponse, ClientError> {
        self.send(self.request(Method::POST, "/api/auth/signup").json(request))
            .await
    }

    async fn me(&self) -> Result<User, ClientError> {
        self.send(self.request(Method::GET, "/api/auth/me")).await
    }
}

#[async_trait]
impl CourseApi for ApiClient {
    async fn get_course(&self, course_id: &Id) -> Result<Course, ClientError> {
        let path = format!("/api/courses/{}", segment(course_id));
        self.send(self.request(Method::GET, &path)).await
    }

    async fn course_lessons(&self, course_id: &Id) -> Result<Vec<Lesson>, ClientError> {
        let path = format!("/api/courses/{}/lessons", segment(course_id));
        self.send(self.request(Method::GET, &path)).await
    }

    async fn update_course(&self, course_id: &Id, form: &CourseForm) -> Result<Course, ClientError> {
        form.validate()?;
        let path = format!("/api/courses/{}", segment(course_id));
        self.send(self.request(Method::PUT, &path).json(form)).await
    }

    async fn update_lesson(&self, lesson_id: &Id, form: &LessonForm) -> Result<Lesson, ClientError> {
        form.validate()?;
        let path = format!("/api/lessons/{}", segment(lesson_id));
        self.send(self.request(Method::PUT, &path).json(form)).await
    }

    async fn restore_course(&self, snapshot: &Course) -> Result<Course, ClientError> {
        let path = format!("/api/courses/{}", segment(&snapshot.id));
        let form = CourseForm::from_course(snapshot);
        self.send(self.request(Method::PUT, &path).json(&form)).await
    }

    async fn restore_lesson(&self, snapshot: &Lesson) -> Result<Lesson, ClientError> {
        let path = format!("/api/lessons/{}", segment(&snapshot.id));
        let form = LessonForm::from_lesson(snapshot);
        self.send(self.request(Method::PUT, &path).json(&form)).await
    }

    async fn enrollment_status(&self, course_id: &Id) -> Result<EnrollmentStatus, ClientError> {
        let path = format!("/api/courses/{}/enrollment", segment(course_id));
        self.send(self.request(Method::GET, &path)).await
    }

    async fn enroll(&self, course_id: &Id) -> Result<Enrollment, ClientError> {
        let body = json!({ "courseId": course_id });
        self.send(self.request(Method::POST, "/api/enrollments").json(&body))
            .await
    }
}
