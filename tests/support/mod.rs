#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use axum::http::StatusCode;
use coursehub::backend::{BackendClient, ForwardRequest, UpstreamResponse};
use coursehub::client::{ClientError, CourseApi};
use coursehub::error::AppError;
use coursehub::forms::{CourseForm, LessonForm};
use coursehub::models::{Course, Enrollment, EnrollmentStatus, Id, Lesson, PublishStatus};
use serde_json::Value;

/// Backend double that replays canned responses and records what it was asked.
#[derive(Default)]
pub struct RecordingBackend {
    pub requests: Mutex<Vec<ForwardRequest>>,
    responses: Mutex<VecDeque<Option<UpstreamResponse>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: StatusCode, body: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Some(UpstreamResponse::json(status, &body)));
        self
    }

    pub fn respond_raw(self, response: UpstreamResponse) -> Self {
        self.responses.lock().unwrap().push_back(Some(response));
        self
    }

    /// Next call fails as if the backend were unreachable.
    pub fn fail(self) -> Self {
        self.responses.lock().unwrap().push_back(None);
        self
    }

    pub fn recorded(&self) -> Vec<ForwardRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendClient for RecordingBackend {
    async fn forward(&self, request: ForwardRequest) -> Result<UpstreamResponse, AppError> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Some(response)) => Ok(response),
            Some(None) => Err(AppError::Upstream(unreachable_error().await)),
            None => panic!("no canned response left"),
        }
    }
}

/// A genuine connection-refused error from reqwest.
pub async fn unreachable_error() -> reqwest::Error {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind scratch port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    reqwest::get(format!("http://{}/", addr))
        .await
        .expect_err("nothing listens on a released port")
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{}", addr)
}

/// `CourseApi` double over an in-memory course. Calls are logged as `"<op> <id>"`.
pub struct FakeCourses {
    pub course: Mutex<Course>,
    embed_lessons: bool,
    calls: Mutex<Vec<String>>,
    failures: Mutex<Vec<(String, usize)>>,
}

impl FakeCourses {
    pub fn new(course: Course) -> Self {
        Self {
            course: Mutex::new(course),
            embed_lessons: true,
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Serves lessons only from the lesson listing, not inside the course payload.
    pub fn without_embedded_lessons(mut self) -> Self {
        self.embed_lessons = false;
        self
    }

    /// Makes the `nth` (1-based) call logged as `call` fail with a 500.
    pub fn fail_on(self, call: &str, nth: usize) -> Self {
        self.failures.lock().unwrap().push((call.to_string(), nth));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), ClientError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call.clone());
        let seen = calls.iter().filter(|c| **c == call).count();
        let fails = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|(c, nth)| *c == call && *nth == seen);
        if fails {
            Err(ClientError::Server(StatusCode::INTERNAL_SERVER_ERROR))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CourseApi for FakeCourses {
    async fn get_course(&self, course_id: &Id) -> Result<Course, ClientError> {
        self.record(format!("get_course {}", course_id))?;
        let mut course = self.course.lock().unwrap().clone();
        if !self.embed_lessons {
            course.lessons.clear();
        }
        Ok(course)
    }

    async fn course_lessons(&self, course_id: &Id) -> Result<Vec<Lesson>, ClientError> {
        self.record(format!("course_lessons {}", course_id))?;
        Ok(self.course.lock().unwrap().lessons.clone())
    }

    async fn restore_course(&self, snapshot: &Course) -> Result<Course, ClientError> {
        self.record(format!("restore_course {}", snapshot.id))?;
        let mut course = self.course.lock().unwrap();
        course.title = snapshot.title.clone();
        course.description = snapshot.description.clone();
        course.price = snapshot.price;
        course.publish_status = snapshot.publish_status;
        Ok(course.clone())
    }

    async fn restore_lesson(&self, snapshot: &Lesson) -> Result<Lesson, ClientError> {
        self.record(format!("restore_lesson {}", snapshot.id))?;
        let mut course = self.course.lock().unwrap();
        let lesson = course
            .lessons
            .iter_mut()
            .find(|l| l.id == snapshot.id)
            .ok_or(ClientError::NotFound)?;
        *lesson = snapshot.clone();
        Ok(lesson.clone())
    }

    async fn update_course(&self, course_id: &Id, form: &CourseForm) -> Result<Course, ClientError> {
        self.record(format!("update_course {}", course_id))?;
        let mut course = self.course.lock().unwrap();
        course.title = form.title.clone();
        course.description = form.description.clone();
        course.price = form.price;
        course.publish_status = form.publish_status;
        Ok(course.clone())
    }

    async fn update_lesson(&self, lesson_id: &Id, form: &LessonForm) -> Result<Lesson, ClientError> {
        self.record(format!("update_lesson {}", lesson_id))?;
        let mut course = self.course.lock().unwrap();
        let lesson = course
            .lessons
            .iter_mut()
            .find(|l| &l.id == lesson_id)
            .ok_or(ClientError::NotFound)?;
        lesson.title = form.title.clone();
        lesson.video_url = form.video_url.clone();
        lesson.is_free_preview = form.is_free_preview;
        Ok(lesson.clone())
    }

    async fn enrollment_status(&self, course_id: &Id) -> Result<EnrollmentStatus, ClientError> {
        self.record(format!("enrollment_status {}", course_id))?;
        Ok(EnrollmentStatus::default())
    }

    async fn enroll(&self, course_id: &Id) -> Result<Enrollment, ClientError> {
        self.record(format!("enroll {}", course_id))?;
        Ok(Enrollment {
            id: Some(Id::from("e1")),
            user_id: Id::from("u1"),
            course_id: course_id.clone(),
            progress_percentage: 0.0,
            completed_at: None,
            course: None,
        })
    }
}

pub fn lesson(id: &str, order: i32, title: &str) -> Lesson {
    Lesson {
        id: Id::from(id),
        course_id: Some(Id::from("7")),
        title: title.to_string(),
        description: None,
        video_url: None,
        order_index: order,
        duration_minutes: None,
        is_free_preview: false,
    }
}

pub fn course(price: Option<f64>, lessons: Vec<Lesson>) -> Course {
    Course {
        id: Id::from("7"),
        title: "Rust Basics".to_string(),
        description: Some("Ownership and borrowing".to_string()),
        price,
        thumbnail_url: None,
        organization_id: Some(Id::from("org-1")),
        publish_status: PublishStatus::Published,
        lessons,
        instructor_ids: Vec::new(),
    }
}
