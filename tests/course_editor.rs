use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use coursehub::client::{ApiClient, MemoryTokenStore};
use coursehub::forms::{CourseForm, LessonForm};
use coursehub::models::Id;
use coursehub::services::{CourseEdit, CourseEditor, EditError, LessonEdit, SagaStep};
use serde_json::{Value, json};

mod support;

use support::{FakeCourses, course, lesson};

fn original() -> coursehub::models::Course {
    course(
        Some(10.0),
        vec![lesson("l1", 1, "Ownership"), lesson("l2", 2, "Borrowing")],
    )
}

fn edit_of(course: &coursehub::models::Course) -> CourseEdit {
    let mut form = CourseForm::from_course(course);
    form.title = "Rust Basics, 2nd edition".to_string();
    CourseEdit {
        course: form,
        lessons: course
            .lessons
            .iter()
            .map(|l| {
                let mut lesson_form = LessonForm::from_lesson(l);
                lesson_form.title = format!("{} (revised)", l.title);
                LessonEdit {
                    lesson_id: l.id.clone(),
                    form: lesson_form,
                }
            })
            .collect(),
    }
}

#[tokio::test]
async fn saves_course_then_each_lesson() {
    let original = original();
    let api = FakeCourses::new(original.clone());

    let report = CourseEditor::new(&api)
        .apply(&Id::from("7"), &edit_of(&original))
        .await
        .unwrap();

    assert_eq!(report.course.title, "Rust Basics, 2nd edition");
    assert_eq!(report.lessons.len(), 2);
    assert_eq!(
        api.calls(),
        vec![
            "get_course 7",
            "update_course 7",
            "update_lesson l1",
            "update_lesson l2"
        ]
    );
}

#[tokio::test]
async fn lesson_failure_rolls_back_in_reverse_order() {
    let original = original();
    let api = FakeCourses::new(original.clone()).fail_on("update_lesson l2", 1);

    let err = CourseEditor::new(&api)
        .apply(&Id::from("7"), &edit_of(&original))
        .await
        .unwrap_err();

    match err {
        EditError::Saga {
            failed_step,
            compensation_failures,
            ..
        } => {
            assert_eq!(failed_step, SagaStep::UpdateLesson(Id::from("l2")));
            assert!(compensation_failures.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(
        api.calls()[4..],
        ["restore_lesson l1".to_string(), "restore_course 7".to_string()]
    );
    let restored = api.course.lock().unwrap().clone();
    assert_eq!(restored.title, original.title);
    assert_eq!(restored.lessons[0].title, "Ownership");
}

#[tokio::test]
async fn failed_rollbacks_are_reported() {
    let original = original();
    let api = FakeCourses::new(original.clone())
        .fail_on("update_lesson l2", 1)
        .fail_on("restore_course 7", 1);

    let err = CourseEditor::new(&api)
        .apply(&Id::from("7"), &edit_of(&original))
        .await
        .unwrap_err();

    match err {
        EditError::Saga {
            compensation_failures,
            ..
        } => {
            let steps: Vec<_> = compensation_failures.iter().map(|(s, _)| s.clone()).collect();
            assert_eq!(steps, vec![SagaStep::UpdateCourse]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn course_failure_needs_no_rollback() {
    let original = original();
    let api = FakeCourses::new(original.clone()).fail_on("update_course 7", 1);

    let err = CourseEditor::new(&api)
        .apply(&Id::from("7"), &edit_of(&original))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EditError::Saga { failed_step: SagaStep::UpdateCourse, .. }
    ));
    assert_eq!(api.calls(), vec!["get_course 7", "update_course 7"]);
}

#[tokio::test]
async fn invalid_edit_sends_nothing() {
    let original = original();
    let api = FakeCourses::new(original.clone());
    let mut edit = edit_of(&original);
    edit.course.title = "  ".to_string();

    let err = CourseEditor::new(&api)
        .apply(&Id::from("7"), &edit)
        .await
        .unwrap_err();

    assert!(matches!(err, EditError::Invalid(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn foreign_lesson_is_refused_before_writing() {
    let original = original();
    let api = FakeCourses::new(original.clone());
    let mut edit = edit_of(&original);
    edit.lessons[1].lesson_id = Id::from("other");

    let err = CourseEditor::new(&api)
        .apply(&Id::from("7"), &edit)
        .await
        .unwrap_err();

    assert!(matches!(err, EditError::UnknownLesson(_)));
    assert_eq!(api.calls(), vec!["get_course 7"]);
}

#[tokio::test]
async fn lessons_are_loaded_when_the_course_does_not_embed_them() {
    let original = original();
    let api = FakeCourses::new(original.clone()).without_embedded_lessons();

    let report = CourseEditor::new(&api)
        .apply(&Id::from("7"), &edit_of(&original))
        .await
        .unwrap();

    assert_eq!(report.lessons.len(), 2);
    assert_eq!(api.calls()[..2], ["get_course 7".to_string(), "course_lessons 7".to_string()]);
}

type Puts = Arc<Mutex<Vec<String>>>;

/// Backend holding a course whose stored title is shorter than the form minimum,
/// serving lessons only from the listing, and failing every write to lesson `l2`.
fn legacy_backend(puts: Puts) -> Router {
    Router::new()
        .route(
            "/api/courses/{id}",
            get(|| async {
                Json(json!({ "id": 7, "title": "Go", "organizationId": "org-1", "price": 5 }))
            })
            .put(|State(puts): State<Puts>, Json(body): Json<Value>| async move {
                puts.lock()
                    .unwrap()
                    .push(format!("course {}", body["title"].as_str().unwrap_or_default()));
                Json(json!({ "id": 7, "title": body["title"] }))
            }),
        )
        .route(
            "/api/courses/{id}/lessons",
            get(|| async {
                Json(json!({ "data": [
                    { "id": "l1", "title": "A", "orderIndex": 1 },
                    { "id": "l2", "title": "B", "orderIndex": 2 }
                ] }))
            }),
        )
        .route(
            "/api/lessons/{id}",
            put(
                |State(puts): State<Puts>, Path(id): Path<String>, Json(body): Json<Value>| async move {
                    let title = body["title"].as_str().unwrap_or_default().to_string();
                    puts.lock().unwrap().push(format!("lesson {} {}", id, title));
                    if id == "l2" {
                        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
                    }
                    (StatusCode::OK, Json(json!({ "id": id, "title": title })))
                },
            ),
        )
        .with_state(puts)
}

#[tokio::test]
async fn rollback_reaches_the_backend_even_when_the_snapshot_fails_form_rules() {
    let puts: Puts = Arc::default();
    let base = support::spawn(legacy_backend(puts.clone())).await;
    let api = ApiClient::new(&base, Arc::new(MemoryTokenStore::new())).unwrap();

    let course = CourseForm {
        title: "Go Basics".to_string(),
        price: Some(5.0),
        organization_id: Some(Id::from("org-1")),
        ..CourseForm::default()
    };
    let lesson_form = |title: &str| LessonForm {
        title: title.to_string(),
        ..LessonForm::default()
    };
    let edit = CourseEdit {
        course,
        lessons: vec![
            LessonEdit { lesson_id: Id::from("l1"), form: lesson_form("A2") },
            LessonEdit { lesson_id: Id::from("l2"), form: lesson_form("B2") },
        ],
    };

    let err = CourseEditor::new(&api)
        .apply(&Id::from("7"), &edit)
        .await
        .unwrap_err();

    match err {
        EditError::Saga {
            failed_step,
            compensation_failures,
            ..
        } => {
            assert_eq!(failed_step, SagaStep::UpdateLesson(Id::from("l2")));
            assert!(compensation_failures.is_empty(), "{compensation_failures:?}");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        *puts.lock().unwrap(),
        vec![
            "course Go Basics",
            "lesson l1 A2",
            "lesson l2 B2",
            "lesson l1 A",
            "course Go",
        ]
    );
}
