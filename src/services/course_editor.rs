//! Saving the course edit page: one course update followed by one update per lesson.
//!
//! The backend has no batch endpoint, so the save runs as a saga. Every step that succeeded
//! is undone in reverse order if a later step fails.

use std::fmt;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::client::{ClientError, CourseApi};
use crate::forms::{CourseForm, LessonForm, Validate, ValidationErrors};
use crate::models::{Course, Id, Lesson};

#[derive(Debug, Clone, PartialEq)]
pub struct LessonEdit {
    pub lesson_id: Id,
    pub form: LessonForm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseEdit {
    pub course: CourseForm,
    pub lessons: Vec<LessonEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SagaStep {
    LoadSnapshot,
    UpdateCourse,
    UpdateLesson(Id),
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SagaStep::LoadSnapshot => f.write_str("load course"),
            SagaStep::UpdateCourse => f.write_str("update course"),
            SagaStep::UpdateLesson(id) => write!(f, "update lesson {}", id),
        }
    }
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("invalid edit: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("lesson {0} does not belong to this course")]
    UnknownLesson(Id),

    #[error("failed to {failed_step}: {source}")]
    Saga {
        failed_step: SagaStep,
        #[source]
        source: ClientError,
        /// Rollbacks that did not go through. Empty means the backend is back to its prior state.
        compensation_failures: Vec<(SagaStep, ClientError)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub course: Course,
    pub lessons: Vec<Lesson>,
}

pub struct CourseEditor<'a> {
    api: &'a dyn CourseApi,
}

impl<'a> CourseEditor<'a> {
    pub fn new(api: &'a dyn CourseApi) -> Self {
        Self { api }
    }

    pub async fn apply(&self, course_id: &Id, edit: &CourseEdit) -> Result<SaveReport, EditError> {
        edit.course.validate()?;
        for lesson in &edit.lessons {
            lesson.form.validate()?;
        }

        let snapshot = self
            .snapshot(course_id, !edit.lessons.is_empty())
            .await
            .map_err(|source| EditError::Saga {
                failed_step: SagaStep::LoadSnapshot,
                source,
                compensation_failures: Vec::new(),
            })?;

        for edit in &edit.lessons {
            if !snapshot.lessons.iter().any(|l| l.id == edit.lesson_id) {
                return Err(EditError::UnknownLesson(edit.lesson_id.clone()));
            }
        }

        let mut done: Vec<SagaStep> = Vec::new();

        let course = match self.api.update_course(course_id, &edit.course).await {
            Ok(course) => course,
            Err(source) => return Err(self.abort(&snapshot, done, SagaStep::UpdateCourse, source).await),
        };
        done.push(SagaStep::UpdateCourse);

        let mut lessons = Vec::with_capacity(edit.lessons.len());
        for lesson_edit in &edit.lessons {
            let step = SagaStep::UpdateLesson(lesson_edit.lesson_id.clone());
            match self.api.update_lesson(&lesson_edit.lesson_id, &lesson_edit.form).await {
                Ok(lesson) => {
                    lessons.push(lesson);
                    done.push(step);
                }
                Err(source) => return Err(self.abort(&snapshot, done, step, source).await),
            }
        }

        info!(
            "saved course {} with {} lesson updates",
            course_id,
            lessons.len()
        );
        Ok(SaveReport { course, lessons })
    }

    /// Loads the course as it is before any write. Lessons come from the lesson listing
    /// when the course payload does not embed them.
    async fn snapshot(&self, course_id: &Id, with_lessons: bool) -> Result<Course, ClientError> {
        let mut course = self.api.get_course(course_id).await?;
        if with_lessons && course.lessons.is_empty() {
            course.lessons = self.api.course_lessons(course_id).await?;
        }
        Ok(course)
    }

    /// Undoes `done` in reverse using the snapshot taken before the first write.
    async fn abort(
        &self,
        snapshot: &Course,
        done: Vec<SagaStep>,
        failed_step: SagaStep,
        source: ClientError,
    ) -> EditError {
        warn!(
            "course save failed at '{}': {}; rolling back {} step(s)",
            failed_step,
            source,
            done.len()
        );

        let mut compensation_failures = Vec::new();
        for step in done.into_iter().rev() {
            let result = match &step {
                SagaStep::UpdateCourse => self.api.restore_course(snapshot).await.map(|_| ()),
                SagaStep::UpdateLesson(id) => match snapshot.lessons.iter().find(|l| &l.id == id) {
                    Some(original) => self.api.restore_lesson(original).await.map(|_| ()),
                    None => Ok(()),
                },
                SagaStep::LoadSnapshot => Ok(()),
            };

            if let Err(e) = result {
                error!("rollback of '{}' failed: {}", step, e);
                compensation_failures.push((step, e));
            }
        }

        EditError::Saga {
            failed_step,
            source,
            compensation_failures,
        }
    }
}
