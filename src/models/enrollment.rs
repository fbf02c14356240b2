use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Course, Id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(alias = "user_id")]
    pub user_id: Id,
    #[serde(alias = "course_id")]
    pub course_id: Id,
    #[serde(default, alias = "progress_percentage")]
    pub progress_percentage: f64,
    #[serde(default, alias = "completed_at")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub course: Option<Course>,
}

impl Enrollment {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some() || self.progress_percentage >= 100.0
    }
}

/// Result of the per-course enrollment lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentStatus {
    #[serde(alias = "is_enrolled")]
    pub is_enrolled: bool,
    #[serde(default)]
    pub enrollment: Option<Enrollment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    #[serde(alias = "lesson_id")]
    pub lesson_id: Id,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, alias = "progress_percentage")]
    pub progress_percentage: Option<f64>,
}
