pub mod auth;
pub mod course;
pub mod enrollment;
pub mod id;
pub mod lesson;
pub mod organization;
pub mod user;

pub use auth::{LoginRequest, SignupRequest, TokenResponse};
pub use course::{Course, PublishStatus};
pub use enrollment::{Enrollment, EnrollmentStatus, LessonProgress};
pub use id::Id;
pub use lesson::Lesson;
pub use organization::{MemberRole, Membership, Organization};
pub use user::{User, UserRole};

use serde::Deserialize;

/// Backend payloads arrive either bare or wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}
