use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::models::{
    Course, Enrollment, EnrollmentStatus, Envelope, Lesson, LessonProgress, Membership,
    Organization, TokenResponse, User,
};

/// The typed model a route expects in a successful backend response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Relayed without decoding (deletes, free-form acknowledgements).
    Any,
    Token,
    User,
    Users,
    Course,
    Courses,
    Lesson,
    Lessons,
    Enrollment,
    Enrollments,
    EnrollmentStatus,
    Progress,
    Organization,
    Organizations,
    Members,
}

impl Shape {
    pub fn name(self) -> &'static str {
        match self {
            Shape::Any => "any",
            Shape::Token => "token",
            Shape::User => "user",
            Shape::Users => "user list",
            Shape::Course => "course",
            Shape::Courses => "course list",
            Shape::Lesson => "lesson",
            Shape::Lessons => "lesson list",
            Shape::Enrollment => "enrollment",
            Shape::Enrollments => "enrollment list",
            Shape::EnrollmentStatus => "enrollment status",
            Shape::Progress => "lesson progress",
            Shape::Organization => "organization",
            Shape::Organizations => "organization list",
            Shape::Members => "member list",
        }
    }

    /// Checks that `body` decodes as this shape. Empty bodies always pass.
    pub fn validate(self, body: &[u8]) -> Result<(), AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        match self {
            Shape::Any => Ok(()),
            Shape::Token => self.decode::<TokenResponse>(body),
            Shape::User => self.decode::<User>(body),
            Shape::Users => self.decode::<Vec<User>>(body),
            Shape::Course => self.decode::<Course>(body),
            Shape::Courses => self.decode::<Vec<Course>>(body),
            Shape::Lesson => self.decode::<Lesson>(body),
            Shape::Lessons => self.decode::<Vec<Lesson>>(body),
            Shape::Enrollment => self.decode::<Enrollment>(body),
            Shape::Enrollments => self.decode::<Vec<Enrollment>>(body),
            Shape::EnrollmentStatus => self.decode::<EnrollmentStatus>(body),
            Shape::Progress => self.decode::<LessonProgress>(body),
            Shape::Organization => self.decode::<Organization>(body),
            Shape::Organizations => self.decode::<Vec<Organization>>(body),
            Shape::Members => self.decode::<Vec<Membership>>(body),
        }
    }

    fn decode<T: DeserializeOwned>(self, body: &[u8]) -> Result<(), AppError> {
        serde_json::from_slice::<Envelope<T>>(body)
            .map(|_| ())
            .map_err(|e| AppError::UpstreamShape {
                expected: self.name(),
                reason: e.to_string(),
            })
    }
}
