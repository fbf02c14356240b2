pub mod course_editor;
pub mod dashboard;
pub mod enrollment;
pub mod permissions;

pub use course_editor::{CourseEdit, CourseEditor, EditError, LessonEdit, SagaStep, SaveReport};
pub use dashboard::{InstructorStats, NavItem, StudentStats, nav_items};
pub use enrollment::{EnrollOutcome, enroll};
pub use permissions::{OrgAction, describe_failure, forbidden_message};
