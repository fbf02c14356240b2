use tracing::info;

use crate::access::AuthSnapshot;
use crate::client::{ClientError, CourseApi};
use crate::models::{Course, Enrollment, EnrollmentStatus};
use crate::navigation::Route;

#[derive(Debug, Clone, PartialEq)]
pub enum EnrollOutcome {
    /// Free course: the enrollment was created in place.
    Enrolled(Enrollment),
    AlreadyEnrolled,
    /// Nothing was sent; the caller should move to this route.
    Navigate(Route),
}

/// Handles the "Enroll" button on a course page.
///
/// Free courses are enrolled directly and `status` is updated. Paid courses go to checkout
/// without touching the enrollment endpoint. Anonymous viewers are sent to sign in.
pub async fn enroll(
    api: &dyn CourseApi,
    auth: &AuthSnapshot,
    course: &Course,
    status: &mut EnrollmentStatus,
) -> Result<EnrollOutcome, ClientError> {
    if !auth.has_token {
        return Ok(EnrollOutcome::Navigate(Route::SignIn));
    }
    if status.is_enrolled {
        return Ok(EnrollOutcome::AlreadyEnrolled);
    }
    if course.is_paid() {
        return Ok(EnrollOutcome::Navigate(Route::Checkout {
            course_id: course.id.clone(),
        }));
    }

    let enrollment = api.enroll(&course.id).await?;
    info!("enrolled in free course {}", course.id);
    status.is_enrolled = true;
    status.enrollment = Some(enrollment.clone());
    Ok(EnrollOutcome::Enrolled(enrollment))
}
