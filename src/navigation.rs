use crate::models::{Id, User, UserRole};

/// Client-side destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    SignIn,
    SignUp,
    Courses,
    Course { course_id: Id },
    Lesson { course_id: Id, lesson_id: Id },
    Checkout { course_id: Id },
    MyCourses,
    StudentDashboard,
    InstructorDashboard,
    InstructorCourses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    SignedIn,
    Instructor,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::SignIn => "/signin".to_string(),
            Route::SignUp => "/signup".to_string(),
            Route::Courses => "/courses".to_string(),
            Route::Course { course_id } => format!("/courses/{}", course_id),
            Route::Lesson {
                course_id,
                lesson_id,
            } => format!("/courses/{}/lessons/{}", course_id, lesson_id),
            Route::Checkout { course_id } => format!("/checkout/{}", course_id),
            Route::MyCourses => "/my-courses".to_string(),
            Route::StudentDashboard => "/dashboard/student".to_string(),
            Route::InstructorDashboard => "/dashboard/instructor".to_string(),
            Route::InstructorCourses => "/dashboard/instructor/courses".to_string(),
        }
    }

    /// Landing dashboard after sign-in.
    pub fn dashboard_for(role: Option<UserRole>) -> Route {
        match role {
            Some(UserRole::Instructor) | Some(UserRole::Admin) => Route::InstructorDashboard,
            _ => Route::StudentDashboard,
        }
    }

    fn access(&self) -> Access {
        match self {
            Route::Home | Route::SignIn | Route::SignUp | Route::Courses | Route::Course { .. } => {
                Access::Public
            }
            // lesson pages do their own free-preview gating
            Route::Lesson { .. } => Access::Public,
            Route::Checkout { .. } | Route::MyCourses | Route::StudentDashboard => {
                Access::SignedIn
            }
            Route::InstructorDashboard | Route::InstructorCourses => Access::Instructor,
        }
    }
}

/// Resolves where a navigation to `route` actually lands for the current user.
pub fn guard(route: Route, user: Option<&User>) -> Route {
    match (route.access(), user) {
        (Access::Public, _) => route,
        (_, None) => Route::SignIn,
        (Access::SignedIn, Some(_)) => route,
        (Access::Instructor, Some(user)) => match user.role {
            Some(UserRole::Instructor) | Some(UserRole::Admin) => route,
            _ => Route::StudentDashboard,
        },
    }
}
