use serde::Serialize;

use crate::models::{Course, Enrollment, PublishStatus, UserRole};
use crate::navigation::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

/// Sidebar entries for the signed-in user's dashboard.
pub fn nav_items(role: Option<UserRole>) -> Vec<NavItem> {
    let mut items = vec![NavItem {
        label: "Overview",
        route: Route::dashboard_for(role),
    }];

    match role {
        Some(UserRole::Instructor) | Some(UserRole::Admin) => {
            items.push(NavItem {
                label: "My courses",
                route: Route::InstructorCourses,
            });
        }
        _ => {
            items.push(NavItem {
                label: "My learning",
                route: Route::MyCourses,
            });
        }
    }

    items.push(NavItem {
        label: "Browse courses",
        route: Route::Courses,
    });
    items
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub enrolled: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub average_progress: f64,
}

impl StudentStats {
    pub fn from_enrollments(enrollments: &[Enrollment]) -> Self {
        if enrollments.is_empty() {
            return Self::default();
        }

        let completed = enrollments.iter().filter(|e| e.is_completed()).count();
        let in_progress = enrollments
            .iter()
            .filter(|e| !e.is_completed() && e.progress_percentage > 0.0)
            .count();
        let total: f64 = enrollments
            .iter()
            .map(|e| e.progress_percentage.clamp(0.0, 100.0))
            .sum();

        Self {
            enrolled: enrollments.len(),
            completed,
            in_progress,
            average_progress: (total / enrollments.len() as f64 * 10.0).round() / 10.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorStats {
    pub courses: usize,
    pub published: usize,
    pub drafts: usize,
    pub lessons: usize,
    pub total_minutes: u32,
}

impl InstructorStats {
    pub fn from_courses(courses: &[Course]) -> Self {
        let mut stats = Self {
            courses: courses.len(),
            ..Self::default()
        };
        for course in courses {
            match course.publish_status {
                PublishStatus::Published => stats.published += 1,
                PublishStatus::Draft => stats.drafts += 1,
                PublishStatus::Archived => {}
            }
            stats.lessons += course.lessons.len();
            stats.total_minutes += course
                .lessons
                .iter()
                .filter_map(|l| l.duration_minutes)
                .sum::<u32>();
        }
        stats
    }
}
