use crate::models::{EnrollmentStatus, Lesson};

/// What the viewer brings to a lesson page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub has_token: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonAccess {
    Playable,
    SignInRequired,
    EnrollmentRequired,
}

/// Decides playback for one lesson. Re-evaluated on every click, never cached.
pub fn gate(lesson: &Lesson, auth: &AuthSnapshot, enrollment: &EnrollmentStatus) -> LessonAccess {
    if lesson.is_free_preview {
        LessonAccess::Playable
    } else if !auth.has_token {
        LessonAccess::SignInRequired
    } else if enrollment.is_enrolled {
        LessonAccess::Playable
    } else {
        LessonAccess::EnrollmentRequired
    }
}

pub fn can_play(lesson: &Lesson, auth: &AuthSnapshot, enrollment: &EnrollmentStatus) -> bool {
    gate(lesson, auth, enrollment) == LessonAccess::Playable
}

/// Lessons in presentation order.
pub fn sorted_lessons(lessons: &[Lesson]) -> Vec<&Lesson> {
    let mut sorted: Vec<&Lesson> = lessons.iter().collect();
    sorted.sort_by_key(|l| l.order_index);
    sorted
}

pub fn next_lesson<'a>(lessons: &'a [Lesson], current: &Lesson) -> Option<&'a Lesson> {
    let sorted = sorted_lessons(lessons);
    let pos = sorted.iter().position(|l| l.id == current.id)?;
    sorted.get(pos + 1).copied()
}

pub fn previous_lesson<'a>(lessons: &'a [Lesson], current: &Lesson) -> Option<&'a Lesson> {
    let sorted = sorted_lessons(lessons);
    let pos = sorted.iter().position(|l| l.id == current.id)?;
    pos.checked_sub(1).and_then(|p| sorted.get(p).copied())
}
