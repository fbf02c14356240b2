use crate::client::ClientError;
use crate::models::MemberRole;

/// Dashboard actions that the backend may refuse with 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgAction {
    CreateCourse,
    EditCourse,
    DeleteCourse,
    ManageLessons,
    ManageInstructors,
    ManageMembers,
    EditOrganization,
    DeleteOrganization,
}

impl MemberRole {
    pub fn can_manage_courses(self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }

    pub fn can_edit_lessons(self) -> bool {
        matches!(
            self,
            MemberRole::Owner | MemberRole::Admin | MemberRole::Instructor
        )
    }

    pub fn can_manage_members(self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }

    pub fn can_delete_organization(self) -> bool {
        self == MemberRole::Owner
    }

    pub fn allows(self, action: OrgAction) -> bool {
        match action {
            OrgAction::CreateCourse
            | OrgAction::EditCourse
            | OrgAction::DeleteCourse
            | OrgAction::ManageInstructors => self.can_manage_courses(),
            OrgAction::ManageLessons => self.can_edit_lessons(),
            OrgAction::ManageMembers | OrgAction::EditOrganization => self.can_manage_members(),
            OrgAction::DeleteOrganization => self.can_delete_organization(),
        }
    }
}

pub fn forbidden_message(action: OrgAction) -> &'static str {
    match action {
        OrgAction::CreateCourse => "Only organization owners or admins can create courses.",
        OrgAction::EditCourse => "Only organization owners or admins can edit this course.",
        OrgAction::DeleteCourse => "Only organization owners or admins can delete this course.",
        OrgAction::ManageLessons => {
            "Only instructors of this course or organization admins can manage lessons."
        }
        OrgAction::ManageInstructors => {
            "Only organization owners or admins can assign instructors."
        }
        OrgAction::ManageMembers => "Only organization owners or admins can manage members.",
        OrgAction::EditOrganization => {
            "Only organization owners or admins can edit this organization."
        }
        OrgAction::DeleteOrganization => "Only the organization owner can delete it.",
    }
}

/// Text for the inline error banner after `action` failed.
pub fn describe_failure(action: OrgAction, err: &ClientError) -> String {
    match err {
        ClientError::Forbidden(_) => forbidden_message(action).to_string(),
        ClientError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
        ClientError::Invalid(errors) => errors.to_string(),
        ClientError::Unprocessable(msg) | ClientError::BadRequest(msg) if !msg.is_empty() => {
            msg.clone()
        }
        ClientError::Conflict(_) => "This conflicts with an existing record.".to_string(),
        ClientError::NotFound => "The requested item no longer exists.".to_string(),
        ClientError::Network(_) => "Unable to reach the server. Check your connection.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}
