use crate::dispatch::CreateTicketArgs;
use crate::models::{Role, TicketStatus, UserWithRole};

/// Rejections raised before anything is sent to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    EmptyDescription,
    MissingCategory,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "Please enter a title"),
            ValidationError::EmptyDescription => write!(f, "Please enter a description"),
            ValidationError::MissingCategory => write!(f, "Please choose a category"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// The new-ticket form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct TicketForm {
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub assigned_to: Option<i64>,
}

impl TicketForm {
    /// New tickets always start `Open`.
    pub fn validate(&self, created_by: i64) -> Result<CreateTicketArgs, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let category_id = self.category_id.ok_or(ValidationError::MissingCategory)?;

        Ok(CreateTicketArgs {
            title: title.to_string(),
            description: description.to_string(),
            category_id,
            created_by,
            status: TicketStatus::Open,
            assigned_to: self.assigned_to,
        })
    }
}

/// What the UI offers a user, by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub edit_tickets: bool,
    pub delete_tickets: bool,
    pub assign_tickets: bool,
    pub manage_users: bool,
}

impl Capabilities {
    /// Unknown roles get what a regular user gets.
    pub fn for_role(role: Option<Role>) -> Capabilities {
        let role = role.unwrap_or(Role::User);
        Capabilities {
            edit_tickets: role.is_staff(),
            delete_tickets: role.is_staff(),
            assign_tickets: role.is_staff(),
            manage_users: role == Role::Admin,
        }
    }
}

/// Active Admin and Support users, the only valid assignees.
pub fn assignable_users(users: &[UserWithRole]) -> Vec<&UserWithRole> {
    users
        .iter()
        .filter(|u| u.active && u.role().is_some_and(Role::is_staff))
        .collect()
}
