use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::auth::password;
use crate::db::tickets::TicketChanges;
use crate::error::AppError;
use crate::models::{Role, TicketStatus};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// One named operation and its arguments, as sent by the UI:
/// `{"op": "tickets.getHome", "args": {"userId": 4, "roleId": 3}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", content = "args")]
pub enum Request {
    #[serde(rename = "tickets.list")]
    ListTickets(NoArgs),
    #[serde(rename = "tickets.getByCreator")]
    TicketsByCreator(UserRef),
    #[serde(rename = "tickets.getAssigned")]
    TicketsAssignedTo(UserRef),
    #[serde(rename = "tickets.getHome")]
    HomeTickets(HomeArgs),
    #[serde(rename = "tickets.get")]
    GetTicket(TicketRef),
    #[serde(rename = "tickets.create")]
    CreateTicket(CreateTicketArgs),
    #[serde(rename = "tickets.update")]
    UpdateTicket(UpdateTicketArgs),
    #[serde(rename = "tickets.delete")]
    DeleteTicket(TicketRef),
    #[serde(rename = "comments.create")]
    CreateComment(CreateCommentArgs),
    #[serde(rename = "comments.listByTicket")]
    CommentsByTicket(TicketRef),
    #[serde(rename = "users.list")]
    ListUsers(NoArgs),
    #[serde(rename = "users.get")]
    GetUser(UserRef),
    #[serde(rename = "users.getByEmail")]
    UserByEmail(EmailArgs),
    #[serde(rename = "users.create")]
    CreateUser(CreateUserArgs),
    #[serde(rename = "users.update")]
    UpdateUser(UpdateUserArgs),
    #[serde(rename = "users.delete")]
    DeleteUser(UserRef),
    #[serde(rename = "roles.list")]
    ListRoles(NoArgs),
    #[serde(rename = "auth.login")]
    Login(LoginArgs),
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::ListTickets(_) => "tickets.list",
            Request::TicketsByCreator(_) => "tickets.getByCreator",
            Request::TicketsAssignedTo(_) => "tickets.getAssigned",
            Request::HomeTickets(_) => "tickets.getHome",
            Request::GetTicket(_) => "tickets.get",
            Request::CreateTicket(_) => "tickets.create",
            Request::UpdateTicket(_) => "tickets.update",
            Request::DeleteTicket(_) => "tickets.delete",
            Request::CreateComment(_) => "comments.create",
            Request::CommentsByTicket(_) => "comments.listByTicket",
            Request::ListUsers(_) => "users.list",
            Request::GetUser(_) => "users.get",
            Request::UserByEmail(_) => "users.getByEmail",
            Request::CreateUser(_) => "users.create",
            Request::UpdateUser(_) => "users.update",
            Request::DeleteUser(_) => "users.delete",
            Request::ListRoles(_) => "roles.list",
            Request::Login(_) => "auth.login",
        }
    }
}

/// Arguments of an operation that takes none. `args` may be absent, `null`
/// or an object; any keys in it are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoArgs;

impl<'de> Deserialize<'de> for NoArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Map<String, Value>>::deserialize(deserializer).map(|_| NoArgs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub user_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRef {
    pub ticket_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeArgs {
    pub user_id: i64,
    pub role_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailArgs {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketArgs {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub created_by: i64,
    pub status: TicketStatus,
    #[serde(default)]
    pub assigned_to: Option<i64>,
}

impl CreateTicketArgs {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketArgs {
    pub ticket_id: i64,
    #[serde(flatten)]
    pub changes: TicketChanges,
}

impl UpdateTicketArgs {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("title", &self.changes.title)?;
        require_text("description", &self.changes.description)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentArgs {
    pub ticket_id: i64,
    pub author_id: i64,
    pub body: String,
}

impl CreateCommentArgs {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("body", &self.body)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserArgs {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role_id: i64,
}

impl CreateUserArgs {
    pub fn validate(&self) -> Result<Role, AppError> {
        require_text("firstName", &self.first_name)?;
        require_text("lastName", &self.last_name)?;
        require_email(&self.email)?;
        password::check_strength(&self.password).map_err(AppError::BadRequest)?;
        require_role(self.role_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserArgs {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Absent or empty keeps the current password.
    #[serde(default)]
    pub password: Option<String>,
    pub role_id: i64,
    pub active: bool,
}

impl UpdateUserArgs {
    pub fn validate(&self) -> Result<Role, AppError> {
        require_text("firstName", &self.first_name)?;
        require_text("lastName", &self.last_name)?;
        require_email(&self.email)?;
        if let Some(pw) = self.new_password() {
            password::check_strength(pw).map_err(AppError::BadRequest)?;
        }
        require_role(self.role_id)
    }

    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|pw| !pw.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<(), AppError> {
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::BadRequest(format!("Invalid email address: '{email}'")));
    }
    Ok(())
}

fn require_role(role_id: i64) -> Result<Role, AppError> {
    Role::from_id(role_id).ok_or_else(|| AppError::BadRequest(format!("Unknown role id {role_id}")))
}
