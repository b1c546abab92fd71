//! The boundary between the UI and the data layer.
//!
//! Every operation takes a typed [`Request`], runs exactly one data-access or
//! visibility call, and comes back as an [`Envelope`]. Nothing below this
//! layer is allowed to escape it as an error.

mod envelope;
mod request;

pub use envelope::Envelope;
pub use request::{
    CreateCommentArgs, CreateTicketArgs, CreateUserArgs, EmailArgs, HomeArgs, LoginArgs, NoArgs,
    Request, TicketRef, UpdateTicketArgs, UpdateUserArgs, UserRef,
};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::User;
use crate::views::authors::UserDirectory;
use crate::visibility;

/// Successful outcome of an operation, before it is wrapped.
enum Reply {
    Data(Value),
    Id(i64),
    User(Option<User>),
    Ack,
}

impl Reply {
    fn data<T: Serialize>(value: T) -> Result<Reply, AppError> {
        serde_json::to_value(value)
            .map(Reply::Data)
            .map_err(|e| AppError::Internal(format!("Failed to serialize result: {e}")))
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    pool: SqlitePool,
}

impl Dispatcher {
    pub fn new(pool: SqlitePool) -> Self {
        Dispatcher { pool }
    }

    /// Entry point for untyped callers: parse the request, then dispatch it.
    /// A malformed request is answered with a failure envelope.
    pub async fn invoke(&self, raw: Value) -> Envelope {
        match serde_json::from_value::<Request>(raw) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                tracing::warn!("Rejected malformed request: {e}");
                Envelope::failure(format!("Malformed request: {e}"))
            }
        }
    }

    pub async fn dispatch(&self, request: Request) -> Envelope {
        let op = request.name();
        match self.execute(request).await {
            Ok(Reply::Data(data)) => Envelope::data(data),
            Ok(Reply::Id(id)) => Envelope::id(id),
            Ok(Reply::User(user)) => match serde_json::to_value(user) {
                Ok(user) => Envelope::user(user),
                Err(e) => Envelope::failure(format!("Failed to serialize user: {e}")),
            },
            Ok(Reply::Ack) => Envelope::ack(),
            Err(e) => {
                if e.is_expected() {
                    tracing::warn!(op, "Operation failed: {e}");
                } else {
                    tracing::error!(op, "Operation failed: {e}");
                }
                Envelope::failure(e.to_string())
            }
        }
    }

    async fn execute(&self, request: Request) -> Result<Reply, AppError> {
        let pool = &self.pool;
        match request {
            Request::ListTickets(_) => Reply::data(db::tickets::list(pool).await?),
            Request::TicketsByCreator(args) => {
                Reply::data(db::tickets::list_by_creator(pool, args.user_id).await?)
            }
            Request::TicketsAssignedTo(args) => {
                Reply::data(db::tickets::list_assigned_to(pool, args.user_id).await?)
            }
            Request::HomeTickets(args) => {
                Reply::data(visibility::home_tickets(pool, args.user_id, args.role_id).await?)
            }
            Request::GetTicket(args) => {
                let ticket = db::tickets::find_by_id(pool, args.ticket_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Ticket {} not found", args.ticket_id))
                    })?;
                Reply::data(ticket)
            }
            Request::CreateTicket(args) => {
                args.validate()?;
                let ticket = db::tickets::create(
                    pool,
                    args.title.trim(),
                    args.description.trim(),
                    args.category_id,
                    args.created_by,
                    args.status,
                    args.assigned_to,
                )
                .await?;
                Ok(Reply::Id(ticket.id))
            }
            Request::UpdateTicket(args) => {
                args.validate()?;
                db::tickets::update(pool, args.ticket_id, &args.changes)
                    .await
                    .map_err(|e| not_found_as(e, "Ticket", args.ticket_id))?;
                Ok(Reply::Ack)
            }
            Request::DeleteTicket(args) => {
                db::tickets::delete(pool, args.ticket_id)
                    .await
                    .map_err(|e| not_found_as(e, "Ticket", args.ticket_id))?;
                Ok(Reply::Ack)
            }
            Request::CreateComment(args) => {
                args.validate()?;
                let comment =
                    db::comments::create(pool, args.ticket_id, args.author_id, args.body.trim())
                        .await?;
                Ok(Reply::Id(comment.id))
            }
            Request::CommentsByTicket(args) => {
                Reply::data(db::comments::list_by_ticket(pool, args.ticket_id).await?)
            }
            Request::ListUsers(_) => Reply::data(db::users::list_all(pool).await?),
            Request::GetUser(args) => Ok(Reply::User(
                db::users::find_by_id(pool, args.user_id).await?,
            )),
            Request::UserByEmail(args) => Ok(Reply::User(
                db::users::find_by_email(pool, &args.email).await?,
            )),
            Request::CreateUser(args) => {
                let role = args.validate()?;
                let pw_hash = password::hash(&args.password).map_err(AppError::Internal)?;
                let user = db::users::create(
                    pool,
                    args.first_name.trim(),
                    args.last_name.trim(),
                    &args.email,
                    &pw_hash,
                    role,
                )
                .await?;
                Ok(Reply::Id(user.id))
            }
            Request::UpdateUser(args) => {
                let role = args.validate()?;
                let pw_hash = args
                    .new_password()
                    .map(password::hash)
                    .transpose()
                    .map_err(AppError::Internal)?;
                db::users::update(
                    pool,
                    args.user_id,
                    args.first_name.trim(),
                    args.last_name.trim(),
                    &args.email,
                    pw_hash.as_deref(),
                    role,
                    args.active,
                )
                .await
                .map_err(|e| not_found_as(e, "User", args.user_id))?;
                Ok(Reply::Ack)
            }
            Request::DeleteUser(args) => {
                db::users::delete(pool, args.user_id)
                    .await
                    .map_err(|e| not_found_as(e, "User", args.user_id))?;
                Ok(Reply::Ack)
            }
            Request::ListRoles(_) => Reply::data(db::roles::list(pool).await?),
            Request::Login(args) => {
                let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
                let Some(user) = db::users::find_by_email(pool, &args.email).await? else {
                    password::verify_placeholder(&args.password);
                    return Err(invalid());
                };
                if !password::matches(&args.password, &user.password_hash) {
                    return Err(invalid());
                }
                if !user.active {
                    return Err(AppError::Unauthorized("Account is inactive".to_string()));
                }
                Ok(Reply::User(Some(user)))
            }
        }
    }
}

/// Name the missing record in a `RowNotFound`; other errors convert as usual.
fn not_found_as(err: sqlx::Error, entity: &str, id: i64) -> AppError {
    match err {
        sqlx::Error::RowNotFound => AppError::NotFound(format!("{entity} {id} not found")),
        other => other.into(),
    }
}

#[async_trait]
impl UserDirectory for Dispatcher {
    async fn display_name(&self, user_id: i64) -> Result<Option<String>, String> {
        let envelope = self.dispatch(Request::GetUser(UserRef { user_id })).await;
        if !envelope.success {
            return Err(envelope.error.unwrap_or_default());
        }
        Ok(envelope.user_as::<User>().map(|u| u.display_name()))
    }
}
