//! Which tickets a user sees on their home view.

use sqlx::SqlitePool;

use crate::db;
use crate::models::{Role, Ticket};

/// The query a role's home view is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeScope {
    /// Tickets assigned to the user. Admin and Support.
    Assigned,
    /// Tickets the user created. Regular users.
    Created,
}

impl HomeScope {
    /// Unknown role ids get the regular-user scope.
    pub fn for_role_id(role_id: i64) -> HomeScope {
        match Role::from_id(role_id) {
            Some(role) if role.is_staff() => HomeScope::Assigned,
            Some(_) => HomeScope::Created,
            None => {
                tracing::warn!(role_id, "Unknown role id, falling back to the user scope");
                HomeScope::Created
            }
        }
    }
}

pub async fn home_tickets(
    pool: &SqlitePool,
    user_id: i64,
    role_id: i64,
) -> Result<Vec<Ticket>, sqlx::Error> {
    match HomeScope::for_role_id(role_id) {
        HomeScope::Assigned => db::tickets::list_assigned_to(pool, user_id).await,
        HomeScope::Created => db::tickets::list_by_creator(pool, user_id).await,
    }
}
