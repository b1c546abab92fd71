use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::models::{Ticket, TicketStatus};

/// The mutable part of a ticket. An update rewrites all of it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketChanges {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub status: TicketStatus,
    #[serde(default)]
    pub assigned_to: Option<i64>,
}

/// Full scan. Callers sort if they need an order.
pub async fn list(pool: &SqlitePool) -> Result<Vec<Ticket>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, Ticket>("SELECT * FROM tickets")
        .fetch_all(&mut *conn)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Ticket>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn list_by_creator(pool: &SqlitePool, user_id: i64) -> Result<Vec<Ticket>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE created_by = ?")
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
}

pub async fn list_assigned_to(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Ticket>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE assigned_to = ?")
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
}

pub async fn create(
    pool: &SqlitePool,
    title: &str,
    description: &str,
    category_id: i64,
    created_by: i64,
    status: TicketStatus,
    assigned_to: Option<i64>,
) -> Result<Ticket, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, Ticket>(
        "INSERT INTO tickets (title, description, category_id, created_by, assigned_to, created_at, status)
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(title)
    .bind(description)
    .bind(category_id)
    .bind(created_by)
    .bind(assigned_to)
    .bind(Utc::now())
    .bind(status)
    .fetch_one(&mut *conn)
    .await
}

/// Returns `RowNotFound` when no ticket has this id.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    changes: &TicketChanges,
) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let result = sqlx::query(
        "UPDATE tickets
         SET title = ?, description = ?, category_id = ?, status = ?, assigned_to = ?
         WHERE id = ?",
    )
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(changes.category_id)
    .bind(changes.status)
    .bind(changes.assigned_to)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    super::require_row(result)
}

/// Hard delete. Comments on the ticket go with it (`ON DELETE CASCADE`).
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let result = sqlx::query("DELETE FROM tickets WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    super::require_row(result)
}
