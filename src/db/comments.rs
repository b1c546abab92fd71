use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{Comment, CommentView};

pub async fn create(
    pool: &SqlitePool,
    ticket_id: i64,
    author_id: i64,
    body: &str,
) -> Result<Comment, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (ticket_id, author_id, body, created_at)
         VALUES (?, ?, ?, ?) RETURNING *",
    )
    .bind(ticket_id)
    .bind(author_id)
    .bind(body)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await
}

/// Comments on a ticket with author and role names, newest first.
pub async fn list_by_ticket(
    pool: &SqlitePool,
    ticket_id: i64,
) -> Result<Vec<CommentView>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, CommentView>(
        "SELECT c.id, c.ticket_id, c.author_id, c.body, c.created_at,
                u.first_name AS author_first_name, u.last_name AS author_last_name,
                r.name AS role_name
         FROM comments c
         JOIN users u ON c.author_id = u.id
         JOIN roles r ON u.role_id = r.id
         WHERE c.ticket_id = ?
         ORDER BY c.created_at DESC, c.id DESC",
    )
    .bind(ticket_id)
    .fetch_all(&mut *conn)
    .await
}
