use sqlx::SqlitePool;

use crate::models::{Role, User, UserWithRole};

pub async fn create(
    pool: &SqlitePool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, User>(
        "INSERT INTO users (first_name, last_name, email, password_hash, role_id, active)
         VALUES (?, ?, ?, ?, ?, 1) RETURNING *",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(password_hash)
    .bind(role.id())
    .fetch_one(&mut *conn)
    .await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.0)
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<UserWithRole>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, UserWithRole>(
        "SELECT u.id, u.first_name, u.last_name, u.email, u.role_id, r.name AS role_name, u.active
         FROM users u
         JOIN roles r ON u.role_id = r.id
         ORDER BY u.last_name, u.first_name, u.id",
    )
    .fetch_all(&mut *conn)
    .await
}

/// Rewrites every profile field. `password_hash` of `None` keeps the stored
/// credential. Returns `RowNotFound` when no user has this id.
#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: Option<&str>,
    role: Role,
    active: bool,
) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let result = sqlx::query(
        "UPDATE users
         SET first_name = ?, last_name = ?, email = ?,
             password_hash = COALESCE(?, password_hash), role_id = ?, active = ?
         WHERE id = ?",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(password_hash)
    .bind(role.id())
    .bind(active)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    super::require_row(result)
}

/// Hard delete. Fails with a foreign-key violation while the user still
/// authors tickets or comments; assignments are cleared by the store.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    super::require_row(result)
}
