use sqlx::SqlitePool;

use crate::models::RoleRecord;

pub async fn list(pool: &SqlitePool) -> Result<Vec<RoleRecord>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, RoleRecord>("SELECT id, name FROM roles ORDER BY id")
        .fetch_all(&mut *conn)
        .await
}
