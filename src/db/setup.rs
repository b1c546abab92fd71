use sqlx::SqlitePool;

use crate::auth::password;
use crate::error::AppError;
use crate::models::{Role, TicketStatus};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Demo accounts inserted into an empty database: (first, last, email, password, role).
const DEMO_USERS: [(&str, &str, &str, &str, Role); 3] = [
    ("Ada", "Admin", "admin@ticketdesk.local", "admin123", Role::Admin),
    ("Sam", "Support", "support@ticketdesk.local", "support123", Role::Support),
    ("Uma", "User", "user@ticketdesk.local", "user123", Role::User),
];

/// Create the schema if needed and, when `seed_demo` is set and there are no
/// users yet, insert demo data. Safe to run on every start.
pub async fn auto_setup(pool: &SqlitePool, seed_demo: bool) -> Result<(), AppError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run migrations: {e}")))?;
    tracing::info!("Schema ready");

    if !seed_demo {
        return Ok(());
    }

    if super::users::count_all(pool).await? > 0 {
        tracing::info!("Data present, skipping demo seed");
        return Ok(());
    }

    seed_demo_data(pool).await?;
    tracing::info!("Seeded demo data");
    Ok(())
}

/// Drop every table and set the database up from scratch.
pub async fn reset(pool: &SqlitePool, seed_demo: bool) -> Result<(), AppError> {
    sqlx::raw_sql(
        "DROP TABLE IF EXISTS comments;
         DROP TABLE IF EXISTS tickets;
         DROP TABLE IF EXISTS users;
         DROP TABLE IF EXISTS roles;
         DROP TABLE IF EXISTS _sqlx_migrations;",
    )
    .execute(pool)
    .await?;
    tracing::warn!("Dropped all tables");

    auto_setup(pool, seed_demo).await
}

async fn seed_demo_data(pool: &SqlitePool) -> Result<(), AppError> {
    let mut ids = Vec::with_capacity(DEMO_USERS.len());
    for (first, last, email, pw, role) in DEMO_USERS {
        let hash = password::hash(pw).map_err(AppError::Internal)?;
        let user = super::users::create(pool, first, last, email, &hash, role).await?;
        tracing::info!(email, role = %role, "Created demo user");
        ids.push(user.id);
    }
    let (support_id, user_id) = (ids[1], ids[2]);

    super::tickets::create(
        pool,
        "Printer offline",
        "The printer on the second floor does not respond.",
        1,
        user_id,
        TicketStatus::Open,
        None,
    )
    .await?;
    let ticket = super::tickets::create(
        pool,
        "VPN drops every hour",
        "The VPN connection is lost roughly every sixty minutes.",
        2,
        user_id,
        TicketStatus::InProgress,
        Some(support_id),
    )
    .await?;
    super::comments::create(pool, ticket.id, support_id, "Looking into the gateway logs.").await?;
    super::tickets::create(
        pool,
        "New laptop request",
        "Replacement for a laptop with a broken hinge.",
        3,
        user_id,
        TicketStatus::Closed,
        Some(support_id),
    )
    .await?;

    Ok(())
}
