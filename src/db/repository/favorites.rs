//! Favorites repository
//!
//! Favorites are plain association rows (user, content kind, content id).
//! They live only in this table; there is no in-memory variant.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::catalog::ContentKind;

/// Favorite as served to clients
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRow {
    pub user_id: i32,
    pub content_type: String,
    pub content_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Add a favorite; adding the same one twice is a no-op
pub async fn add(
    pool: &PgPool,
    user_id: i32,
    kind: ContentKind,
    content_id: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO favorites (user_id, content_type, content_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, content_type, content_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(kind.to_string())
    .bind(content_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List a user's favorites, most recent first
pub async fn list_by_user(
    pool: &PgPool,
    user_id: i32,
    limit: i64,
) -> Result<Vec<FavoriteRow>, sqlx::Error> {
    sqlx::query_as::<_, FavoriteRow>(
        "SELECT user_id, content_type, content_id, created_at \
         FROM favorites WHERE user_id = $1 \
         ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Remove a favorite; returns rows deleted
pub async fn remove(
    pool: &PgPool,
    user_id: i32,
    kind: ContentKind,
    content_id: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM favorites \
         WHERE user_id = $1 AND content_type = $2 AND content_id = $3",
    )
    .bind(user_id)
    .bind(kind.to_string())
    .bind(content_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
