//! Watch history repository
//!
//! Persistent playback positions keyed by (user, content kind, content id),
//! so "Continue Watching" survives restarts and device changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Watch history item for sync requests and responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryItem {
    pub content_type: String,
    pub content_id: i32,
    pub position_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    /// Timestamp in milliseconds
    pub watched_at: i64,
}

/// Database row for watch history
#[derive(Debug, Clone, FromRow)]
pub struct WatchHistoryRow {
    pub user_id: i32,
    pub content_type: String,
    pub content_id: i32,
    pub position_ms: i64,
    pub duration_ms: Option<i64>,
    pub watched_at: DateTime<Utc>,
}

impl From<WatchHistoryRow> for WatchHistoryItem {
    fn from(row: WatchHistoryRow) -> Self {
        Self {
            content_type: row.content_type,
            content_id: row.content_id,
            position_ms: row.position_ms,
            duration_ms: row.duration_ms,
            watched_at: row.watched_at.timestamp_millis(),
        }
    }
}

/// Upsert (insert or update) a single watch history item
pub async fn upsert_item(
    pool: &PgPool,
    user_id: i32,
    item: &WatchHistoryItem,
) -> Result<(), sqlx::Error> {
    let watched_at = DateTime::from_timestamp_millis(item.watched_at).unwrap_or_else(Utc::now);

    sqlx::query(
        r#"
        INSERT INTO watch_history (user_id, content_type, content_id, position_ms, duration_ms, watched_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, content_type, content_id) DO UPDATE SET
            position_ms = EXCLUDED.position_ms,
            duration_ms = EXCLUDED.duration_ms,
            watched_at = EXCLUDED.watched_at
        "#,
    )
    .bind(user_id)
    .bind(&item.content_type)
    .bind(item.content_id)
    .bind(item.position_ms)
    .bind(item.duration_ms)
    .bind(watched_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Sync multiple watch history items at once
pub async fn sync_items(
    pool: &PgPool,
    user_id: i32,
    items: &[WatchHistoryItem],
) -> Result<usize, sqlx::Error> {
    let mut count = 0;

    for item in items {
        upsert_item(pool, user_id, item).await?;
        count += 1;
    }

    Ok(count)
}

/// Get recent watch history for a user (most recent first)
pub async fn get_recent(
    pool: &PgPool,
    user_id: i32,
    limit: i64,
) -> Result<Vec<WatchHistoryRow>, sqlx::Error> {
    sqlx::query_as::<_, WatchHistoryRow>(
        "SELECT user_id, content_type, content_id, position_ms, duration_ms, watched_at \
         FROM watch_history WHERE user_id = $1 \
         ORDER BY watched_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Clear all history for a user; returns rows deleted
pub async fn delete_by_user(pool: &PgPool, user_id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM watch_history WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete a single history item; returns rows deleted
pub async fn delete_item(
    pool: &PgPool,
    user_id: i32,
    content_type: &str,
    content_id: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM watch_history \
         WHERE user_id = $1 AND content_type = $2 AND content_id = $3",
    )
    .bind(user_id)
    .bind(content_type)
    .bind(content_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Trim old entries, keeping only the most recent N per user.
/// Returns the number of deleted entries.
pub async fn trim_per_user(pool: &PgPool, keep_count: i64) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        WITH ranked AS (
            SELECT id,
                   ROW_NUMBER() OVER (PARTITION BY user_id ORDER BY watched_at DESC) as rn
            FROM watch_history
        )
        DELETE FROM watch_history
        WHERE id IN (SELECT id FROM ranked WHERE rn > $1)
        "#,
    )
    .bind(keep_count)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() as i64)
}
