//! Admin/Management endpoints
//!
//! Protected by a simple admin key. Cache invalidation is the hook the
//! components owning channel/EPG writes call after mutating catalog data.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::repository::epg;
use crate::error::ApiError;
use crate::AppState;

/// Query params for admin operations
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    /// Admin key for authorization (simple protection)
    pub key: Option<String>,
}

/// Validate admin key
fn validate_admin_key(state: &AppState, provided_key: Option<&str>) -> Result<(), ApiError> {
    match provided_key {
        Some(key) if key == state.config.admin_key => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

/// Stats response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbStatsResponse {
    pub success: bool,
    pub channels: i64,
    pub vod_contents: i64,
    pub epg_programs: i64,
    pub favorites: i64,
    pub watch_history: i64,
    pub cache_entries: usize,
}

/// GET /api/admin/stats - Database and cache statistics
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    validate_admin_key(&state, query.key.as_deref())?;

    let channels: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM channels")
        .fetch_one(&state.pool)
        .await
        .unwrap_or((0,));

    let vod_contents: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vod_contents")
        .fetch_one(&state.pool)
        .await
        .unwrap_or((0,));

    let epg_programs: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM epg_programs")
        .fetch_one(&state.pool)
        .await
        .unwrap_or((0,));

    let favorites: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites")
        .fetch_one(&state.pool)
        .await
        .unwrap_or((0,));

    let watch_history: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM watch_history")
        .fetch_one(&state.pool)
        .await
        .unwrap_or((0,));

    Ok(Json(DbStatsResponse {
        success: true,
        channels: channels.0,
        vod_contents: vod_contents.0,
        epg_programs: epg_programs.0,
        favorites: favorites.0,
        watch_history: watch_history.0,
        cache_entries: state.cache.len().await,
    }))
}

/// Query params for cache invalidation
#[derive(Debug, Deserialize)]
pub struct InvalidateQuery {
    pub key: Option<String>,
    /// Namespace prefix, e.g. "channels:" or "epg:"
    pub prefix: Option<String>,
}

/// POST /api/admin/cache/invalidate - Drop cached responses by prefix
pub async fn invalidate_cache(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InvalidateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    validate_admin_key(&state, query.key.as_deref())?;

    let prefix = query
        .prefix
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Parâmetro prefix é obrigatório".to_string()))?;

    let invalidated = state.cache.invalidate_prefix(prefix).await;

    tracing::info!(prefix, invalidated, "Admin: cache invalidated");

    Ok(Json(serde_json::json!({
        "success": true,
        "invalidated": invalidated
    })))
}

/// DELETE /api/admin/epg/expired - Prune EPG programs past retention
pub async fn delete_expired_epg(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminQuery>,
) -> Result<impl IntoResponse, ApiError> {
    validate_admin_key(&state, query.key.as_deref())?;

    let cutoff = Utc::now() - ChronoDuration::days(state.config.epg_retention_days);
    let deleted = epg::delete_ended_before(&state.pool, cutoff).await?;

    tracing::info!("Admin: cleaned up {} old EPG programs", deleted);

    Ok(Json(serde_json::json!({
        "success": true,
        "deleted": deleted
    })))
}
