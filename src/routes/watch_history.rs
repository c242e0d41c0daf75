//! Watch history API endpoints
//!
//! Provides endpoints for syncing and retrieving watch history. History is
//! tied to the user identity, so "Continue Watching" persists across
//! devices.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::db::repository::watch_history;
use crate::error::{parse_param, ApiError};
use crate::models::catalog::ContentKind;
use crate::AppState;

/// Request to sync watch history
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncHistoryRequest {
    pub user_id: i32,
    pub items: Vec<watch_history::WatchHistoryItem>,
}

/// Response for sync operation
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub synced: usize,
}

/// Query params for getting history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Response for get history
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub success: bool,
    pub items: Vec<watch_history::WatchHistoryItem>,
    pub total: usize,
}

/// POST /api/history/sync - Sync watch history items from a client
pub async fn sync_watch_history(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SyncHistoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Every item must carry a known content kind
    for item in &payload.items {
        if ContentKind::from_str(&item.content_type).is_err() {
            return Err(ApiError::Validation(format!(
                "contentType inválido: {}",
                item.content_type
            )));
        }
    }

    let synced = watch_history::sync_items(&state.pool, payload.user_id, &payload.items).await?;

    tracing::info!(
        user_id = payload.user_id,
        synced,
        "watch history synced"
    );

    Ok(Json(SyncResponse {
        success: true,
        synced,
    }))
}

/// GET /api/history/:user_id - Get watch history for a user
pub async fn get_watch_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_param("user_id", &user_id)?;

    // Apply limit (max 100)
    let limit = query.limit.clamp(1, 100);

    let rows = watch_history::get_recent(&state.pool, user_id, limit).await?;

    let items: Vec<watch_history::WatchHistoryItem> = rows.into_iter().map(Into::into).collect();
    let total = items.len();

    Ok(Json(HistoryResponse {
        success: true,
        items,
        total,
    }))
}

/// DELETE /api/history/:user_id - Clear watch history for a user
pub async fn clear_watch_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_param("user_id", &user_id)?;

    let deleted = watch_history::delete_by_user(&state.pool, user_id).await?;

    tracing::info!(user_id, deleted, "watch history cleared");

    Ok(Json(serde_json::json!({
        "success": true,
        "deleted": deleted
    })))
}

/// DELETE /api/history/:user_id/:content_type/:content_id - Delete one item
pub async fn delete_history_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, content_type, content_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_param("user_id", &user_id)?;
    let kind = ContentKind::from_str(&content_type)
        .map_err(|_| ApiError::Validation(format!("contentType inválido: {}", content_type)))?;
    let content_id = parse_param("content_id", &content_id)?;

    let deleted =
        watch_history::delete_item(&state.pool, user_id, &kind.to_string(), content_id).await?;

    Ok(Json(serde_json::json!({
        "success": deleted > 0,
        "deleted": deleted
    })))
}
