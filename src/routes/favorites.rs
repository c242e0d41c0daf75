//! Favorites endpoints
//!
//! Favorites are persisted rows only; there is no in-memory variant.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

use crate::db::repository::favorites;
use crate::error::{parse_param, ApiError};
use crate::models::catalog::ContentKind;
use crate::models::ApiResponse;
use crate::AppState;

fn parse_kind(raw: &str) -> Result<ContentKind, ApiError> {
    ContentKind::from_str(raw)
        .map_err(|_| ApiError::Validation(format!("contentType inválido: {}", raw)))
}

/// Request to add a favorite
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub user_id: i32,
    pub content_type: String,
    pub content_id: i32,
}

/// POST /api/favorites - Add a favorite (idempotent)
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddFavoriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(&payload.content_type)?;

    let added = favorites::add(&state.pool, payload.user_id, kind, payload.content_id).await?;

    tracing::info!(
        user_id = payload.user_id,
        content_type = %kind,
        content_id = payload.content_id,
        added,
        "favorite added"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "added": added
    })))
}

/// Query params for listing favorites
#[derive(Debug, Deserialize)]
pub struct FavoritesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// GET /api/favorites/:user_id - List a user's favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<FavoritesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_param("user_id", &user_id)?;
    let limit = query.limit.clamp(1, 100);

    let items = favorites::list_by_user(&state.pool, user_id, limit).await?;

    Ok(Json(ApiResponse::ok(items)))
}

/// DELETE /api/favorites/:user_id/:content_type/:content_id - Remove a favorite
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path((user_id, content_type, content_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_param("user_id", &user_id)?;
    let kind = parse_kind(&content_type)?;
    let content_id = parse_param("content_id", &content_id)?;

    let deleted = favorites::remove(&state.pool, user_id, kind, content_id).await?;

    Ok(Json(serde_json::json!({
        "success": deleted > 0,
        "deleted": deleted
    })))
}
